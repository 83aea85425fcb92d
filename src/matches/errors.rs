use thiserror::Error;

use super::models::MatchStatus;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Match not found: {0}")]
    MatchNotFound(i64),

    #[error("Match {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: i64,
        from: MatchStatus,
        to: MatchStatus,
    },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
