use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

