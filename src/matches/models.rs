use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Lifecycle of a match: Scheduled -> Ongoing -> Completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum MatchStatus {
    Scheduled,
    Ongoing,
    Completed,
}

impl MatchStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchStatus::Completed)
    }

    /// Completed is terminal and a match never moves back to Scheduled.
    /// Re-entering Ongoing is allowed.
    pub fn can_transition_to(&self, next: MatchStatus) -> bool {
        match (self, next) {
            (MatchStatus::Completed, _) => false,
            (current, MatchStatus::Scheduled) => *current == MatchStatus::Scheduled,
            _ => true,
        }
    }
}

/// A match as stored in the `matches` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchModel {
    pub id: i64,
    pub code: String,
    pub team1: String,
    pub team2: String,
    pub team_size: i32,
    pub location: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: MatchStatus,
    pub winner: Option<String>,
}

/// A match that has not been assigned an id yet
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub code: String,
    pub team1: String,
    pub team2: String,
    pub team_size: i32,
    pub location: String,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl NewMatch {
    pub fn into_model(self, id: i64) -> MatchModel {
        MatchModel {
            id,
            code: self.code,
            team1: self.team1,
            team2: self.team2,
            team_size: self.team_size,
            location: self.location,
            scheduled_at: self.scheduled_at,
            status: MatchStatus::Scheduled,
            winner: None,
        }
    }
}
