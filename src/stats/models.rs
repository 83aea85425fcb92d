use serde::{Deserialize, Serialize};

use crate::event::ScoreUpdateEvent;
use crate::player::models::PlayerStatRecord;

/// Read view of a player's statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatsView {
    pub player_id: String,
    pub player_name: String,
    pub total_runs: i64,
    pub total_wickets: i64,
    pub total_matches: i64,
    pub highest_runs: i64,
    pub highest_wickets: i64,
    pub current_runs: i64,
    pub current_wickets: i64,
}

impl PlayerStatsView {
    /// Builds a view purely from the persisted record
    pub fn from_record(record: &PlayerStatRecord) -> Self {
        Self {
            player_id: record.player_id.clone(),
            player_name: record.player_name.clone(),
            total_runs: record.total_runs,
            total_wickets: record.total_wickets,
            total_matches: record.total_matches,
            highest_runs: record.highest_runs,
            highest_wickets: record.highest_wickets,
            current_runs: record.current_runs,
            current_wickets: record.current_wickets,
        }
    }

    /// Builds a view purely from a cached event; totals and maxima are zero
    pub fn from_event(event: &ScoreUpdateEvent) -> Self {
        Self {
            player_id: event.player_id.clone(),
            player_name: event.player_name.clone(),
            total_runs: 0,
            total_wickets: 0,
            total_matches: 0,
            highest_runs: 0,
            highest_wickets: 0,
            current_runs: event.current_score,
            current_wickets: event.current_wickets,
        }
    }

    /// Replaces the current values with those of a fresher event
    pub fn with_current_from(mut self, event: &ScoreUpdateEvent) -> Self {
        self.current_runs = event.current_score;
        self.current_wickets = event.current_wickets;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingStats {
    pub player_id: String,
    pub player_name: String,
    pub total_runs: i64,
    pub total_matches: i64,
    pub highest_runs: i64,
}

impl From<&PlayerStatRecord> for BattingStats {
    fn from(record: &PlayerStatRecord) -> Self {
        Self {
            player_id: record.player_id.clone(),
            player_name: record.player_name.clone(),
            total_runs: record.total_runs,
            total_matches: record.total_matches,
            highest_runs: record.highest_runs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlingStats {
    pub player_id: String,
    pub player_name: String,
    pub total_matches: i64,
    pub total_wickets: i64,
    pub highest_wickets: i64,
}

impl From<&PlayerStatRecord> for BowlingStats {
    fn from(record: &PlayerStatRecord) -> Self {
        Self {
            player_id: record.player_id.clone(),
            player_name: record.player_name.clone(),
            total_matches: record.total_matches,
            total_wickets: record.total_wickets,
            highest_wickets: record.highest_wickets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizerStats {
    pub player_id: String,
    pub player_name: String,
    pub matches_organized: i64,
    pub sponsors: i64,
    pub support_staff: i64,
}

impl From<&PlayerStatRecord> for OrganizerStats {
    fn from(record: &PlayerStatRecord) -> Self {
        Self {
            player_id: record.player_id.clone(),
            player_name: record.player_name.clone(),
            matches_organized: record.matches_organized,
            sponsors: record.sponsors,
            support_staff: record.support_staff,
        }
    }
}
