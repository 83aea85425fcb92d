use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::ScoreUpdateEvent;

/// Request payload for creating a match
#[derive(Debug, Deserialize)]
pub struct MatchCreateRequest {
    /// Generated when omitted
    pub code: Option<String>,
    pub team1: String,
    pub team2: String,
    pub team_size: i32,
    pub location: String,
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Request payload for ending a match
#[derive(Debug, Deserialize)]
pub struct EndMatchRequest {
    pub winner: String,
}

/// Per-player performance reported from the match side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStatsPayload {
    pub player_id: String,
    pub player_name: String,
    pub runs_scored: i64,
    pub wickets_taken: i64,
}

impl From<PlayerStatsPayload> for ScoreUpdateEvent {
    fn from(payload: PlayerStatsPayload) -> Self {
        ScoreUpdateEvent {
            player_id: payload.player_id,
            player_name: payload.player_name,
            current_score: payload.runs_scored,
            current_wickets: payload.wickets_taken,
        }
    }
}

/// Response for the schedule endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub message: String,
    pub player_id: String,
    pub receivers: usize,
}
