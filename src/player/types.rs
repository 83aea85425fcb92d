use serde::{Deserialize, Serialize};

/// Request payload for registering a player
#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    /// Generated when omitted
    pub player_id: Option<String>,
    pub player_name: String,
    pub player_email: String,
    pub team_id: Option<String>,
}

/// Request payload for the owner-initiated full replace of a player
///
/// Current runs and wickets are not part of the payload; they only change
/// through score updates.
#[derive(Debug, Deserialize)]
pub struct ReplacePlayerRequest {
    pub player_name: String,
    pub player_email: String,
    pub team_id: Option<String>,
    #[serde(default)]
    pub total_runs: i64,
    #[serde(default)]
    pub total_wickets: i64,
    #[serde(default)]
    pub total_matches: i64,
    #[serde(default)]
    pub highest_runs: i64,
    #[serde(default)]
    pub highest_wickets: i64,
    #[serde(default)]
    pub matches_organized: i64,
    #[serde(default)]
    pub sponsors: i64,
    #[serde(default)]
    pub support_staff: i64,
}

/// Request payload for overwriting a player's cumulative totals
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UpdateTotalsRequest {
    pub total_runs: i64,
    pub total_wickets: i64,
    pub total_matches: i64,
    pub highest_runs: i64,
    pub highest_wickets: i64,
}
