use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Durable cumulative statistics for one player (`player_stats` table)
///
/// Totals and maxima only move through score-update aggregation or an
/// explicit owner-initiated replace. Records are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct PlayerStatRecord {
    pub player_id: String,
    pub player_name: String,
    pub player_email: String,
    pub team_id: Option<String>,
    pub total_runs: i64,
    pub total_wickets: i64,
    pub total_matches: i64,
    pub highest_runs: i64,
    pub highest_wickets: i64,
    pub current_runs: i64,    // Value from the last applied event
    pub current_wickets: i64, // Value from the last applied event
    pub matches_organized: i64,
    pub sponsors: i64,
    pub support_staff: i64,
}

impl PlayerStatRecord {
    /// Creates a freshly registered player with every counter at zero
    pub fn new(
        player_id: impl Into<String>,
        player_name: impl Into<String>,
        player_email: impl Into<String>,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            player_name: player_name.into(),
            player_email: player_email.into(),
            team_id: None,
            total_runs: 0,
            total_wickets: 0,
            total_matches: 0,
            highest_runs: 0,
            highest_wickets: 0,
            current_runs: 0,
            current_wickets: 0,
            matches_organized: 0,
            sponsors: 0,
            support_staff: 0,
        }
    }

    pub fn with_team(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_starts_empty() {
        let record = PlayerStatRecord::new("p-1", "Smriti", "smriti@example.com");

        assert_eq!(record.player_id, "p-1");
        assert_eq!(record.total_runs, 0);
        assert_eq!(record.highest_wickets, 0);
        assert_eq!(record.current_runs, 0);
        assert!(record.team_id.is_none());
    }

    #[test]
    fn serializes_with_snake_case_fields() {
        let record = PlayerStatRecord::new("p-1", "Smriti", "smriti@example.com").with_team("t-9");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["player_id"], "p-1");
        assert_eq!(json["team_id"], "t-9");
        assert_eq!(json["total_runs"], 0);
    }
}
