use serde::{Deserialize, Serialize};

/// A single delivered message describing one player's performance in a
/// scoring moment.
///
/// Events are facts reported by the match side. They carry no timestamp and
/// no idempotency key: the transport may deliver the same event more than
/// once and in any order relative to other events for the same player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdateEvent {
    pub player_id: String,
    pub player_name: String,
    pub current_score: i64,
    pub current_wickets: i64,
}

impl ScoreUpdateEvent {
    pub fn new(
        player_id: impl Into<String>,
        player_name: impl Into<String>,
        current_score: i64,
        current_wickets: i64,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            player_name: player_name.into(),
            current_score,
            current_wickets,
        }
    }

    /// Get a human-readable description of the event type
    pub fn event_type(&self) -> &'static str {
        "score_update"
    }
}
