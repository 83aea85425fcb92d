use dashmap::DashMap;

use crate::event::ScoreUpdateEvent;

/// In-memory overlay of the most recent score update per player
///
/// Backed by a sharded concurrent map: puts for different players do not
/// contend on a global lock, and each put replaces a whole entry under its
/// shard lock, so a reader never observes a half-written event.
///
/// Entries are never evicted; the map grows with the number of distinct
/// players that have received an update.
#[derive(Debug, Default)]
pub struct LatestUpdateCache {
    entries: DashMap<String, ScoreUpdateEvent>,
}

impl LatestUpdateCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn get(&self, player_id: &str) -> Option<ScoreUpdateEvent> {
        self.entries.get(player_id).map(|entry| entry.value().clone())
    }

    /// Stores `event` as the latest update for `player_id`, returning the entry it replaced
    pub fn put(&self, player_id: &str, event: ScoreUpdateEvent) -> Option<ScoreUpdateEvent> {
        self.entries.insert(player_id.to_string(), event)
    }

    /// Point-in-time copy of every entry, in no particular order
    pub fn all_entries(&self) -> Vec<(String, ScoreUpdateEvent)> {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
