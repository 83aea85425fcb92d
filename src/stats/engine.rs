use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::{cache::LatestUpdateCache, locks::PlayerLocks, StatsError};
use crate::event::ScoreUpdateEvent;
use crate::player::{models::PlayerStatRecord, repository::PlayerStatRepository};

/// Folds score updates into the durable per-player records
///
/// The store is the source of truth. The latest-update cache is written
/// only after the store has accepted the new record, so the cache never
/// reflects a write that did not commit.
///
/// Events are not deduplicated. A redelivered event is applied again and
/// its positive deltas are counted twice.
pub struct AggregationEngine {
    repository: Arc<dyn PlayerStatRepository>,
    cache: Arc<LatestUpdateCache>,
    locks: Arc<PlayerLocks>,
}

impl AggregationEngine {
    pub fn new(
        repository: Arc<dyn PlayerStatRepository>,
        cache: Arc<LatestUpdateCache>,
        locks: Arc<PlayerLocks>,
    ) -> Self {
        Self {
            repository,
            cache,
            locks,
        }
    }

    /// Applies one score update and returns the persisted record
    ///
    /// Fails with `PlayerNotFound` when no record exists for the player (no
    /// record is synthesized from the event) and with `Persistence` when the
    /// store rejects the read or the write. Neither failure touches the cache.
    #[instrument(skip(self, event), fields(player_id = %event.player_id))]
    pub async fn apply(&self, event: ScoreUpdateEvent) -> Result<PlayerStatRecord, StatsError> {
        let player_lock = self.locks.lock_for(&event.player_id).await;
        let guard = player_lock.lock().await;

        let mut record = match self.repository.find_by_id(&event.player_id).await? {
            Some(record) => record,
            None => {
                drop(guard);
                self.locks.release(&event.player_id, &player_lock).await;
                warn!("Dropping score update for unknown player");
                return Err(StatsError::PlayerNotFound(event.player_id));
            }
        };

        merge_score_update(&mut record, &event);

        let saved = self.repository.save(&record).await.map_err(|err| {
            warn!(error = %err, "Failed to persist score update, cache left untouched");
            err
        })?;

        debug!(
            total_runs = saved.total_runs,
            total_wickets = saved.total_wickets,
            highest_runs = saved.highest_runs,
            highest_wickets = saved.highest_wickets,
            "Score update applied"
        );

        let player_id = event.player_id.clone();
        self.cache.put(&player_id, event);

        Ok(saved)
    }
}

/// Aggregation rules for one event
///
/// Current values are overwritten unconditionally. Only positive values
/// add to the totals. Maxima compare against the raw event values.
pub fn merge_score_update(record: &mut PlayerStatRecord, event: &ScoreUpdateEvent) {
    record.current_runs = event.current_score;
    record.current_wickets = event.current_wickets;

    if event.current_score > 0 {
        record.total_runs = record.total_runs.saturating_add(event.current_score);
    }
    if event.current_wickets > 0 {
        record.total_wickets = record.total_wickets.saturating_add(event.current_wickets);
    }

    record.highest_runs = record.highest_runs.max(event.current_score);
    record.highest_wickets = record.highest_wickets.max(event.current_wickets);
}
