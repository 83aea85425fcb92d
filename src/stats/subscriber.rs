use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use super::{engine::AggregationEngine, StatsError};
use crate::event::{EventError, EventHandler, ScoreUpdateEvent};

/// Feeds score updates from the event bus into the aggregation engine
///
/// Unknown players are logged and dropped. Store failures are reported as
/// retryable so the dispatcher can redeliver; the engine itself never
/// retries.
pub struct ScoreUpdateHandler {
    engine: Arc<AggregationEngine>,
}

impl ScoreUpdateHandler {
    pub fn new(engine: Arc<AggregationEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl EventHandler for ScoreUpdateHandler {
    async fn handle(&self, event: &ScoreUpdateEvent) -> Result<(), EventError> {
        match self.engine.apply(event.clone()).await {
            Ok(record) => {
                info!(
                    player_id = %record.player_id,
                    total_runs = record.total_runs,
                    total_wickets = record.total_wickets,
                    "Player stats updated from score event"
                );
                Ok(())
            }
            Err(StatsError::Persistence(msg)) => Err(EventError::retryable(msg)),
            Err(err) => {
                warn!(player_id = %event.player_id, error = %err, "Discarding score event");
                Err(EventError::non_retryable(err.to_string()))
            }
        }
    }

    fn name(&self) -> &'static str {
        "ScoreUpdateHandler"
    }
}
