use tokio::sync::broadcast;
use tracing::debug;

use super::events::ScoreUpdateEvent;

pub const DEFAULT_CAPACITY: usize = 1024;

/// In-process topic carrying score updates from producers to consumers
///
/// Every subscriber receives every event published after it subscribed.
/// Publishing never fails; with no subscribers the event is not delivered.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ScoreUpdateEvent>,
}

impl EventBus {
    /// Creates a new event bus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Publishes an event to all current subscribers, returning how many received it
    pub fn publish(&self, event: ScoreUpdateEvent) -> usize {
        let player_id = event.player_id.clone();

        match self.sender.send(event) {
            Ok(receiver_count) => {
                debug!(
                    player_id = %player_id,
                    receivers = receiver_count,
                    "Score update published"
                );
                receiver_count
            }
            Err(_) => {
                debug!(player_id = %player_id, "Score update published with no receivers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ScoreUpdateEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
