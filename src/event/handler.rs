use async_trait::async_trait;
use thiserror::Error;

use super::events::ScoreUpdateEvent;

/// Errors that can occur when handling events
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Handler timed out")]
    Timeout,

    #[error("Retryable error: {0}")]
    Retryable(String),

    #[error("Non-retryable error: {0}")]
    NonRetryable(String),
}

impl EventError {
    /// Whether this error indicates the operation should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, EventError::Retryable(_) | EventError::Timeout)
    }

    pub fn retryable(msg: impl Into<String>) -> Self {
        EventError::Retryable(msg.into())
    }

    pub fn non_retryable(msg: impl Into<String>) -> Self {
        EventError::NonRetryable(msg.into())
    }
}

/// Trait for components that consume score updates from the event bus
///
/// Delivery is at-least-once: a handler may see the same event again after
/// a retryable failure or a timeout.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &ScoreUpdateEvent) -> Result<(), EventError>;

    /// Get a human-readable name for this handler (for logging/debugging)
    fn name(&self) -> &'static str;
}
