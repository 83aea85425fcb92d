use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use super::{
    bus::EventBus,
    events::ScoreUpdateEvent,
    handler::{EventError, EventHandler},
};

/// Coordinates event distribution between the event bus and event handlers
///
/// The dispatcher:
/// - Listens for events from the EventBus
/// - Runs every handler for every event, each in its own task
/// - Retries retryable failures up to `max_retries` times
/// - Logs and drops events that fail permanently
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
    event_bus: EventBus,
    handler_timeout: Duration,
    max_retries: u32,
    retry_backoff: Duration,
}

impl EventDispatcher {
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            handlers: Vec::new(),
            event_bus,
            handler_timeout: Duration::from_secs(5),
            max_retries: 3,
            retry_backoff: Duration::from_millis(100),
        }
    }

    /// Add an event handler to the dispatcher
    ///
    /// The handler will start receiving events once `start_listening` is called.
    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        info!(handler_name = handler.name(), "Registering event handler");
        self.handlers.push(handler);
    }

    /// Set the timeout for individual handler execution
    pub fn with_handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = timeout;
        self
    }

    /// Set the maximum number of retries for failed handlers
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base delay before a retry; it doubles with every further attempt
    pub fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    /// Start listening for events and dispatching them to handlers
    ///
    /// The subscription is taken before this returns, so events published
    /// afterwards are never missed. The spawned task runs until every
    /// EventBus handle has been dropped.
    pub fn start_listening(self) -> JoinHandle<()> {
        let handlers = self.handlers;
        let mut receiver = self.event_bus.subscribe();
        let handler_timeout = self.handler_timeout;
        let max_retries = self.max_retries;
        let retry_backoff = self.retry_backoff;

        info!(
            handler_count = handlers.len(),
            timeout_ms = handler_timeout.as_millis() as u64,
            max_retries = max_retries,
            backoff_ms = retry_backoff.as_millis() as u64,
            "Starting event dispatcher"
        );

        tokio::spawn(async move {
            loop {
                let event = match receiver.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Dispatcher fell behind the event bus, events were dropped");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                debug!(
                    event_type = event.event_type(),
                    player_id = %event.player_id,
                    "Dispatching event to {} handlers",
                    handlers.len()
                );

                for handler in &handlers {
                    let event = event.clone();
                    let handler = handler.clone();

                    tokio::spawn(async move {
                        if let Err(e) = Self::handle_with_retry(
                            handler,
                            event,
                            handler_timeout,
                            max_retries,
                            retry_backoff,
                        )
                        .await
                        {
                            error!(error = %e, "Handler failed permanently, event dropped");
                        }
                    });
                }
            }

            info!("Event dispatcher stopped listening");
        })
    }

    /// Handle an event with retry logic and timeout
    async fn handle_with_retry(
        handler: Arc<dyn EventHandler>,
        event: ScoreUpdateEvent,
        handler_timeout: Duration,
        max_retries: u32,
        retry_backoff: Duration,
    ) -> Result<(), EventError> {
        let handler_name = handler.name();
        let mut attempt: u32 = 0;

        loop {
            let outcome = match timeout(handler_timeout, handler.handle(&event)).await {
                Ok(result) => result,
                Err(_elapsed) => Err(EventError::Timeout),
            };

            match outcome {
                Ok(()) => {
                    if attempt > 0 {
                        info!(
                            handler = handler_name,
                            player_id = %event.player_id,
                            attempt = attempt + 1,
                            "Handler succeeded after retry"
                        );
                    }
                    return Ok(());
                }
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    warn!(
                        handler = handler_name,
                        player_id = %event.player_id,
                        attempt = attempt + 1,
                        error = %e,
                        "Handler failed, will retry"
                    );

                    // Exponential backoff
                    let delay = retry_backoff.saturating_mul(2_u32.saturating_pow(attempt));
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(
                        handler = handler_name,
                        player_id = %event.player_id,
                        attempt = attempt + 1,
                        error = %e,
                        "Handler failed permanently"
                    );
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::sleep;

    struct CountingHandler {
        name: &'static str,
        call_count: AtomicU32,
    }

    impl CountingHandler {
        fn new(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                call_count: AtomicU32::new(0),
            })
        }

        fn call_count(&self) -> u32 {
            self.call_count.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl EventHandler for CountingHandler {
        async fn handle(&self, _event: &ScoreUpdateEvent) -> Result<(), EventError> {
            self.call_count.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }

        fn name(&self) -> &'static str {
            self.name
        }
    }

    fn sample_event() -> ScoreUpdateEvent {
        ScoreUpdateEvent::new("player-1", "Alice", 12, 1)
    }

    #[tokio::test]
    async fn delivers_each_event_to_every_handler() {
        let event_bus = EventBus::with_default_capacity();
        let mut dispatcher = EventDispatcher::new(event_bus.clone());

        let handler1 = CountingHandler::new("handler1");
        let handler2 = CountingHandler::new("handler2");
        dispatcher.add_handler(handler1.clone());
        dispatcher.add_handler(handler2.clone());

        let _task = dispatcher.start_listening();

        event_bus.publish(sample_event());
        sleep(Duration::from_millis(50)).await;

        assert_eq!(handler1.call_count(), 1);
        assert_eq!(handler2.call_count(), 1);
    }

    struct FailingHandler {
        calls: AtomicU32,
        max_failures: u32,
        retryable: bool,
    }

    impl FailingHandler {
        fn new(max_failures: u32, retryable: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
                max_failures,
                retryable,
            })
        }
    }

    #[async_trait]
    impl EventHandler for FailingHandler {
        async fn handle(&self, _event: &ScoreUpdateEvent) -> Result<(), EventError> {
            let current = self.calls.fetch_add(1, Ordering::Relaxed);
            if current < self.max_failures {
                if self.retryable {
                    Err(EventError::retryable("Simulated failure"))
                } else {
                    Err(EventError::non_retryable("Simulated failure"))
                }
            } else {
                Ok(())
            }
        }

        fn name(&self) -> &'static str {
            "FailingHandler"
        }
    }

    #[tokio::test]
    async fn retries_retryable_failures() {
        let event_bus = EventBus::with_default_capacity();
        let mut dispatcher = EventDispatcher::new(event_bus.clone())
            .with_max_retries(3)
            .with_handler_timeout(Duration::from_millis(100))
            .with_retry_backoff(Duration::from_millis(5));

        // Fails twice then succeeds
        let handler = FailingHandler::new(2, true);
        dispatcher.add_handler(handler.clone());
        let _task = dispatcher.start_listening();

        event_bus.publish(sample_event());
        sleep(Duration::from_millis(200)).await;

        assert_eq!(handler.calls.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let event_bus = EventBus::with_default_capacity();
        let mut dispatcher = EventDispatcher::new(event_bus.clone())
            .with_max_retries(2)
            .with_retry_backoff(Duration::from_millis(5));

        let handler = FailingHandler::new(u32::MAX, true);
        dispatcher.add_handler(handler.clone());
        let _task = dispatcher.start_listening();

        event_bus.publish(sample_event());
        sleep(Duration::from_millis(200)).await;

        assert_eq!(handler.calls.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn does_not_retry_non_retryable_failures() {
        let event_bus = EventBus::with_default_capacity();
        let mut dispatcher = EventDispatcher::new(event_bus.clone()).with_max_retries(3);

        let handler = FailingHandler::new(1, false);
        dispatcher.add_handler(handler.clone());
        let _task = dispatcher.start_listening();

        event_bus.publish(sample_event());
        sleep(Duration::from_millis(100)).await;

        assert_eq!(handler.calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn stops_when_bus_is_dropped() {
        let event_bus = EventBus::with_default_capacity();
        let dispatcher = EventDispatcher::new(event_bus.clone());
        let task = dispatcher.start_listening();

        drop(event_bus);

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("dispatcher should stop once the bus is gone")
            .unwrap();
    }

    #[tokio::test]
    async fn waits_with_growing_backoff_between_retries() {
        let event_bus = EventBus::with_default_capacity();
        let mut dispatcher = EventDispatcher::new(event_bus.clone())
            .with_max_retries(3)
            .with_retry_backoff(Duration::from_millis(100));

        // Fails twice: retries after 100ms and then after 200ms more
        let handler = FailingHandler::new(2, true);
        dispatcher.add_handler(handler.clone());
        let _task = dispatcher.start_listening();

        event_bus.publish(sample_event());

        sleep(Duration::from_millis(50)).await;
        assert_eq!(handler.calls.load(Ordering::Relaxed), 1);

        sleep(Duration::from_millis(100)).await;
        assert_eq!(handler.calls.load(Ordering::Relaxed), 2);

        sleep(Duration::from_millis(250)).await;
        assert_eq!(handler.calls.load(Ordering::Relaxed), 3);
    }

    /// Stalls past the dispatcher timeout on its first call only
    struct StallingHandler {
        calls: AtomicU32,
        completed: AtomicU32,
    }

    #[async_trait]
    impl EventHandler for StallingHandler {
        async fn handle(&self, _event: &ScoreUpdateEvent) -> Result<(), EventError> {
            if self.calls.fetch_add(1, Ordering::Relaxed) == 0 {
                sleep(Duration::from_millis(500)).await;
            }
            self.completed.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }

        fn name(&self) -> &'static str {
            "StallingHandler"
        }
    }

    #[tokio::test]
    async fn retries_after_handler_timeout() {
        let event_bus = EventBus::with_default_capacity();
        let mut dispatcher = EventDispatcher::new(event_bus.clone())
            .with_handler_timeout(Duration::from_millis(50))
            .with_max_retries(1)
            .with_retry_backoff(Duration::from_millis(5));

        let handler = Arc::new(StallingHandler {
            calls: AtomicU32::new(0),
            completed: AtomicU32::new(0),
        });
        dispatcher.add_handler(handler.clone());
        let _task = dispatcher.start_listening();

        event_bus.publish(sample_event());
        sleep(Duration::from_millis(200)).await;

        assert_eq!(handler.calls.load(Ordering::Relaxed), 2);
        // The timed-out attempt was cancelled before it finished
        assert_eq!(handler.completed.load(Ordering::Relaxed), 1);
    }
}
