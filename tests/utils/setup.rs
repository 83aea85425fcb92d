use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crickstats::{
    matches::repository::InMemoryMatchRepository,
    player::{
        models::PlayerStatRecord,
        repository::{InMemoryPlayerStatRepository, PlayerStatRepository},
    },
    AppState, EventBus, EventDispatcher,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// Application state with a running dispatcher feeding the aggregation engine
pub struct TestSetup {
    pub state: AppState,
    pub player_repository: Arc<dyn PlayerStatRepository>,
    pub _dispatcher_handle: JoinHandle<()>,
}

pub struct TestSetupBuilder {
    players: Vec<PlayerStatRecord>,
    player_repository: Option<Arc<dyn PlayerStatRepository>>,
    max_retries: u32,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![],
            player_repository: None,
            max_retries: 3,
        }
    }

    pub fn with_player(mut self, id: &str, name: &str) -> Self {
        self.players.push(PlayerStatRecord::new(
            id,
            name,
            format!("{id}@example.com"),
        ));
        self
    }

    #[allow(dead_code)]
    pub fn with_player_record(mut self, record: PlayerStatRecord) -> Self {
        self.players.push(record);
        self
    }

    #[allow(dead_code)]
    pub fn with_player_repository(mut self, repo: Arc<dyn PlayerStatRepository>) -> Self {
        self.player_repository = Some(repo);
        self
    }

    #[allow(dead_code)]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn build(self) -> TestSetup {
        let player_repository = self.player_repository.unwrap_or_else(|| {
            Arc::new(InMemoryPlayerStatRepository::with_records(self.players))
        });
        let event_bus = EventBus::new(256);
        let state = AppState::new(
            player_repository.clone(),
            Arc::new(InMemoryMatchRepository::new()),
            event_bus.clone(),
        );

        let mut dispatcher = EventDispatcher::new(event_bus)
            .with_handler_timeout(Duration::from_millis(500))
            .with_max_retries(self.max_retries)
            .with_retry_backoff(Duration::from_millis(10));
        dispatcher.add_handler(state.score_update_handler());
        let _dispatcher_handle = dispatcher.start_listening();

        TestSetup {
            state,
            player_repository,
            _dispatcher_handle,
        }
    }
}

/// Polls `check` until it returns true or two seconds pass
#[allow(dead_code)]
pub async fn wait_for<F, Fut>(check: F) -> bool
where
    F: Fn() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}
