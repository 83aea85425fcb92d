// Library crate for the cricket player statistics service
// This file exposes the public API for the binary and integration tests

pub mod config;
pub mod event;
pub mod matches;
pub mod player;
pub mod routes;
pub mod shared;
pub mod stats;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use event::{EventBus, EventDispatcher, EventError, EventHandler, ScoreUpdateEvent};
pub use matches::{
    models::{MatchModel, MatchStatus},
    repository::{InMemoryMatchRepository, MatchRepository},
    MatchError,
};
pub use player::{
    models::PlayerStatRecord,
    repository::{InMemoryPlayerStatRepository, PlayerStatRepository},
};
pub use routes::build_router;
pub use shared::{AppError, AppState};
pub use stats::{AggregationEngine, LatestUpdateCache, PlayerStatsView, StatsError};
