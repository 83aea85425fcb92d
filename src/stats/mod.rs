// Stat-aggregation core
//
// AggregationEngine folds score updates into the durable player records and
// then refreshes the LatestUpdateCache; StatQueryService composes both into
// the read views.

pub mod cache;
pub mod engine;
pub mod handlers;
pub mod locks;
pub mod models;
pub mod query;
pub mod subscriber;

mod errors;

pub use cache::LatestUpdateCache;
pub use engine::AggregationEngine;
pub use errors::StatsError;
pub use locks::PlayerLocks;
pub use models::*;
pub use query::StatQueryService;
pub use subscriber::ScoreUpdateHandler;
