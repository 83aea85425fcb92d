use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::event::EventBus;
use crate::matches::{repository::MatchRepository, service::MatchService, MatchError};
use crate::player::{repository::PlayerStatRepository, service::PlayerService};
use crate::stats::{
    AggregationEngine, LatestUpdateCache, PlayerLocks, ScoreUpdateHandler, StatQueryService,
    StatsError,
};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub player_service: Arc<PlayerService>,
    pub stats_query: Arc<StatQueryService>,
    pub engine: Arc<AggregationEngine>,
    pub match_service: Arc<MatchService>,
    pub cache: Arc<LatestUpdateCache>,
    pub event_bus: EventBus,
}

impl AppState {
    /// Wires the services over the given stores
    ///
    /// The player service and the aggregation engine share one lock
    /// registry so that owner writes and event merges on the same player
    /// are serialized.
    pub fn new(
        player_repository: Arc<dyn PlayerStatRepository>,
        match_repository: Arc<dyn MatchRepository>,
        event_bus: EventBus,
    ) -> Self {
        let cache = Arc::new(LatestUpdateCache::new());
        let locks = Arc::new(PlayerLocks::new());

        Self {
            player_service: Arc::new(PlayerService::new(
                player_repository.clone(),
                locks.clone(),
            )),
            stats_query: Arc::new(StatQueryService::new(
                player_repository.clone(),
                cache.clone(),
            )),
            engine: Arc::new(AggregationEngine::new(
                player_repository,
                cache.clone(),
                locks,
            )),
            match_service: Arc::new(MatchService::new(match_repository, event_bus.clone())),
            cache,
            event_bus,
        }
    }

    /// Event handler that feeds this state's aggregation engine
    pub fn score_update_handler(&self) -> Arc<ScoreUpdateHandler> {
        Arc::new(ScoreUpdateHandler::new(self.engine.clone()))
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Match(#[from] MatchError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Stats(StatsError::PlayerNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Stats(StatsError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Stats(StatsError::Persistence(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Match(MatchError::MatchNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Match(MatchError::InvalidTransition { .. }) => StatusCode::CONFLICT,
            AppError::Match(MatchError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Match(MatchError::Persistence(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
