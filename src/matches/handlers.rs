use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::{
    errors::MatchError,
    models::MatchModel,
    types::{EndMatchRequest, MatchCreateRequest, PlayerStatsPayload, ScheduleResponse},
};
use crate::shared::{AppError, AppState};

/// POST /schedule
#[instrument(name = "schedule_score_update", skip(state, payload))]
pub async fn schedule(
    State(state): State<AppState>,
    Json(payload): Json<PlayerStatsPayload>,
) -> (StatusCode, Json<ScheduleResponse>) {
    (
        StatusCode::ACCEPTED,
        Json(state.match_service.schedule(payload)),
    )
}

/// POST /matches
#[instrument(name = "create_match", skip(state, request))]
pub async fn create_match(
    State(state): State<AppState>,
    Json(request): Json<MatchCreateRequest>,
) -> Result<(StatusCode, Json<MatchModel>), AppError> {
    let created = state.match_service.create_match(request).await?;
    info!(match_id = created.id, "Match created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /matches
#[instrument(name = "list_matches", skip(state))]
pub async fn list_matches(
    State(state): State<AppState>,
) -> Result<Json<Vec<MatchModel>>, AppError> {
    Ok(Json(state.match_service.list_matches().await?))
}

/// GET /matches/code/:code
#[instrument(name = "get_match_by_code", skip(state))]
pub async fn get_match_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<MatchModel>, AppError> {
    state
        .match_service
        .get_match_by_code(&code)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No match with code {code}")))
}

/// GET /matches/location/:location
#[instrument(name = "get_matches_by_location", skip(state))]
pub async fn get_matches_by_location(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> Result<Json<Vec<MatchModel>>, AppError> {
    Ok(Json(
        state.match_service.get_matches_by_location(&location).await?,
    ))
}

/// GET /matches/status/:status
#[instrument(name = "get_matches_by_status", skip(state))]
pub async fn get_matches_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<MatchModel>>, AppError> {
    Ok(Json(
        state.match_service.get_matches_by_status(&status).await?,
    ))
}

/// PUT /matches/:id/start
#[instrument(name = "start_match", skip(state))]
pub async fn start_match(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MatchModel>, AppError> {
    Ok(Json(state.match_service.start_match(id).await?))
}

/// PUT /matches/:id/end
#[instrument(name = "end_match", skip(state, request))]
pub async fn end_match(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<EndMatchRequest>,
) -> Result<Json<MatchModel>, AppError> {
    if request.winner.trim().is_empty() {
        return Err(MatchError::Validation("winner must not be empty".to_string()).into());
    }
    Ok(Json(
        state.match_service.end_match(id, request.winner).await?,
    ))
}

/// GET /matches/:id/stats
#[instrument(name = "get_match_stats", skip(state))]
pub async fn get_match_stats(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MatchModel>, AppError> {
    Ok(Json(state.match_service.get_match_stats(id).await?))
}
