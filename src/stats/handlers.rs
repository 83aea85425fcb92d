use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::models::{BattingStats, BowlingStats, OrganizerStats, PlayerStatsView};
use crate::event::ScoreUpdateEvent;
use crate::player::models::PlayerStatRecord;
use crate::shared::{AppError, AppState};

/// GET /stats
///
/// Record-derived views followed by cache-derived views; a player with a
/// pending latest update appears twice.
#[instrument(name = "get_all_player_stats", skip(state))]
pub async fn get_all_player_stats(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlayerStatsView>>, AppError> {
    let views = state.stats_query.get_all_player_stats().await?;
    info!(view_count = views.len(), "Listed player stats");
    Ok(Json(views))
}

/// POST /stats
///
/// Applies a score update synchronously and returns the persisted record.
#[instrument(name = "apply_score_update", skip(state, event), fields(player_id = %event.player_id))]
pub async fn apply_score_update(
    State(state): State<AppState>,
    Json(event): Json<ScoreUpdateEvent>,
) -> Result<Json<PlayerStatRecord>, AppError> {
    Ok(Json(state.engine.apply(event).await?))
}

/// GET /stats/:id
#[instrument(name = "get_player_stats", skip(state))]
pub async fn get_player_stats(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<PlayerStatsView>, AppError> {
    Ok(Json(state.stats_query.get_player_stats(&player_id).await?))
}

/// GET /stats/:id/history
#[instrument(name = "get_player_stats_history", skip(state))]
pub async fn get_player_stats_history(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<Vec<PlayerStatsView>>, AppError> {
    Ok(Json(
        state
            .stats_query
            .get_player_stats_by_user_id(&player_id)
            .await?,
    ))
}

/// GET /stats/:id/batting
#[instrument(name = "get_batting_stats", skip(state))]
pub async fn get_batting_stats(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<BattingStats>, AppError> {
    Ok(Json(state.stats_query.get_batting_stats(&player_id).await?))
}

/// GET /stats/:id/bowling
#[instrument(name = "get_bowling_stats", skip(state))]
pub async fn get_bowling_stats(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<BowlingStats>, AppError> {
    Ok(Json(state.stats_query.get_bowling_stats(&player_id).await?))
}

/// GET /stats/:id/organizer
#[instrument(name = "get_organizer_stats", skip(state))]
pub async fn get_organizer_stats(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<OrganizerStats>, AppError> {
    Ok(Json(
        state.stats_query.get_organizer_stats(&player_id).await?,
    ))
}
