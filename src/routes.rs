use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::shared::AppState;
use crate::{matches, player, stats};

/// Builds the HTTP surface over the shared state
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/players", post(player::create_player))
        .route(
            "/players/:id",
            get(player::get_player).put(player::replace_player),
        )
        .route("/players/:id/totals", put(player::update_player_totals))
        .route("/players/email/:email", get(player::find_player_by_email))
        .route(
            "/stats",
            get(stats::handlers::get_all_player_stats).post(stats::handlers::apply_score_update),
        )
        .route("/stats/:id", get(stats::handlers::get_player_stats))
        .route(
            "/stats/:id/history",
            get(stats::handlers::get_player_stats_history),
        )
        .route("/stats/:id/batting", get(stats::handlers::get_batting_stats))
        .route("/stats/:id/bowling", get(stats::handlers::get_bowling_stats))
        .route(
            "/stats/:id/organizer",
            get(stats::handlers::get_organizer_stats),
        )
        .route("/schedule", post(matches::schedule))
        .route(
            "/matches",
            get(matches::list_matches).post(matches::create_match),
        )
        .route("/matches/code/:code", get(matches::get_match_by_code))
        .route(
            "/matches/location/:location",
            get(matches::get_matches_by_location),
        )
        .route("/matches/status/:status", get(matches::get_matches_by_status))
        .route("/matches/:id/start", put(matches::start_match))
        .route("/matches/:id/end", put(matches::end_match))
        .route("/matches/:id/stats", get(matches::get_match_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
