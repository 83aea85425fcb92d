use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::{
    models::PlayerStatRecord,
    types::{CreatePlayerRequest, ReplacePlayerRequest, UpdateTotalsRequest},
};
use crate::shared::{AppError, AppState};

/// POST /players
#[instrument(name = "create_player", skip(state, request))]
pub async fn create_player(
    State(state): State<AppState>,
    Json(request): Json<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<PlayerStatRecord>), AppError> {
    let player = state.player_service.create_player(request).await?;
    info!(player_id = %player.player_id, "Player created");
    Ok((StatusCode::CREATED, Json(player)))
}

/// GET /players/:id
#[instrument(name = "get_player", skip(state))]
pub async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<PlayerStatRecord>, AppError> {
    Ok(Json(state.player_service.get_player(&player_id).await?))
}

/// GET /players/email/:email
#[instrument(name = "find_player_by_email", skip(state))]
pub async fn find_player_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<PlayerStatRecord>, AppError> {
    Ok(Json(state.player_service.find_by_email(&email).await?))
}

/// PUT /players/:id
#[instrument(name = "replace_player", skip(state, request))]
pub async fn replace_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    Json(request): Json<ReplacePlayerRequest>,
) -> Result<Json<PlayerStatRecord>, AppError> {
    Ok(Json(
        state
            .player_service
            .replace_player(&player_id, request)
            .await?,
    ))
}

/// PUT /players/:id/totals
#[instrument(name = "update_player_totals", skip(state))]
pub async fn update_player_totals(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    Json(totals): Json<UpdateTotalsRequest>,
) -> Result<Json<PlayerStatRecord>, AppError> {
    Ok(Json(
        state.player_service.update_totals(&player_id, totals).await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::{get, post},
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    fn app() -> Router {
        Router::new()
            .route("/players", post(create_player))
            .route("/players/:id", get(get_player).put(replace_player))
            .with_state(AppStateBuilder::new().build())
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_player_handler() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/players",
                r#"{"player_id": "p-1", "player_name": "Richa", "player_email": "rg@example.com"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let player: PlayerStatRecord = serde_json::from_slice(&body).unwrap();
        assert_eq!(player.player_id, "p-1");
        assert_eq!(player.total_runs, 0);
    }

    #[tokio::test]
    async fn test_create_player_handler_invalid_email() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/players",
                r#"{"player_name": "Richa", "player_email": "not-an-email"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_player_handler_missing_fields() {
        let response = app()
            .oneshot(json_request("POST", "/players", r#"{"player_name": "Richa"}"#))
            .await
            .unwrap();

        // Missing player_email
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_get_unknown_player_handler() {
        let request = Request::builder()
            .uri("/players/ghost")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
