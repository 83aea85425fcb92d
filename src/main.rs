use crickstats::{
    config::AppConfig,
    matches::repository::{InMemoryMatchRepository, MatchRepository, PostgresMatchRepository},
    player::repository::{
        InMemoryPlayerStatRepository, PlayerStatRepository, PostgresPlayerStatRepository,
    },
    AppState, EventBus, EventDispatcher,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crickstats=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cricket stats service");
    let config = AppConfig::from_env();

    let (player_repository, match_repository): (
        Arc<dyn PlayerStatRepository>,
        Arc<dyn MatchRepository>,
    ) = match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(database_url).await?;
            info!("Using PostgreSQL repositories");
            (
                Arc::new(PostgresPlayerStatRepository::new(pool.clone())),
                Arc::new(PostgresMatchRepository::new(pool)),
            )
        }
        None => {
            info!("DATABASE_URL not set, using in-memory repositories");
            (
                Arc::new(InMemoryPlayerStatRepository::new()),
                Arc::new(InMemoryMatchRepository::new()),
            )
        }
    };

    let event_bus = EventBus::new(config.event_capacity);
    let app_state = AppState::new(player_repository, match_repository, event_bus.clone());

    let mut dispatcher = EventDispatcher::new(event_bus)
        .with_handler_timeout(config.handler_timeout)
        .with_max_retries(config.handler_max_retries)
        .with_retry_backoff(config.retry_backoff);
    dispatcher.add_handler(app_state.score_update_handler());
    let _dispatcher_task = dispatcher.start_listening();

    let app = crickstats::build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
