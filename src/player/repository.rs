use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::PlayerStatRecord;
use crate::stats::StatsError;

/// Durable store of per-player statistics
///
/// Every failure of the backing store surfaces as `StatsError::Persistence`.
#[async_trait]
pub trait PlayerStatRepository: Send + Sync {
    async fn find_by_id(&self, player_id: &str) -> Result<Option<PlayerStatRecord>, StatsError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<PlayerStatRecord>, StatsError>;
    async fn find_all(&self) -> Result<Vec<PlayerStatRecord>, StatsError>;

    /// Registers a new record, failing if the player id is already taken
    async fn insert(&self, record: &PlayerStatRecord) -> Result<PlayerStatRecord, StatsError>;

    /// Upserts the record and returns its canonical persisted form
    async fn save(&self, record: &PlayerStatRecord) -> Result<PlayerStatRecord, StatsError>;
}

/// In-memory implementation of PlayerStatRepository for development and testing
#[derive(Debug, Default)]
pub struct InMemoryPlayerStatRepository {
    records: Arc<RwLock<HashMap<String, PlayerStatRecord>>>,
}

impl InMemoryPlayerStatRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Creates an in-memory repository with pre-populated records
    pub fn with_records(records: Vec<PlayerStatRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.player_id.clone(), record))
            .collect();

        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl PlayerStatRepository for InMemoryPlayerStatRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, player_id: &str) -> Result<Option<PlayerStatRecord>, StatsError> {
        let records = self.records.read().await;
        let record = records.get(player_id).cloned();

        match &record {
            Some(_) => debug!(player_id = %player_id, "Player record found in memory"),
            None => debug!(player_id = %player_id, "Player record not found in memory"),
        }

        Ok(record)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<PlayerStatRecord>, StatsError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|record| record.player_email == email)
            .cloned())
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<PlayerStatRecord>, StatsError> {
        let records = self.records.read().await;
        let mut all: Vec<PlayerStatRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| a.player_id.cmp(&b.player_id));
        Ok(all)
    }

    #[instrument(skip(self, record), fields(player_id = %record.player_id))]
    async fn insert(&self, record: &PlayerStatRecord) -> Result<PlayerStatRecord, StatsError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.player_id) {
            warn!("Player record already exists in memory");
            return Err(StatsError::Persistence(format!(
                "Player {} already exists",
                record.player_id
            )));
        }
        records.insert(record.player_id.clone(), record.clone());

        debug!("Player record created in memory");
        Ok(record.clone())
    }

    #[instrument(skip(self, record), fields(player_id = %record.player_id))]
    async fn save(&self, record: &PlayerStatRecord) -> Result<PlayerStatRecord, StatsError> {
        let mut records = self.records.write().await;
        records.insert(record.player_id.clone(), record.clone());

        debug!("Player record saved in memory");
        Ok(record.clone())
    }
}

const SELECT_COLUMNS: &str = "player_id, player_name, player_email, team_id, total_runs, \
     total_wickets, total_matches, highest_runs, highest_wickets, current_runs, \
     current_wickets, matches_organized, sponsors, support_staff";

/// PostgreSQL implementation of PlayerStatRepository backed by the `player_stats` table
pub struct PostgresPlayerStatRepository {
    pool: PgPool,
}

impl PostgresPlayerStatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn persistence_error(err: sqlx::Error) -> StatsError {
    warn!(error = %err, "Player stats query failed");
    StatsError::Persistence(err.to_string())
}

#[async_trait]
impl PlayerStatRepository for PostgresPlayerStatRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, player_id: &str) -> Result<Option<PlayerStatRecord>, StatsError> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM player_stats WHERE player_id = $1");
        sqlx::query_as::<_, PlayerStatRecord>(&query)
            .bind(player_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence_error)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<PlayerStatRecord>, StatsError> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM player_stats WHERE player_email = $1");
        sqlx::query_as::<_, PlayerStatRecord>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence_error)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<PlayerStatRecord>, StatsError> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM player_stats ORDER BY player_id");
        sqlx::query_as::<_, PlayerStatRecord>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(persistence_error)
    }

    #[instrument(skip(self, record), fields(player_id = %record.player_id))]
    async fn insert(&self, record: &PlayerStatRecord) -> Result<PlayerStatRecord, StatsError> {
        let query = format!(
            "INSERT INTO player_stats ({SELECT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {SELECT_COLUMNS}"
        );
        bind_record(sqlx::query_as::<_, PlayerStatRecord>(&query), record)
            .fetch_one(&self.pool)
            .await
            .map_err(persistence_error)
    }

    #[instrument(skip(self, record), fields(player_id = %record.player_id))]
    async fn save(&self, record: &PlayerStatRecord) -> Result<PlayerStatRecord, StatsError> {
        let query = format!(
            "INSERT INTO player_stats ({SELECT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             ON CONFLICT (player_id) DO UPDATE SET \
                 player_name = EXCLUDED.player_name, \
                 player_email = EXCLUDED.player_email, \
                 team_id = EXCLUDED.team_id, \
                 total_runs = EXCLUDED.total_runs, \
                 total_wickets = EXCLUDED.total_wickets, \
                 total_matches = EXCLUDED.total_matches, \
                 highest_runs = EXCLUDED.highest_runs, \
                 highest_wickets = EXCLUDED.highest_wickets, \
                 current_runs = EXCLUDED.current_runs, \
                 current_wickets = EXCLUDED.current_wickets, \
                 matches_organized = EXCLUDED.matches_organized, \
                 sponsors = EXCLUDED.sponsors, \
                 support_staff = EXCLUDED.support_staff \
             RETURNING {SELECT_COLUMNS}"
        );
        bind_record(sqlx::query_as::<_, PlayerStatRecord>(&query), record)
            .fetch_one(&self.pool)
            .await
            .map_err(persistence_error)
    }
}

type RecordQuery<'q> =
    sqlx::query::QueryAs<'q, sqlx::Postgres, PlayerStatRecord, sqlx::postgres::PgArguments>;

fn bind_record<'q>(query: RecordQuery<'q>, record: &'q PlayerStatRecord) -> RecordQuery<'q> {
    query
        .bind(&record.player_id)
        .bind(&record.player_name)
        .bind(&record.player_email)
        .bind(&record.team_id)
        .bind(record.total_runs)
        .bind(record.total_wickets)
        .bind(record.total_matches)
        .bind(record.highest_runs)
        .bind(record.highest_wickets)
        .bind(record.current_runs)
        .bind(record.current_wickets)
        .bind(record.matches_organized)
        .bind(record.sponsors)
        .bind(record.support_staff)
}
