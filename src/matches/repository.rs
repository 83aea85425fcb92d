use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::BTreeMap;
use std::str::FromStr;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::{
    errors::MatchError,
    models::{MatchModel, MatchStatus, NewMatch},
};

/// Trait for match repository operations
#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Persists a new match and returns it with its assigned id
    async fn create_match(&self, new_match: NewMatch) -> Result<MatchModel, MatchError>;
    async fn get_match(&self, id: i64) -> Result<Option<MatchModel>, MatchError>;
    async fn list_matches(&self) -> Result<Vec<MatchModel>, MatchError>;
    async fn find_by_code(&self, code: &str) -> Result<Option<MatchModel>, MatchError>;
    async fn find_by_location(&self, location: &str) -> Result<Vec<MatchModel>, MatchError>;
    async fn find_by_status(&self, status: MatchStatus) -> Result<Vec<MatchModel>, MatchError>;
    async fn save(&self, model: &MatchModel) -> Result<MatchModel, MatchError>;
}

/// In-memory implementation of MatchRepository for development and testing
#[derive(Debug, Default)]
pub struct InMemoryMatchRepository {
    inner: RwLock<MatchTable>,
}

#[derive(Debug, Default)]
struct MatchTable {
    next_id: i64,
    matches: BTreeMap<i64, MatchModel>,
}

impl InMemoryMatchRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn filtered(&self, predicate: impl Fn(&MatchModel) -> bool) -> Vec<MatchModel> {
        let table = self.inner.read().await;
        table
            .matches
            .values()
            .filter(|m| predicate(m))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl MatchRepository for InMemoryMatchRepository {
    #[instrument(skip(self, new_match), fields(code = %new_match.code))]
    async fn create_match(&self, new_match: NewMatch) -> Result<MatchModel, MatchError> {
        let mut table = self.inner.write().await;
        if table.matches.values().any(|m| m.code == new_match.code) {
            warn!("Match code already in use");
            return Err(MatchError::Persistence(format!(
                "Match code {} already exists",
                new_match.code
            )));
        }

        table.next_id += 1;
        let model = new_match.into_model(table.next_id);
        table.matches.insert(model.id, model.clone());

        debug!(match_id = model.id, "Match created in memory");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn get_match(&self, id: i64) -> Result<Option<MatchModel>, MatchError> {
        Ok(self.inner.read().await.matches.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_matches(&self) -> Result<Vec<MatchModel>, MatchError> {
        Ok(self.filtered(|_| true).await)
    }

    #[instrument(skip(self))]
    async fn find_by_code(&self, code: &str) -> Result<Option<MatchModel>, MatchError> {
        Ok(self.filtered(|m| m.code == code).await.into_iter().next())
    }

    #[instrument(skip(self))]
    async fn find_by_location(&self, location: &str) -> Result<Vec<MatchModel>, MatchError> {
        Ok(self.filtered(|m| m.location == location).await)
    }

    #[instrument(skip(self))]
    async fn find_by_status(&self, status: MatchStatus) -> Result<Vec<MatchModel>, MatchError> {
        Ok(self.filtered(|m| m.status == status).await)
    }

    #[instrument(skip(self, model), fields(match_id = model.id))]
    async fn save(&self, model: &MatchModel) -> Result<MatchModel, MatchError> {
        let mut table = self.inner.write().await;
        if !table.matches.contains_key(&model.id) {
            warn!("Match not found for update in memory");
            return Err(MatchError::MatchNotFound(model.id));
        }
        table.matches.insert(model.id, model.clone());

        debug!(status = %model.status, "Match saved in memory");
        Ok(model.clone())
    }
}

const MATCH_COLUMNS: &str =
    "id, code, team1, team2, team_size, location, scheduled_at, status, winner";

/// PostgreSQL implementation of MatchRepository backed by the `matches` table
pub struct PostgresMatchRepository {
    pool: PgPool,
}

impl PostgresMatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn persistence_error(err: sqlx::Error) -> MatchError {
    warn!(error = %err, "Match query failed");
    MatchError::Persistence(err.to_string())
}

fn match_from_row(row: &PgRow) -> Result<MatchModel, MatchError> {
    let status: String = row.try_get("status").map_err(persistence_error)?;
    let status = MatchStatus::from_str(&status)
        .map_err(|_| MatchError::Persistence(format!("Unknown match status '{status}'")))?;

    Ok(MatchModel {
        id: row.try_get("id").map_err(persistence_error)?,
        code: row.try_get("code").map_err(persistence_error)?,
        team1: row.try_get("team1").map_err(persistence_error)?,
        team2: row.try_get("team2").map_err(persistence_error)?,
        team_size: row.try_get("team_size").map_err(persistence_error)?,
        location: row.try_get("location").map_err(persistence_error)?,
        scheduled_at: row.try_get("scheduled_at").map_err(persistence_error)?,
        status,
        winner: row.try_get("winner").map_err(persistence_error)?,
    })
}

#[async_trait]
impl MatchRepository for PostgresMatchRepository {
    #[instrument(skip(self, new_match), fields(code = %new_match.code))]
    async fn create_match(&self, new_match: NewMatch) -> Result<MatchModel, MatchError> {
        let query = format!(
            "INSERT INTO matches (code, team1, team2, team_size, location, scheduled_at, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {MATCH_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(&new_match.code)
            .bind(&new_match.team1)
            .bind(&new_match.team2)
            .bind(new_match.team_size)
            .bind(&new_match.location)
            .bind(new_match.scheduled_at)
            .bind(MatchStatus::Scheduled.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(persistence_error)?;

        match_from_row(&row)
    }

    #[instrument(skip(self))]
    async fn get_match(&self, id: i64) -> Result<Option<MatchModel>, MatchError> {
        let query = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence_error)?;

        row.as_ref().map(match_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn list_matches(&self) -> Result<Vec<MatchModel>, MatchError> {
        let query = format!("SELECT {MATCH_COLUMNS} FROM matches ORDER BY id");
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(persistence_error)?;

        rows.iter().map(match_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn find_by_code(&self, code: &str) -> Result<Option<MatchModel>, MatchError> {
        let query = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE code = $1");
        let row = sqlx::query(&query)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence_error)?;

        row.as_ref().map(match_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_location(&self, location: &str) -> Result<Vec<MatchModel>, MatchError> {
        let query = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE location = $1 ORDER BY id");
        let rows = sqlx::query(&query)
            .bind(location)
            .fetch_all(&self.pool)
            .await
            .map_err(persistence_error)?;

        rows.iter().map(match_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn find_by_status(&self, status: MatchStatus) -> Result<Vec<MatchModel>, MatchError> {
        let query = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE status = $1 ORDER BY id");
        let rows = sqlx::query(&query)
            .bind(status.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(persistence_error)?;

        rows.iter().map(match_from_row).collect()
    }

    #[instrument(skip(self, model), fields(match_id = model.id))]
    async fn save(&self, model: &MatchModel) -> Result<MatchModel, MatchError> {
        let query = format!(
            "UPDATE matches SET code = $2, team1 = $3, team2 = $4, team_size = $5, \
             location = $6, scheduled_at = $7, status = $8, winner = $9 \
             WHERE id = $1 RETURNING {MATCH_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(model.id)
            .bind(&model.code)
            .bind(&model.team1)
            .bind(&model.team2)
            .bind(model.team_size)
            .bind(&model.location)
            .bind(model.scheduled_at)
            .bind(model.status.to_string())
            .bind(&model.winner)
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence_error)?;

        match row {
            Some(row) => match_from_row(&row),
            None => Err(MatchError::MatchNotFound(model.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_match(code: &str, location: &str) -> NewMatch {
        NewMatch {
            code: code.to_string(),
            team1: "Chennai".to_string(),
            team2: "Kolkata".to_string(),
            team_size: 11,
            location: location.to_string(),
            scheduled_at: None,
        }
    }

    #[tokio::test]
    async fn assigns_sequential_ids() {
        let repo = InMemoryMatchRepository::new();
        let first = repo.create_match(new_match("a", "Chepauk")).await.unwrap();
        let second = repo.create_match(new_match("b", "Eden")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.list_matches().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn rejects_duplicate_codes() {
        let repo = InMemoryMatchRepository::new();
        repo.create_match(new_match("a", "Chepauk")).await.unwrap();

        let err = repo.create_match(new_match("a", "Eden")).await.unwrap_err();
        assert!(matches!(err, MatchError::Persistence(_)));
    }

    #[tokio::test]
    async fn finds_by_code_location_and_status() {
        let repo = InMemoryMatchRepository::new();
        repo.create_match(new_match("a", "Chepauk")).await.unwrap();
        let mut second = repo.create_match(new_match("b", "Eden")).await.unwrap();
        repo.create_match(new_match("c", "Eden")).await.unwrap();

        second.status = MatchStatus::Ongoing;
        repo.save(&second).await.unwrap();

        assert_eq!(repo.find_by_code("b").await.unwrap().unwrap().id, 2);
        assert!(repo.find_by_code("zzz").await.unwrap().is_none());
        assert_eq!(repo.find_by_location("Eden").await.unwrap().len(), 2);

        let ongoing = repo.find_by_status(MatchStatus::Ongoing).await.unwrap();
        assert_eq!(ongoing.len(), 1);
        assert_eq!(ongoing[0].code, "b");
    }

    #[tokio::test]
    async fn save_on_unknown_match_fails() {
        let repo = InMemoryMatchRepository::new();
        let ghost = new_match("ghost", "Nowhere").into_model(7);

        let err = repo.save(&ghost).await.unwrap_err();
        assert!(matches!(err, MatchError::MatchNotFound(7)));
    }
}
