use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    models::PlayerStatRecord,
    repository::PlayerStatRepository,
    types::{CreatePlayerRequest, ReplacePlayerRequest, UpdateTotalsRequest},
};
use crate::stats::{PlayerLocks, StatsError};

/// Service for player registration and owner-initiated record changes
///
/// Writes to an existing record take the same per-player lock as the
/// aggregation engine, so a replace never interleaves with an event merge.
pub struct PlayerService {
    repository: Arc<dyn PlayerStatRepository>,
    locks: Arc<PlayerLocks>,
}

impl PlayerService {
    pub fn new(repository: Arc<dyn PlayerStatRepository>, locks: Arc<PlayerLocks>) -> Self {
        Self { repository, locks }
    }

    #[instrument(skip(self, request), fields(player_name = %request.player_name))]
    pub async fn create_player(
        &self,
        request: CreatePlayerRequest,
    ) -> Result<PlayerStatRecord, StatsError> {
        validate_profile(&request.player_name, &request.player_email)?;

        let player_id = match request.player_id {
            Some(id) if !id.trim().is_empty() => id,
            Some(_) => {
                return Err(StatsError::Validation(
                    "player_id must not be blank".to_string(),
                ))
            }
            None => Uuid::new_v4().to_string(),
        };
        debug!(player_id = %player_id, "Registering player");

        let mut record =
            PlayerStatRecord::new(player_id, request.player_name, request.player_email);
        record.team_id = request.team_id;

        let created = self.repository.insert(&record).await?;
        info!(player_id = %created.player_id, "Player registered");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_player(&self, player_id: &str) -> Result<PlayerStatRecord, StatsError> {
        self.repository
            .find_by_id(player_id)
            .await?
            .ok_or_else(|| StatsError::PlayerNotFound(player_id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<PlayerStatRecord, StatsError> {
        self.repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| StatsError::PlayerNotFound(email.to_string()))
    }

    /// Replaces profile, totals, maxima and organizer fields of an existing player
    #[instrument(skip(self, request))]
    pub async fn replace_player(
        &self,
        player_id: &str,
        request: ReplacePlayerRequest,
    ) -> Result<PlayerStatRecord, StatsError> {
        validate_profile(&request.player_name, &request.player_email)?;

        let player_lock = self.locks.lock_for(player_id).await;
        let _guard = player_lock.lock().await;

        let mut record = self.get_player(player_id).await?;
        record.player_name = request.player_name;
        record.player_email = request.player_email;
        record.team_id = request.team_id;
        record.total_runs = request.total_runs;
        record.total_wickets = request.total_wickets;
        record.total_matches = request.total_matches;
        record.highest_runs = request.highest_runs;
        record.highest_wickets = request.highest_wickets;
        record.matches_organized = request.matches_organized;
        record.sponsors = request.sponsors;
        record.support_staff = request.support_staff;

        let saved = self.repository.save(&record).await?;
        info!(player_id = %player_id, "Player record replaced");
        Ok(saved)
    }

    /// Overwrites the cumulative totals and maxima of an existing player
    #[instrument(skip(self))]
    pub async fn update_totals(
        &self,
        player_id: &str,
        totals: UpdateTotalsRequest,
    ) -> Result<PlayerStatRecord, StatsError> {
        let player_lock = self.locks.lock_for(player_id).await;
        let _guard = player_lock.lock().await;

        let mut record = self.get_player(player_id).await?;
        record.total_runs = totals.total_runs;
        record.total_wickets = totals.total_wickets;
        record.total_matches = totals.total_matches;
        record.highest_runs = totals.highest_runs;
        record.highest_wickets = totals.highest_wickets;

        let saved = self.repository.save(&record).await?;
        info!(player_id = %player_id, "Player totals updated");
        Ok(saved)
    }
}

fn validate_profile(player_name: &str, player_email: &str) -> Result<(), StatsError> {
    if player_name.trim().is_empty() {
        warn!("Rejecting player with empty name");
        return Err(StatsError::Validation(
            "player_name must not be empty".to_string(),
        ));
    }
    if !player_email.contains('@') {
        warn!(player_email = %player_email, "Rejecting player with invalid email");
        return Err(StatsError::Validation(format!(
            "player_email '{player_email}' is not a valid address"
        )));
    }
    Ok(())
}
