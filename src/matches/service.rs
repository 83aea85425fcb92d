use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tracing::{debug, info, instrument, warn};

use super::{
    errors::MatchError,
    models::{MatchModel, MatchStatus, NewMatch},
    repository::MatchRepository,
    types::{MatchCreateRequest, PlayerStatsPayload, ScheduleResponse},
};
use crate::event::{EventBus, ScoreUpdateEvent};

/// Service for match lifecycle and score publication
///
/// Status transitions on one match run under that match's mutex, so the
/// check against the stored status and the save never interleave with
/// another transition.
pub struct MatchService {
    repository: Arc<dyn MatchRepository>,
    event_bus: EventBus,
    match_mutexes: RwLock<HashMap<i64, Arc<AsyncMutex<()>>>>,
}

impl MatchService {
    pub fn new(repository: Arc<dyn MatchRepository>, event_bus: EventBus) -> Self {
        Self {
            repository,
            event_bus,
            match_mutexes: RwLock::new(HashMap::new()),
        }
    }

    /// Publishes the payload as a score update without validating it
    #[instrument(skip(self, payload), fields(player_id = %payload.player_id))]
    pub fn schedule(&self, payload: PlayerStatsPayload) -> ScheduleResponse {
        let event = ScoreUpdateEvent::from(payload);
        let player_id = event.player_id.clone();
        let receivers = self.event_bus.publish(event);

        info!(receivers, "Score update scheduled");
        ScheduleResponse {
            message: "Score update scheduled".to_string(),
            player_id,
            receivers,
        }
    }

    #[instrument(skip(self, request))]
    pub async fn create_match(&self, request: MatchCreateRequest) -> Result<MatchModel, MatchError> {
        if request.team1.trim().is_empty() || request.team2.trim().is_empty() {
            return Err(MatchError::Validation("both teams must be named".to_string()));
        }
        if request.team_size <= 0 {
            return Err(MatchError::Validation(format!(
                "team_size must be positive, got {}",
                request.team_size
            )));
        }

        let code = request
            .code
            .filter(|code| !code.trim().is_empty())
            .unwrap_or_else(|| petname::Petnames::default().generate_one(2, "-"));
        debug!(code = %code, "Creating match");

        let created = self
            .repository
            .create_match(NewMatch {
                code,
                team1: request.team1,
                team2: request.team2,
                team_size: request.team_size,
                location: request.location,
                scheduled_at: request.scheduled_at,
            })
            .await?;

        info!(match_id = created.id, code = %created.code, "Match created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn start_match(&self, id: i64) -> Result<MatchModel, MatchError> {
        self.transition(id, MatchStatus::Ongoing, None).await
    }

    #[instrument(skip(self))]
    pub async fn end_match(&self, id: i64, winner: String) -> Result<MatchModel, MatchError> {
        self.transition(id, MatchStatus::Completed, Some(winner)).await
    }

    /// Returns the match itself; per-match stats are not tracked separately
    #[instrument(skip(self))]
    pub async fn get_match_stats(&self, id: i64) -> Result<MatchModel, MatchError> {
        self.repository
            .get_match(id)
            .await?
            .ok_or(MatchError::MatchNotFound(id))
    }

    pub async fn list_matches(&self) -> Result<Vec<MatchModel>, MatchError> {
        self.repository.list_matches().await
    }

    pub async fn get_match_by_code(&self, code: &str) -> Result<Option<MatchModel>, MatchError> {
        self.repository.find_by_code(code).await
    }

    pub async fn get_matches_by_location(
        &self,
        location: &str,
    ) -> Result<Vec<MatchModel>, MatchError> {
        self.repository.find_by_location(location).await
    }

    pub async fn get_matches_by_status(&self, status: &str) -> Result<Vec<MatchModel>, MatchError> {
        let status = MatchStatus::from_str(status)
            .map_err(|_| MatchError::Validation(format!("unknown match status '{status}'")))?;
        self.repository.find_by_status(status).await
    }

    async fn transition(
        &self,
        id: i64,
        next: MatchStatus,
        winner: Option<String>,
    ) -> Result<MatchModel, MatchError> {
        let match_lock = self.match_lock(id).await;
        let guard = match_lock.lock().await;

        let mut model = match self.repository.get_match(id).await? {
            Some(model) => model,
            None => {
                drop(guard);
                self.clear_match_lock(id, &match_lock).await;
                warn!(match_id = id, "Match not found");
                return Err(MatchError::MatchNotFound(id));
            }
        };

        if !model.status.can_transition_to(next) {
            warn!(match_id = id, from = %model.status, to = %next, "Rejected match transition");
            return Err(MatchError::InvalidTransition {
                id,
                from: model.status,
                to: next,
            });
        }

        let previous = model.status;
        model.status = next;
        if winner.is_some() {
            model.winner = winner;
        }

        let saved = self.repository.save(&model).await?;
        info!(match_id = id, from = %previous, to = %next, "Match status changed");
        Ok(saved)
    }

    async fn match_lock(&self, id: i64) -> Arc<AsyncMutex<()>> {
        {
            let guard = self.match_mutexes.read().await;
            if let Some(lock) = guard.get(&id) {
                return lock.clone();
            }
        }

        let mut guard = self.match_mutexes.write().await;
        guard
            .entry(id)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    async fn clear_match_lock(&self, id: i64, lock: &Arc<AsyncMutex<()>>) {
        let mut guard = self.match_mutexes.write().await;
        if guard
            .get(&id)
            .is_some_and(|registered| Arc::ptr_eq(registered, lock) && Arc::strong_count(lock) == 2)
        {
            guard.remove(&id);
        }
    }
}
