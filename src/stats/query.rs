use std::sync::Arc;
use tracing::{debug, instrument};

use super::{
    cache::LatestUpdateCache,
    models::{BattingStats, BowlingStats, OrganizerStats, PlayerStatsView},
    StatsError,
};
use crate::player::{models::PlayerStatRecord, repository::PlayerStatRepository};

/// Read side over the durable records and the latest-update cache
///
/// Cache reads are snapshots; a view may show current values fresher than
/// its totals, never the other way round.
pub struct StatQueryService {
    repository: Arc<dyn PlayerStatRepository>,
    cache: Arc<LatestUpdateCache>,
}

impl StatQueryService {
    pub fn new(repository: Arc<dyn PlayerStatRepository>, cache: Arc<LatestUpdateCache>) -> Self {
        Self { repository, cache }
    }

    /// Record fields, with current runs/wickets taken from the cache when present
    #[instrument(skip(self))]
    pub async fn get_player_stats(&self, player_id: &str) -> Result<PlayerStatsView, StatsError> {
        let record = self.require_record(player_id).await?;
        let view = PlayerStatsView::from_record(&record);

        Ok(match self.cache.get(player_id) {
            Some(latest) => {
                debug!(player_id = %player_id, "Serving current values from latest update");
                view.with_current_from(&latest)
            }
            None => view,
        })
    }

    /// One record-derived view per stored player followed by one
    /// cache-derived view per cached player
    ///
    /// A player with a cached update therefore appears twice, once per
    /// shape. Callers tell them apart by the zeroed totals of the cached one.
    #[instrument(skip(self))]
    pub async fn get_all_player_stats(&self) -> Result<Vec<PlayerStatsView>, StatsError> {
        let records = self.repository.find_all().await?;
        let latest = self.cache.all_entries();

        let mut views: Vec<PlayerStatsView> =
            records.iter().map(PlayerStatsView::from_record).collect();
        views.extend(latest.iter().map(|(_, event)| PlayerStatsView::from_event(event)));

        debug!(
            record_views = records.len(),
            cached_views = latest.len(),
            "Collected all player stats"
        );
        Ok(views)
    }

    /// The record-derived view, followed by the cached view for the same player if any
    #[instrument(skip(self))]
    pub async fn get_player_stats_by_user_id(
        &self,
        player_id: &str,
    ) -> Result<Vec<PlayerStatsView>, StatsError> {
        let record = self.require_record(player_id).await?;

        let mut views = vec![PlayerStatsView::from_record(&record)];
        if let Some(latest) = self.cache.get(player_id) {
            views.push(PlayerStatsView::from_event(&latest));
        }
        Ok(views)
    }

    #[instrument(skip(self))]
    pub async fn get_batting_stats(&self, player_id: &str) -> Result<BattingStats, StatsError> {
        let record = self.require_record(player_id).await?;
        Ok(BattingStats::from(&record))
    }

    #[instrument(skip(self))]
    pub async fn get_bowling_stats(&self, player_id: &str) -> Result<BowlingStats, StatsError> {
        let record = self.require_record(player_id).await?;
        Ok(BowlingStats::from(&record))
    }

    #[instrument(skip(self))]
    pub async fn get_organizer_stats(&self, player_id: &str) -> Result<OrganizerStats, StatsError> {
        let record = self.require_record(player_id).await?;
        Ok(OrganizerStats::from(&record))
    }

    async fn require_record(&self, player_id: &str) -> Result<PlayerStatRecord, StatsError> {
        self.repository
            .find_by_id(player_id)
            .await?
            .ok_or_else(|| StatsError::PlayerNotFound(player_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ScoreUpdateEvent;
    use crate::player::repository::InMemoryPlayerStatRepository;

    fn stored_player() -> PlayerStatRecord {
        PlayerStatRecord {
            total_runs: 120,
            total_wickets: 6,
            total_matches: 4,
            highest_runs: 55,
            highest_wickets: 3,
            current_runs: 10,
            current_wickets: 1,
            matches_organized: 2,
            sponsors: 5,
            support_staff: 7,
            ..PlayerStatRecord::new("p-1", "Jemimah", "jr@example.com")
        }
    }

    fn service_with(cache: Arc<LatestUpdateCache>) -> StatQueryService {
        let repo = Arc::new(InMemoryPlayerStatRepository::with_records(vec![
            stored_player(),
            PlayerStatRecord::new("p-2", "Deepti", "ds@example.com"),
        ]));
        StatQueryService::new(repo, cache)
    }

    #[tokio::test]
    async fn player_stats_come_from_record_without_cache_entry() {
        let service = service_with(Arc::new(LatestUpdateCache::new()));

        let view = service.get_player_stats("p-1").await.unwrap();
        assert_eq!(view, PlayerStatsView::from_record(&stored_player()));
    }

    #[tokio::test]
    async fn player_stats_take_current_values_from_cache() {
        let cache = Arc::new(LatestUpdateCache::new());
        cache.put("p-1", ScoreUpdateEvent::new("p-1", "Jemimah", 33, 2));
        let service = service_with(cache);

        let view = service.get_player_stats("p-1").await.unwrap();
        assert_eq!(view.current_runs, 33);
        assert_eq!(view.current_wickets, 2);
        assert_eq!(view.total_runs, 120);
        assert_eq!(view.highest_runs, 55);
    }

    #[tokio::test]
    async fn missing_player_is_not_found_for_every_view() {
        let service = service_with(Arc::new(LatestUpdateCache::new()));

        assert!(matches!(
            service.get_player_stats("ghost").await,
            Err(StatsError::PlayerNotFound(_))
        ));
        assert!(matches!(
            service.get_player_stats_by_user_id("ghost").await,
            Err(StatsError::PlayerNotFound(_))
        ));
        assert!(matches!(
            service.get_batting_stats("ghost").await,
            Err(StatsError::PlayerNotFound(_))
        ));
        assert!(matches!(
            service.get_bowling_stats("ghost").await,
            Err(StatsError::PlayerNotFound(_))
        ));
        assert!(matches!(
            service.get_organizer_stats("ghost").await,
            Err(StatsError::PlayerNotFound(_))
        ));
    }

    #[tokio::test]
    async fn all_player_stats_include_record_and_cache_shapes() {
        let cache = Arc::new(LatestUpdateCache::new());
        cache.put("p-1", ScoreUpdateEvent::new("p-1", "Jemimah", 33, 2));
        let service = service_with(cache);

        let views = service.get_all_player_stats().await.unwrap();
        assert_eq!(views.len(), 3);

        let for_p1: Vec<_> = views.iter().filter(|v| v.player_id == "p-1").collect();
        assert_eq!(for_p1.len(), 2);
        assert_eq!(for_p1[0].total_runs, 120);
        assert_eq!(for_p1[0].current_runs, 10);
        assert_eq!(for_p1[1].total_runs, 0);
        assert_eq!(for_p1[1].current_runs, 33);
    }

    #[tokio::test]
    async fn history_lists_record_then_cached_update() {
        let cache = Arc::new(LatestUpdateCache::new());
        let service = service_with(cache.clone());

        let views = service.get_player_stats_by_user_id("p-1").await.unwrap();
        assert_eq!(views.len(), 1);

        cache.put("p-1", ScoreUpdateEvent::new("p-1", "Jemimah", 8, 0));
        cache.put("p-2", ScoreUpdateEvent::new("p-2", "Deepti", 1, 4));

        let views = service.get_player_stats_by_user_id("p-1").await.unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].current_runs, 10);
        assert_eq!(views[1].current_runs, 8);
    }

    #[tokio::test]
    async fn projections_copy_record_fields() {
        let service = service_with(Arc::new(LatestUpdateCache::new()));

        let batting = service.get_batting_stats("p-1").await.unwrap();
        assert_eq!(
            (batting.total_runs, batting.total_matches, batting.highest_runs),
            (120, 4, 55)
        );

        let bowling = service.get_bowling_stats("p-1").await.unwrap();
        assert_eq!(
            (bowling.total_matches, bowling.total_wickets, bowling.highest_wickets),
            (4, 6, 3)
        );

        let organizer = service.get_organizer_stats("p-1").await.unwrap();
        assert_eq!(
            (organizer.matches_organized, organizer.sponsors, organizer.support_staff),
            (2, 5, 7)
        );
    }
}
