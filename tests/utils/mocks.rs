use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crickstats::{
    player::{
        models::PlayerStatRecord,
        repository::{InMemoryPlayerStatRepository, PlayerStatRepository},
    },
    StatsError,
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Player store whose first `failures` saves fail with a persistence error
pub struct FlakyPlayerStatRepository {
    inner: InMemoryPlayerStatRepository,
    remaining_failures: AtomicU32,
    save_attempts: AtomicUsize,
}

impl FlakyPlayerStatRepository {
    pub fn new(records: Vec<PlayerStatRecord>, failures: u32) -> Self {
        Self {
            inner: InMemoryPlayerStatRepository::with_records(records),
            remaining_failures: AtomicU32::new(failures),
            save_attempts: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn save_attempts(&self) -> usize {
        self.save_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlayerStatRepository for FlakyPlayerStatRepository {
    async fn find_by_id(&self, player_id: &str) -> Result<Option<PlayerStatRecord>, StatsError> {
        self.inner.find_by_id(player_id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<PlayerStatRecord>, StatsError> {
        self.inner.find_by_email(email).await
    }

    async fn find_all(&self) -> Result<Vec<PlayerStatRecord>, StatsError> {
        self.inner.find_all().await
    }

    async fn insert(&self, record: &PlayerStatRecord) -> Result<PlayerStatRecord, StatsError> {
        self.inner.insert(record).await
    }

    async fn save(&self, record: &PlayerStatRecord) -> Result<PlayerStatRecord, StatsError> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);
        let failed = self
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failed {
            return Err(StatsError::Persistence("connection reset".to_string()));
        }
        self.inner.save(record).await
    }
}
