use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex as AsyncMutex, RwLock};

/// Registry of per-player async mutexes
///
/// Every read-modify-write of a player's record holds that player's mutex
/// for its whole duration. Players never share a mutex, so writes to
/// different players proceed in parallel.
#[derive(Debug, Default)]
pub struct PlayerLocks {
    locks: RwLock<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl PlayerLocks {
    pub fn new() -> Self {
        Self {
            locks: RwLock::new(HashMap::new()),
        }
    }

    pub async fn lock_for(&self, player_id: &str) -> Arc<AsyncMutex<()>> {
        {
            let guard = self.locks.read().await;
            if let Some(lock) = guard.get(player_id) {
                return lock.clone();
            }
        }

        let mut guard = self.locks.write().await;
        guard
            .entry(player_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Forgets the player's mutex when `lock` is the only handle left outside the registry
    ///
    /// Used after a lookup found no record, so ids that never resolve to a
    /// player do not stay registered.
    pub async fn release(&self, player_id: &str, lock: &Arc<AsyncMutex<()>>) {
        let mut guard = self.locks.write().await;
        if let Some(registered) = guard.get(player_id) {
            // One count for the registry, one for the caller
            if Arc::ptr_eq(registered, lock) && Arc::strong_count(lock) == 2 {
                guard.remove(player_id);
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.locks.read().await.len()
    }
}
