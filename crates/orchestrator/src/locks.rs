//! Per-user serialization of message processing.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per user id.
///
/// Messages of the same user run one at a time; different users never
/// wait on each other.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for and hold the lock of `user_id` until the guard drops.
    pub async fn acquire(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Drop entries nobody holds or waits on.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry(user_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Number of users with a live lock entry.
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.locks.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_user_waits() {
        let locks = Arc::new(UserLocks::new());
        let guard = locks.acquire("alice").await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire("alice").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_other_users_do_not_wait() {
        let locks = UserLocks::new();
        let _alice = locks.acquire("alice").await;

        let bob = tokio::time::timeout(Duration::from_millis(200), locks.acquire("bob")).await;
        assert!(bob.is_ok());
    }

    #[tokio::test]
    async fn test_released_entries_are_pruned() {
        let locks = UserLocks::new();
        drop(locks.acquire("alice").await);
        drop(locks.acquire("bob").await);

        // Acquiring prunes every released entry before inserting.
        let _carol = locks.acquire("carol").await;
        assert_eq!(locks.len().await, 1);
    }
}
