//! Per-listing async locks
//!
//! Serializes placements against one listing inside this process so that
//! concurrent buyers queue instead of racing into store conflicts. The
//! conditional update in the store stays the authority.
//!
//! An entry lives only while someone holds or waits on it: the last
//! [`ListingGuard`] to drop removes it from the map.

use std::sync::Arc;

use dashmap::DashMap;
use surrealdb::RecordId;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = DashMap<String, Arc<Mutex<()>>>;

#[derive(Clone, Default)]
pub struct ListingLocks {
    locks: Arc<LockMap>,
}

/// Exclusive access to one listing; releases the map entry on drop
pub struct ListingGuard {
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<LockMap>,
}

impl Drop for ListingGuard {
    fn drop(&mut self) {
        // Unlock first so the map entry is the only remaining reference
        drop(self.guard.take());
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl ListingLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `listing`
    pub async fn acquire(&self, listing: &RecordId) -> ListingGuard {
        let key = listing.to_string();
        // Cloned under the shard lock, so a concurrent release cannot remove it
        let lock = self.locks.entry(key.clone()).or_default().value().clone();
        let guard = lock.lock_owned().await;
        ListingGuard {
            key,
            guard: Some(guard),
            locks: Arc::clone(&self.locks),
        }
    }

    /// Listings currently held or waited on
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_listing_is_exclusive() {
        let locks = ListingLocks::new();
        let id = RecordId::from_table_key("listing", "l1");
        let guard = locks.acquire(&id).await;

        let contender = {
            let locks = locks.clone();
            let id = id.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(&id).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn different_listings_do_not_block() {
        let locks = ListingLocks::new();
        let _a = locks.acquire(&RecordId::from_table_key("listing", "la")).await;
        let _b = locks.acquire(&RecordId::from_table_key("listing", "lb")).await;
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn released_entries_leave_the_map() {
        let locks = ListingLocks::new();
        let held = locks.acquire(&RecordId::from_table_key("listing", "la")).await;
        drop(locks.acquire(&RecordId::from_table_key("listing", "lb")).await);
        assert_eq!(locks.len(), 1);
        drop(held);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn entry_survives_while_a_waiter_queues() {
        let locks = ListingLocks::new();
        let id = RecordId::from_table_key("listing", "l1");
        let first = locks.acquire(&id).await;

        let waiter = {
            let locks = locks.clone();
            let id = id.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(&id).await;
                tokio::time::sleep(Duration::from_millis(20)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(first);
        assert_eq!(locks.len(), 1);
        waiter.await.unwrap();
        assert!(locks.is_empty());
    }
}
