//! # In-Memory Snapshot Store
//!
//! In-memory implementation of [`SnapshotStore`] for tests and for running
//! without a database.

use crate::domain::entities::Snapshot;
use crate::domain::value_objects::Timestamp;
use crate::infrastructure::persistence::traits::{RepositoryResult, SnapshotStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`SnapshotStore`].
///
/// Snapshots are kept per normalized query in insertion order.
#[derive(Debug, Clone)]
pub struct InMemorySnapshotStore {
    storage: Arc<RwLock<HashMap<String, Vec<Snapshot>>>>,
}

impl InMemorySnapshotStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the total number of snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage
            .try_read()
            .map(|guard| guard.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every snapshot for a query, in insertion order.
    pub async fn all_for(&self, query: &str) -> Vec<Snapshot> {
        let storage = self.storage.read().await;
        storage.get(query).cloned().unwrap_or_default()
    }

    /// Clears all snapshots.
    pub async fn clear(&self) {
        let mut storage = self.storage.write().await;
        storage.clear();
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn find_recent(&self, query: &str, since: Timestamp) -> RepositoryResult<Vec<Snapshot>> {
        let storage = self.storage.read().await;
        Ok(storage
            .get(query)
            .map(|rows| {
                rows.iter()
                    .filter(|s| s.is_fresh_since(since))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn latest(&self, query: &str, limit: usize) -> RepositoryResult<Vec<Snapshot>> {
        let storage = self.storage.read().await;
        let mut rows = storage.get(query).cloned().unwrap_or_default();
        rows.sort_by_key(|s| std::cmp::Reverse(s.captured_at()));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn append(&self, snapshot: &Snapshot) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        storage
            .entry(snapshot.query().to_string())
            .or_default()
            .push(snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::Listing;
    use crate::domain::value_objects::{SnapshotId, VendorId};

    fn snapshot(query: &str, vendor: &str, secs: i64) -> Snapshot {
        let listing = Listing::builder(VendorId::new(vendor), "https://v.test/p", "Phone").build();
        Snapshot::from_parts(
            SnapshotId::new_v4(),
            query,
            listing,
            Timestamp::from_secs(secs).unwrap(),
        )
    }

    #[tokio::test]
    async fn new_store_is_empty() {
        let store = InMemorySnapshotStore::new();
        assert!(store.is_empty());
        let found = store
            .find_recent("x", Timestamp::from_secs(0).unwrap())
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn find_recent_respects_window_and_key() {
        let store = InMemorySnapshotStore::new();
        store.append(&snapshot("iphone 15", "amazon", 100)).await.unwrap();
        store.append(&snapshot("iphone 15", "croma", 200)).await.unwrap();
        store.append(&snapshot("pixel 8", "amazon", 300)).await.unwrap();

        let since = Timestamp::from_secs(200).unwrap();
        let found = store.find_recent("iphone 15", since).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].listing().vendor().as_str(), "croma");
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn latest_is_newest_first_and_limited() {
        let store = InMemorySnapshotStore::new();
        for secs in [10, 30, 20] {
            store.append(&snapshot("q", "amazon", secs)).await.unwrap();
        }
        let latest = store.latest("q", 2).await.unwrap();
        let secs: Vec<i64> = latest.iter().map(|s| s.captured_at().timestamp_secs()).collect();
        assert_eq!(secs, vec![30, 20]);
    }

    #[tokio::test]
    async fn clear_empties_store() {
        let store = InMemorySnapshotStore::new();
        store.append(&snapshot("q", "amazon", 1)).await.unwrap();
        store.clear().await;
        assert!(store.all_for("q").await.is_empty());
    }
}
