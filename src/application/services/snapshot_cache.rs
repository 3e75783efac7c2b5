//! # Snapshot Cache
//!
//! Time-windowed read-through cache over the [`SnapshotStore`].
//!
//! - A lookup returns the latest snapshot per vendor captured within the
//!   freshness window, ordered like a live result: by price, ties in
//!   configured vendor order. It never writes.
//! - On a miss the caller's fetch runs, and every priced, non-fallback
//!   listing it returns is written back as a snapshot in the background.
//! - Store failures are logged and treated as a miss (reads) or dropped
//!   (writes). Writes are at-most-once.
//!
//! Concurrent misses for the same query are not coalesced.

use crate::application::services::result_merger::sort_listings;
use crate::application::services::worker_pool::WorkerPool;
use crate::domain::entities::{AggregationResult, Listing, Snapshot};
use crate::domain::value_objects::{NormalizedQuery, Timestamp, VendorId};
use crate::infrastructure::persistence::traits::SnapshotStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default freshness window in seconds (3 hours).
pub const DEFAULT_FRESHNESS_WINDOW_SECS: u64 = 3 * 60 * 60;

/// Where a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CacheSource {
    /// Served from fresh snapshots.
    Cache,
    /// Fetched live.
    Live,
}

/// A result with its provenance.
#[derive(Debug, Clone)]
pub struct CacheOutcome {
    /// The listings.
    pub result: AggregationResult,
    /// Cache hit or live fetch.
    pub source: CacheSource,
}

impl CacheOutcome {
    /// True for a cache hit.
    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.source == CacheSource::Cache
    }
}

/// Read-through snapshot cache.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    store: Arc<dyn SnapshotStore>,
    pool: WorkerPool,
    freshness_window: Duration,
    vendor_order: Vec<VendorId>,
}

impl SnapshotCache {
    /// Creates a cache.
    #[must_use]
    pub fn new(store: Arc<dyn SnapshotStore>, pool: WorkerPool, freshness_window: Duration) -> Self {
        Self {
            store,
            pool,
            freshness_window,
            vendor_order: Vec::new(),
        }
    }

    /// Sets the vendor order used to break price ties on a hit.
    ///
    /// Vendors not listed sort after listed ones, by id.
    #[must_use]
    pub fn with_vendor_order(mut self, vendor_order: Vec<VendorId>) -> Self {
        self.vendor_order = vendor_order;
        self
    }

    fn vendor_rank(&self, vendor: &VendorId) -> usize {
        self.vendor_order
            .iter()
            .position(|v| v == vendor)
            .unwrap_or(usize::MAX)
    }

    /// Returns the freshness window.
    #[inline]
    #[must_use]
    pub fn freshness_window(&self) -> Duration {
        self.freshness_window
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SnapshotStore> {
        &self.store
    }

    /// Reconstructs a result from fresh snapshots, if any exist.
    pub async fn lookup(&self, query: &NormalizedQuery) -> Option<AggregationResult> {
        let since = Timestamp::window_start(self.freshness_window);
        let snapshots = match self.store.find_recent(query.as_str(), since).await {
            Ok(snapshots) => snapshots,
            Err(e) => {
                warn!(query = %query, error = %e, "snapshot lookup failed; treating as miss");
                return None;
            }
        };

        let mut latest: HashMap<VendorId, Snapshot> = HashMap::new();
        for snapshot in snapshots {
            let listing = snapshot.listing();
            if listing.is_fallback() || !listing.has_price() || !snapshot.is_fresh_since(since) {
                continue;
            }
            let vendor = listing.vendor().clone();
            match latest.get(&vendor) {
                Some(kept) if kept.captured_at() >= snapshot.captured_at() => {}
                _ => {
                    latest.insert(vendor, snapshot);
                }
            }
        }

        if latest.is_empty() {
            debug!(query = %query, "cache miss");
            return None;
        }

        let mut listings: Vec<Listing> = latest.into_values().map(Snapshot::into_listing).collect();
        listings.sort_by_cached_key(|l| (self.vendor_rank(l.vendor()), l.vendor().clone()));
        sort_listings(&mut listings);
        info!(query = %query, listings = listings.len(), "cache hit");
        Some(AggregationResult::from_ordered(listings))
    }

    /// Writes a result's persistable listings in the background.
    ///
    /// Fallback and priceless listings are skipped. Returns how many writes
    /// were handed to the pool.
    pub fn persist(&self, query: &NormalizedQuery, result: &AggregationResult) -> usize {
        let mut submitted = 0;
        for listing in result.iter().filter(|l| !l.is_fallback() && l.has_price()) {
            let snapshot = Snapshot::capture(query, listing.clone());
            let store = Arc::clone(&self.store);
            let write = async move {
                if let Err(e) = store.append(&snapshot).await {
                    warn!(
                        query = snapshot.query(),
                        vendor = %snapshot.listing().vendor(),
                        error = %e,
                        "snapshot write failed"
                    );
                }
            };
            match self.pool.execute(write) {
                Ok(()) => submitted += 1,
                Err(e) => warn!(query = %query, error = %e, "snapshot write not submitted"),
            }
        }
        submitted
    }

    /// Serves fresh snapshots, or runs `fetch` and persists what it returns.
    pub async fn get_or_fetch<F, Fut>(&self, query: &NormalizedQuery, fetch: F) -> CacheOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AggregationResult>,
    {
        if let Some(result) = self.lookup(query).await {
            return CacheOutcome {
                result,
                source: CacheSource::Cache,
            };
        }

        let result = fetch().await;
        self.persist(query, &result);
        CacheOutcome {
            result,
            source: CacheSource::Live,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::application::services::worker_pool::WorkerPoolConfig;
    use crate::domain::value_objects::{Price, SnapshotId};
    use crate::infrastructure::persistence::in_memory::InMemorySnapshotStore;
    use crate::infrastructure::persistence::traits::{RepositoryError, RepositoryResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct BrokenStore;

    #[async_trait]
    impl SnapshotStore for BrokenStore {
        async fn find_recent(&self, _: &str, _: Timestamp) -> RepositoryResult<Vec<Snapshot>> {
            Err(RepositoryError::connection("down"))
        }

        async fn latest(&self, _: &str, _: usize) -> RepositoryResult<Vec<Snapshot>> {
            Err(RepositoryError::connection("down"))
        }

        async fn append(&self, _: &Snapshot) -> RepositoryResult<()> {
            Err(RepositoryError::connection("down"))
        }
    }

    fn pool() -> WorkerPool {
        WorkerPool::new(WorkerPoolConfig::new(1, 4, 16)).unwrap()
    }

    fn cache(store: Arc<dyn SnapshotStore>) -> SnapshotCache {
        SnapshotCache::new(
            store,
            pool(),
            Duration::from_secs(DEFAULT_FRESHNESS_WINDOW_SECS),
        )
    }

    fn query() -> NormalizedQuery {
        NormalizedQuery::parse("iPhone 15").unwrap()
    }

    fn listing(vendor: &str, price: Option<f64>) -> Listing {
        Listing::builder(VendorId::new(vendor), format!("https://{vendor}.test"), "Phone")
            .maybe_price(price.map(|p| Price::new(p).unwrap()))
            .build()
    }

    fn snapshot_at(vendor: &str, price: f64, age_secs: i64) -> Snapshot {
        Snapshot::from_parts(
            SnapshotId::new_v4(),
            "iphone 15",
            listing(vendor, Some(price)),
            Timestamp::now().sub_secs(age_secs),
        )
    }

    #[tokio::test]
    async fn miss_fetches_and_persists() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let cache = cache(store.clone());
        let fetched = AggregationResult::from_ordered(vec![
            listing("croma", Some(73999.0)),
            listing("amazon", Some(74999.0)),
        ]);

        let outcome = cache.get_or_fetch(&query(), || async { fetched.clone() }).await;
        assert_eq!(outcome.source, CacheSource::Live);
        assert_eq!(outcome.result.len(), 2);

        cache.pool.wait_idle().await;
        assert_eq!(store.all_for("iphone 15").await.len(), 2);
    }

    #[tokio::test]
    async fn second_call_is_served_from_cache() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let cache = cache(store.clone());
        let fetches = AtomicUsize::new(0);
        let fetched = AggregationResult::from_ordered(vec![
            listing("croma", Some(73999.0)),
            listing("amazon", Some(74999.0)),
        ]);

        let first = cache
            .get_or_fetch(&query(), || async {
                fetches.fetch_add(1, Ordering::SeqCst);
                fetched.clone()
            })
            .await;
        cache.pool.wait_idle().await;

        let second = cache
            .get_or_fetch(&query(), || async {
                fetches.fetch_add(1, Ordering::SeqCst);
                AggregationResult::empty()
            })
            .await;

        assert!(second.is_hit());
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        let vendors = |r: &AggregationResult| -> Vec<String> {
            r.iter().map(|l| l.vendor().to_string()).collect()
        };
        assert_eq!(vendors(&first.result), vendors(&second.result));
    }

    #[tokio::test]
    async fn lookup_keeps_latest_per_vendor_and_sorts() {
        let store = Arc::new(InMemorySnapshotStore::new());
        store.append(&snapshot_at("amazon", 80000.0, 600)).await.unwrap();
        store.append(&snapshot_at("amazon", 74999.0, 60)).await.unwrap();
        store.append(&snapshot_at("croma", 73999.0, 120)).await.unwrap();

        let result = cache(store).lookup(&query()).await.unwrap();
        let prices: Vec<f64> = result
            .iter()
            .map(|l| l.price().unwrap().to_f64())
            .collect();
        assert_eq!(prices, vec![73999.0, 74999.0]);
    }

    #[tokio::test]
    async fn tied_prices_follow_vendor_order() {
        let store = Arc::new(InMemorySnapshotStore::new());
        store.append(&snapshot_at("amazon", 100.0, 30)).await.unwrap();
        store.append(&snapshot_at("croma", 90.0, 30)).await.unwrap();
        store.append(&snapshot_at("flipkart", 100.0, 30)).await.unwrap();
        store.append(&snapshot_at("reliance", 100.0, 30)).await.unwrap();

        let cache = cache(store).with_vendor_order(vec![
            VendorId::new("flipkart"),
            VendorId::new("amazon"),
            VendorId::new("croma"),
        ]);
        let result = cache.lookup(&query()).await.unwrap();
        let vendors: Vec<String> = result.iter().map(|l| l.vendor().to_string()).collect();
        assert_eq!(vendors, vec!["croma", "flipkart", "amazon", "reliance"]);
    }

    #[tokio::test]
    async fn huge_window_still_hits() {
        let store = Arc::new(InMemorySnapshotStore::new());
        store.append(&snapshot_at("amazon", 74999.0, 60)).await.unwrap();

        let cache = SnapshotCache::new(store, pool(), Duration::from_secs(u64::MAX));
        assert!(cache.lookup(&query()).await.is_some());
    }

    #[tokio::test]
    async fn stale_snapshots_are_a_miss() {
        let store = Arc::new(InMemorySnapshotStore::new());
        store
            .append(&snapshot_at("amazon", 74999.0, 4 * 60 * 60))
            .await
            .unwrap();
        assert!(cache(store).lookup(&query()).await.is_none());
    }

    #[tokio::test]
    async fn fallback_and_priceless_are_never_persisted() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let cache = cache(store.clone());
        let result = AggregationResult::from_ordered(vec![
            listing("amazon", None),
            Listing::builder(VendorId::fallback(), "https://f.test", "Open").build(),
        ]);

        assert_eq!(cache.persist(&query(), &result), 0);
        cache.pool.wait_idle().await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn store_failures_are_absorbed() {
        let cache = cache(Arc::new(BrokenStore));
        let fetched = AggregationResult::from_ordered(vec![listing("amazon", Some(1.0))]);

        let outcome = cache.get_or_fetch(&query(), || async { fetched.clone() }).await;
        assert_eq!(outcome.source, CacheSource::Live);
        assert_eq!(outcome.result.len(), 1);
        cache.pool.wait_idle().await;
    }
}
