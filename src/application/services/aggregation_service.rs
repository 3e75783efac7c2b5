//! # Aggregation Service
//!
//! The single entry point for price lookups.
//!
//! One call to [`AggregationService::fetch_pricing`] runs one pass of:
//!
//! ```text
//! VALIDATE -> CACHE_LOOKUP --hit--> RETURN
//!                 | miss
//!                 v
//!             LIVE_FETCH (+ enrichment, same deadline)
//!                 v
//!             MERGE (strict)
//!                 v
//!             FALLBACK_CHECK (empty + enabled -> lenient fallback)
//!                 v
//!             PERSIST_ASYNC (live and not fallback-only)
//!                 v
//!               RETURN
//! ```
//!
//! Only VALIDATE can fail the call. Vendor failures become absent entries,
//! persistence failures are logged, and a slow enrichment source is cut off
//! at the same deadline as the vendors.

use crate::application::error::{ApplicationError, ApplicationResult, InfrastructureError};
use crate::application::services::fallback::FallbackGenerator;
use crate::application::services::fetch_coordinator::{
    DEFAULT_OVERALL_DEADLINE_MS, DEFAULT_PER_VENDOR_BUDGET_MS, FetchCoordinator, VendorOutcome,
};
use crate::application::services::result_merger::ResultMerger;
use crate::application::services::snapshot_cache::{
    CacheSource, DEFAULT_FRESHNESS_WINDOW_SECS, SnapshotCache,
};
use crate::application::services::worker_pool::WorkerPool;
use crate::domain::entities::{AggregationResult, SearchRecord, Snapshot};
use crate::domain::value_objects::{NormalizedQuery, Timestamp};
use crate::infrastructure::enrichment::EnrichmentSource;
use crate::infrastructure::persistence::traits::{HistoryLog, SnapshotStore};
use crate::infrastructure::vendors::profile::VendorProfile;
use crate::infrastructure::vendors::traits::VendorClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, warn};

/// Largest accepted overall deadline (10 minutes).
pub const MAX_OVERALL_DEADLINE_MS: u64 = 10 * 60 * 1000;

/// Largest accepted per-vendor budget (10 minutes).
pub const MAX_PER_VENDOR_BUDGET_MS: u64 = 10 * 60 * 1000;

/// Largest accepted freshness window (10 years).
pub const MAX_FRESHNESS_WINDOW_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Aggregation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Upper bound on a live fetch, enrichment included.
    pub overall_deadline_ms: u64,
    /// Upper bound on a single vendor call.
    pub per_vendor_budget_ms: u64,
    /// Maximum snapshot age served from cache.
    pub freshness_window_secs: u64,
    /// Serve search-link placeholders when no vendor produced a price.
    pub fallback_enabled: bool,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            overall_deadline_ms: DEFAULT_OVERALL_DEADLINE_MS,
            per_vendor_budget_ms: DEFAULT_PER_VENDOR_BUDGET_MS,
            freshness_window_secs: DEFAULT_FRESHNESS_WINDOW_SECS,
            fallback_enabled: true,
        }
    }
}

impl AggregationConfig {
    /// Sets the overall deadline.
    #[must_use]
    pub fn with_overall_deadline_ms(mut self, ms: u64) -> Self {
        self.overall_deadline_ms = ms;
        self
    }

    /// Sets the per-vendor budget.
    #[must_use]
    pub fn with_per_vendor_budget_ms(mut self, ms: u64) -> Self {
        self.per_vendor_budget_ms = ms;
        self
    }

    /// Sets the freshness window.
    #[must_use]
    pub fn with_freshness_window_secs(mut self, secs: u64) -> Self {
        self.freshness_window_secs = secs;
        self
    }

    /// Enables or disables fallback listings.
    #[must_use]
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback_enabled = enabled;
        self
    }

    /// Overall deadline as a duration.
    #[inline]
    #[must_use]
    pub fn overall_deadline(&self) -> Duration {
        Duration::from_millis(self.overall_deadline_ms)
    }

    /// Per-vendor budget as a duration.
    #[inline]
    #[must_use]
    pub fn per_vendor_budget(&self) -> Duration {
        Duration::from_millis(self.per_vendor_budget_ms)
    }

    /// Freshness window as a duration.
    #[inline]
    #[must_use]
    pub fn freshness_window(&self) -> Duration {
        Duration::from_secs(self.freshness_window_secs)
    }

    /// Checks the settings.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` for a zero deadline or
    /// budget, or for a deadline, budget or window above its maximum.
    pub fn validate(&self) -> ApplicationResult<()> {
        check_range(
            "aggregation.overall_deadline_ms",
            self.overall_deadline_ms,
            1,
            MAX_OVERALL_DEADLINE_MS,
        )?;
        check_range(
            "aggregation.per_vendor_budget_ms",
            self.per_vendor_budget_ms,
            1,
            MAX_PER_VENDOR_BUDGET_MS,
        )?;
        check_range(
            "aggregation.freshness_window_secs",
            self.freshness_window_secs,
            0,
            MAX_FRESHNESS_WINDOW_SECS,
        )
    }
}

fn check_range(name: &str, value: u64, min: u64, max: u64) -> ApplicationResult<()> {
    if value < min {
        return Err(ApplicationError::configuration(format!(
            "{name} must be at least {min}, got {value}"
        )));
    }
    if value > max {
        return Err(ApplicationError::configuration(format!(
            "{name} must be at most {max}, got {value}"
        )));
    }
    Ok(())
}

/// Orchestrates cache, live fetch, merge, fallback and persistence.
#[derive(Debug, Clone)]
pub struct AggregationService {
    clients: Vec<Arc<dyn VendorClient>>,
    profiles: Vec<VendorProfile>,
    coordinator: FetchCoordinator,
    cache: SnapshotCache,
    history: Arc<dyn HistoryLog>,
    enrichment: Option<Arc<dyn EnrichmentSource>>,
    fallback: FallbackGenerator,
    fallback_enabled: bool,
}

impl AggregationService {
    /// Wires a service.
    ///
    /// `clients` are queried in order and `profiles` drive fallback deep
    /// links. Both share `pool` with snapshot and history writes.
    #[must_use]
    pub fn new(
        config: &AggregationConfig,
        pool: WorkerPool,
        clients: Vec<Arc<dyn VendorClient>>,
        profiles: Vec<VendorProfile>,
        snapshots: Arc<dyn SnapshotStore>,
        history: Arc<dyn HistoryLog>,
    ) -> Self {
        let coordinator = FetchCoordinator::new(
            pool.clone(),
            config.per_vendor_budget(),
            config.overall_deadline(),
        );
        let vendor_order = clients.iter().map(|c| c.vendor_id().clone()).collect();
        let cache = SnapshotCache::new(snapshots, pool, config.freshness_window())
            .with_vendor_order(vendor_order);
        Self {
            clients,
            profiles,
            coordinator,
            cache,
            history,
            enrichment: None,
            fallback: FallbackGenerator::new(),
            fallback_enabled: config.fallback_enabled,
        }
    }

    /// Attaches an enrichment source.
    #[must_use]
    pub fn with_enrichment(mut self, source: Arc<dyn EnrichmentSource>) -> Self {
        self.enrichment = Some(source);
        self
    }

    /// Returns the worker pool.
    #[inline]
    #[must_use]
    pub fn pool(&self) -> &WorkerPool {
        self.coordinator.pool()
    }

    /// Number of configured vendors.
    #[must_use]
    pub fn vendor_count(&self) -> usize {
        self.clients.len()
    }

    /// Returns ordered listings for a raw query.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::InvalidQuery` when the query is blank.
    /// Nothing else is surfaced.
    pub async fn fetch_pricing(&self, raw: &str) -> ApplicationResult<AggregationResult> {
        let query = NormalizedQuery::parse(raw)?;
        let started = Instant::now();

        let outcome = self
            .cache
            .get_or_fetch(&query, || self.fetch_live(&query))
            .await;

        if outcome.source == CacheSource::Live && !outcome.result.is_fallback_only() {
            self.record_search(&query, outcome.result.len());
        }

        info!(
            query = %query,
            source = ?outcome.source,
            listings = outcome.result.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "pricing served"
        );
        Ok(outcome.result)
    }

    /// Returns the most recent snapshots for a query, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::InvalidQuery` for a blank query and
    /// `ApplicationError::Infrastructure` when the store cannot be read.
    pub async fn price_history(&self, raw: &str, limit: usize) -> ApplicationResult<Vec<Snapshot>> {
        let query = NormalizedQuery::parse(raw)?;
        let snapshots = self
            .cache
            .store()
            .latest(query.as_str(), limit)
            .await
            .map_err(InfrastructureError::from)?;
        Ok(snapshots)
    }

    /// Returns the most recent searches, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Infrastructure` when the log cannot be read.
    pub async fn recent_searches(&self, limit: usize) -> ApplicationResult<Vec<SearchRecord>> {
        let records = self
            .history
            .recent(limit)
            .await
            .map_err(InfrastructureError::from)?;
        Ok(records)
    }

    async fn fetch_live(&self, query: &NormalizedQuery) -> AggregationResult {
        let deadline = Instant::now() + self.coordinator.overall_deadline();
        let (report, enrichment) = tokio::join!(
            self.coordinator.gather_until(query, &self.clients, deadline),
            self.enrich_until(query, deadline),
        );

        let outcomes = report
            .into_outcomes()
            .into_iter()
            .map(VendorOutcome::into_listing);
        let merged = ResultMerger::strict().merge(outcomes, enrichment.as_deref());

        if !merged.is_empty() || !self.fallback_enabled {
            return merged;
        }

        let listings = self
            .fallback
            .generate(query, &self.profiles, Timestamp::now());
        info!(query = %query, listings = listings.len(), "no live prices; serving fallback");
        ResultMerger::lenient().merge(listings.into_iter().map(Some), None)
    }

    async fn enrich_until(&self, query: &NormalizedQuery, deadline: Instant) -> Option<String> {
        let source = self.enrichment.as_ref()?;
        match timeout_at(deadline, source.enrich(query)).await {
            Ok(Ok(summary)) => {
                debug!(source = source.name(), query = %query, found = summary.is_some(), "enrichment done");
                summary
            }
            Ok(Err(e)) => {
                warn!(source = source.name(), query = %query, error = %e, "enrichment failed");
                None
            }
            Err(_) => {
                warn!(source = source.name(), query = %query, "enrichment timed out");
                None
            }
        }
    }

    fn record_search(&self, query: &NormalizedQuery, result_count: usize) {
        let record = SearchRecord::new(query, result_count);
        let history = Arc::clone(&self.history);
        let write = async move {
            if let Err(e) = history.record(&record).await {
                warn!(query = %record.query_normalized, error = %e, "history write failed");
            }
        };
        if let Err(e) = self.pool().execute(write) {
            warn!(query = %query, error = %e, "history write not submitted");
        }
    }
}
