//! # Fetch Coordinator
//!
//! Concurrent fan-out to every vendor client under a single deadline.
//!
//! Each vendor runs as its own pool task, bounded by the smaller of the
//! per-vendor budget and the client's own timeout. The whole gather is
//! bounded by the overall deadline: whatever has not finished by then is
//! aborted and reported as [`VendorOutcome::TimedOut`].
//!
//! A vendor failure, timeout or panic only ever affects that vendor's
//! outcome. `gather` itself cannot fail.

use crate::application::services::worker_pool::{PoolError, WorkerPool};
use crate::domain::entities::Listing;
use crate::domain::value_objects::{NormalizedQuery, VendorId};
use crate::infrastructure::vendors::error::VendorError;
use crate::infrastructure::vendors::traits::VendorClient;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, timeout, timeout_at};
use tracing::{info, warn};

/// Default per-vendor budget in milliseconds.
pub const DEFAULT_PER_VENDOR_BUDGET_MS: u64 = 10_000;

/// Default overall gather deadline in milliseconds.
pub const DEFAULT_OVERALL_DEADLINE_MS: u64 = 15_000;

/// How one vendor fared.
#[derive(Debug, Clone)]
pub enum VendorOutcome {
    /// The vendor returned a listing.
    Listed(Listing),
    /// The vendor answered without a usable listing.
    NoListing,
    /// The vendor failed.
    Failed(VendorError),
    /// The vendor did not finish within its budget or the deadline.
    TimedOut,
}

impl VendorOutcome {
    /// Returns the listing, if any.
    #[must_use]
    pub fn listing(&self) -> Option<&Listing> {
        match self {
            Self::Listed(listing) => Some(listing),
            _ => None,
        }
    }

    /// Consumes the outcome, returning the listing, if any.
    #[must_use]
    pub fn into_listing(self) -> Option<Listing> {
        match self {
            Self::Listed(listing) => Some(listing),
            _ => None,
        }
    }

    /// Returns true if the vendor answered (with or without a listing).
    #[must_use]
    pub fn is_response(&self) -> bool {
        matches!(self, Self::Listed(_) | Self::NoListing)
    }

    /// Short label for logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Listed(_) => "listed",
            Self::NoListing => "no_listing",
            Self::Failed(_) => "failed",
            Self::TimedOut => "timed_out",
        }
    }
}

impl fmt::Display for VendorOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listed(listing) => write!(f, "listed {}", listing),
            Self::Failed(e) => write!(f, "failed: {}", e),
            other => f.write_str(other.label()),
        }
    }
}

/// One vendor's outcome with timing.
#[derive(Debug, Clone)]
pub struct VendorReport {
    /// Vendor queried.
    pub vendor: VendorId,
    /// What happened.
    pub outcome: VendorOutcome,
    /// Time from submission to outcome.
    pub elapsed_ms: u64,
}

/// Outcomes of a gather, in vendor-iteration order.
#[derive(Debug, Clone, Default)]
pub struct GatherReport {
    /// Per-vendor reports.
    pub reports: Vec<VendorReport>,
    /// Total gather time.
    pub elapsed_ms: u64,
}

impl GatherReport {
    /// Iterates listed results in vendor order.
    pub fn listings(&self) -> impl Iterator<Item = &Listing> {
        self.reports.iter().filter_map(|r| r.outcome.listing())
    }

    /// Consumes the report, returning outcomes in vendor order.
    #[must_use]
    pub fn into_outcomes(self) -> Vec<VendorOutcome> {
        self.reports.into_iter().map(|r| r.outcome).collect()
    }

    /// Number of vendors that answered.
    #[must_use]
    pub fn responded(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_response()).count()
    }

    /// Number of vendors that failed or timed out.
    #[must_use]
    pub fn unavailable(&self) -> usize {
        self.reports.len() - self.responded()
    }

    /// True when some vendor failed but at least one listing came back.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.unavailable() > 0 && self.listings().next().is_some()
    }
}

/// Runs vendor clients concurrently on the worker pool.
#[derive(Debug, Clone)]
pub struct FetchCoordinator {
    pool: WorkerPool,
    per_vendor_budget: Duration,
    overall_deadline: Duration,
}

impl FetchCoordinator {
    /// Creates a coordinator.
    #[must_use]
    pub fn new(pool: WorkerPool, per_vendor_budget: Duration, overall_deadline: Duration) -> Self {
        Self {
            pool,
            per_vendor_budget,
            overall_deadline,
        }
    }

    /// Creates a coordinator with the default budgets.
    #[must_use]
    pub fn with_defaults(pool: WorkerPool) -> Self {
        Self::new(
            pool,
            Duration::from_millis(DEFAULT_PER_VENDOR_BUDGET_MS),
            Duration::from_millis(DEFAULT_OVERALL_DEADLINE_MS),
        )
    }

    /// Returns the per-vendor budget.
    #[inline]
    #[must_use]
    pub fn per_vendor_budget(&self) -> Duration {
        self.per_vendor_budget
    }

    /// Returns the overall deadline.
    #[inline]
    #[must_use]
    pub fn overall_deadline(&self) -> Duration {
        self.overall_deadline
    }

    /// Returns the worker pool.
    #[inline]
    #[must_use]
    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Budget for one client.
    fn budget_for(&self, client: &dyn VendorClient) -> Duration {
        client
            .timeout_ms()
            .map(Duration::from_millis)
            .map_or(self.per_vendor_budget, |own| own.min(self.per_vendor_budget))
    }

    /// Queries every client, returning once all finish or the overall
    /// deadline passes.
    pub async fn gather(
        &self,
        query: &NormalizedQuery,
        clients: &[Arc<dyn VendorClient>],
    ) -> GatherReport {
        self.gather_until(query, clients, Instant::now() + self.overall_deadline)
            .await
    }

    /// Like [`FetchCoordinator::gather`], with an explicit deadline shared
    /// with other work.
    pub async fn gather_until(
        &self,
        query: &NormalizedQuery,
        clients: &[Arc<dyn VendorClient>],
        deadline: Instant,
    ) -> GatherReport {
        let started = Instant::now();
        let mut slots: Vec<Option<(VendorOutcome, u64)>> =
            (0..clients.len()).map(|_| None).collect();
        let mut abort_handles = Vec::with_capacity(clients.len());
        let pending = FuturesUnordered::new();

        for (idx, client) in clients.iter().enumerate() {
            let client = Arc::clone(client);
            let query = query.clone();
            let budget = self.budget_for(client.as_ref());

            let work = async move {
                let began = Instant::now();
                let outcome = match timeout(budget, client.fetch(&query)).await {
                    Ok(Ok(Some(listing))) => VendorOutcome::Listed(listing),
                    Ok(Ok(None)) => VendorOutcome::NoListing,
                    Ok(Err(e)) => VendorOutcome::Failed(e),
                    Err(_) => VendorOutcome::TimedOut,
                };
                (outcome, elapsed_ms(began))
            };

            match self.pool.submit(work) {
                Ok(task) => {
                    abort_handles.extend(task.abort_handle());
                    pending.push(async move { (idx, task.await) });
                }
                Err(e) => {
                    if let Some(slot) = slots.get_mut(idx) {
                        *slot = Some((VendorOutcome::Failed(pool_failure(e)), 0));
                    }
                }
            }
        }

        let collect = async {
            let mut pending = pending;
            while let Some((idx, joined)) = pending.next().await {
                let result = match joined {
                    Ok(result) => result,
                    Err(e) => (VendorOutcome::Failed(pool_failure(e)), elapsed_ms(started)),
                };
                if let Some(slot) = slots.get_mut(idx) {
                    *slot = Some(result);
                }
            }
        };
        let completed = timeout_at(deadline, collect).await.is_ok();

        if !completed {
            for handle in &abort_handles {
                handle.abort();
            }
        }

        let total_ms = elapsed_ms(started);
        let reports: Vec<VendorReport> = clients
            .iter()
            .zip(slots)
            .map(|(client, slot)| {
                let (outcome, elapsed) = slot.unwrap_or((VendorOutcome::TimedOut, total_ms));
                let report = VendorReport {
                    vendor: client.vendor_id().clone(),
                    outcome,
                    elapsed_ms: elapsed,
                };
                log_outcome(query, &report);
                report
            })
            .collect();

        let report = GatherReport {
            reports,
            elapsed_ms: total_ms,
        };

        if report.is_partial() {
            warn!(
                query = %query,
                responded = report.responded(),
                unavailable = report.unavailable(),
                elapsed_ms = total_ms,
                "partial results"
            );
        }

        report
    }
}

fn elapsed_ms(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn pool_failure(error: PoolError) -> VendorError {
    VendorError::internal_error(format!("vendor task did not complete: {}", error))
}

fn log_outcome(query: &NormalizedQuery, report: &VendorReport) {
    match &report.outcome {
        VendorOutcome::Listed(listing) => info!(
            vendor = %report.vendor,
            query = %query,
            price = ?listing.price().map(|p| p.to_f64()),
            elapsed_ms = report.elapsed_ms,
            "vendor listed"
        ),
        VendorOutcome::NoListing => info!(
            vendor = %report.vendor,
            query = %query,
            elapsed_ms = report.elapsed_ms,
            "vendor had no listing"
        ),
        VendorOutcome::Failed(e) => warn!(
            vendor = %report.vendor,
            query = %query,
            error = %e,
            retryable = e.is_retryable(),
            elapsed_ms = report.elapsed_ms,
            "vendor failed"
        ),
        VendorOutcome::TimedOut => warn!(
            vendor = %report.vendor,
            query = %query,
            elapsed_ms = report.elapsed_ms,
            "vendor timed out"
        ),
    }
}
