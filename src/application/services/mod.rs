//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! This module provides application-level services including:
//! - [`AggregationService`]: The price lookup pipeline
//! - [`FetchCoordinator`]: Concurrent vendor fan-out under a deadline
//! - [`ResultMerger`]: Filtering, ordering and enrichment of outcomes
//! - [`SnapshotCache`]: Time-windowed read-through cache
//! - [`FallbackGenerator`]: Search-link placeholders
//! - [`WorkerPool`]: Bounded executor with caller-runs saturation
//! - [`TrackingService`]: The tracked product list

pub mod aggregation_service;
pub mod fallback;
pub mod fetch_coordinator;
pub mod result_merger;
pub mod snapshot_cache;
pub mod tracking_service;
pub mod worker_pool;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregation_service::{AggregationConfig, AggregationService};
pub use fallback::FallbackGenerator;
pub use fetch_coordinator::{FetchCoordinator, GatherReport, VendorOutcome, VendorReport};
pub use result_merger::{MergePolicy, ResultMerger};
pub use snapshot_cache::{CacheOutcome, CacheSource, SnapshotCache};
pub use tracking_service::TrackingService;
pub use worker_pool::{PoolError, PoolResult, PoolTask, WorkerPool, WorkerPoolConfig};
