//! # PriceHawk
//!
//! Concurrent marketplace price aggregation.
//!
//! A query fans out to every configured vendor under a single deadline.
//! Whatever comes back in time is merged into one list ordered by price,
//! recent answers are served from timestamped snapshots, and when no
//! vendor produces a price the caller gets search links instead.
//!
//! # Layers
//!
//! - [`domain`]: Value objects, entities and invariant errors
//! - [`application`]: The aggregation pipeline and its services
//! - [`infrastructure`]: Vendor adapters, enrichment, snapshot and history stores
//! - [`api`]: axum HTTP surface
//! - [`config`]: Layered settings
//!
//! # Example
//!
//! ```no_run
//! use pricehawk::application::services::{
//!     AggregationConfig, AggregationService, WorkerPool, WorkerPoolConfig,
//! };
//! use pricehawk::infrastructure::persistence::in_memory::{
//!     InMemoryHistoryLog, InMemorySnapshotStore,
//! };
//! use pricehawk::infrastructure::vendors::VendorProfile;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = WorkerPool::new(WorkerPoolConfig::default())?;
//! let service = AggregationService::new(
//!     &AggregationConfig::default(),
//!     pool,
//!     Vec::new(),
//!     VendorProfile::builtins(),
//!     Arc::new(InMemorySnapshotStore::new()),
//!     Arc::new(InMemoryHistoryLog::new()),
//! );
//!
//! let result = service.fetch_pricing("iPhone 15").await?;
//! for listing in &result {
//!     println!("{listing}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
