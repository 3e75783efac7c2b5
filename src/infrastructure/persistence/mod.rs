//! # Persistence Layer
//!
//! Snapshot, history and tracked product storage.
//!
//! ## Repository Traits (Ports)
//!
//! - [`SnapshotStore`]: Listing snapshots keyed by normalized query
//! - [`HistoryLog`]: Search history
//! - [`TrackedProductStore`]: Tracked products
//!
//! ## Implementations
//!
//! - `in_memory`: In-memory implementations for tests and database-less runs
//! - `postgres`: PostgreSQL implementations

pub mod in_memory;
pub mod postgres;
pub mod traits;

pub use traits::{
    HistoryLog, RepositoryError, RepositoryResult, SnapshotStore, TrackedProductStore,
};
