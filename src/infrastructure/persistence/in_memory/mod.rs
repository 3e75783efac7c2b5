//! # In-Memory Repositories
//!
//! In-memory implementations for tests and database-less runs.
//!
//! ## Available Repositories
//!
//! - [`InMemorySnapshotStore`]: Listing snapshots
//! - [`InMemoryHistoryLog`]: Search history
//! - [`InMemoryTrackedProductStore`]: Tracked products
//!
//! ## Thread Safety
//!
//! All implementations use `Arc<RwLock<..>>` for thread-safe access.

pub mod history_log;
pub mod snapshot_store;
pub mod tracked_product_store;

pub use history_log::InMemoryHistoryLog;
pub use snapshot_store::InMemorySnapshotStore;
pub use tracked_product_store::InMemoryTrackedProductStore;
