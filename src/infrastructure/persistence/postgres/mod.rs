//! # PostgreSQL Repositories
//!
//! sqlx-backed implementations of the persistence ports.
//!
//! Call [`ensure_schema`] once after connecting.

pub mod history_log;
pub mod schema;
pub mod snapshot_store;
pub mod tracked_product_store;

pub use history_log::PostgresHistoryLog;
pub use schema::ensure_schema;
pub use snapshot_store::PostgresSnapshotStore;
pub use tracked_product_store::PostgresTrackedProductStore;
