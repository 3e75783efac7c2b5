//! # Repository Traits
//!
//! Port definitions for persistence abstraction.
//!
//! All stores are append-only. The core never updates or deletes a row.
//! Snapshot and history writes are safe to issue fire-and-forget.
//!
//! # Available Repositories
//!
//! - [`SnapshotStore`]: Timestamped listings keyed by normalized query
//! - [`HistoryLog`]: One record per live search
//! - [`TrackedProductStore`]: Products users asked to watch
//!
//! # Examples
//!
//! ```ignore
//! use pricehawk::infrastructure::persistence::traits::SnapshotStore;
//!
//! async fn fresh(store: &impl SnapshotStore, since: Timestamp) {
//!     let snapshots = store.find_recent("iphone 15", since).await?;
//!     println!("{} cached listings", snapshots.len());
//! }
//! ```

use crate::domain::entities::{SearchRecord, Snapshot, TrackedProduct};
use crate::domain::value_objects::Timestamp;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query error.
    #[error("Query error: {0}")]
    Query(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if the backend was unreachable.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Store of listing snapshots.
///
/// Snapshots are keyed by the normalized query string.
#[async_trait]
pub trait SnapshotStore: Send + Sync + fmt::Debug {
    /// Finds snapshots for `query` captured at or after `since`.
    ///
    /// Order is unspecified; callers sort.
    async fn find_recent(&self, query: &str, since: Timestamp) -> RepositoryResult<Vec<Snapshot>>;

    /// Returns up to `limit` snapshots for `query`, newest first.
    async fn latest(&self, query: &str, limit: usize) -> RepositoryResult<Vec<Snapshot>>;

    /// Appends a snapshot.
    async fn append(&self, snapshot: &Snapshot) -> RepositoryResult<()>;
}

/// Audit log of live searches.
#[async_trait]
pub trait HistoryLog: Send + Sync + fmt::Debug {
    /// Records one search.
    async fn record(&self, record: &SearchRecord) -> RepositoryResult<()>;

    /// Returns up to `limit` records, newest first.
    async fn recent(&self, limit: usize) -> RepositoryResult<Vec<SearchRecord>>;
}

/// List of tracked products.
#[async_trait]
pub trait TrackedProductStore: Send + Sync + fmt::Debug {
    /// Saves a product.
    async fn add(&self, product: &TrackedProduct) -> RepositoryResult<()>;

    /// Returns every product, oldest first.
    async fn list(&self) -> RepositoryResult<Vec<TrackedProduct>>;
}
