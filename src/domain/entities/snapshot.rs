//! # Snapshot Entity
//!
//! A listing persisted under its normalized query.
//!
//! Snapshots are append-only: a changed listing is a new snapshot, never an
//! update of an existing row.

use crate::domain::entities::listing::Listing;
use crate::domain::value_objects::{NormalizedQuery, SnapshotId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A persisted, timestamped listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    id: SnapshotId,
    query: String,
    listing: Listing,
    captured_at: Timestamp,
}

impl Snapshot {
    /// Captures a listing for a query at the current time.
    #[must_use]
    pub fn capture(query: &NormalizedQuery, listing: Listing) -> Self {
        Self {
            id: SnapshotId::new_v4(),
            query: query.as_str().to_string(),
            listing,
            captured_at: Timestamp::now(),
        }
    }

    /// Recreates a snapshot from stored parts.
    #[must_use]
    pub fn from_parts(
        id: SnapshotId,
        query: impl Into<String>,
        listing: Listing,
        captured_at: Timestamp,
    ) -> Self {
        Self {
            id,
            query: query.into(),
            listing,
            captured_at,
        }
    }

    /// Returns the snapshot id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> SnapshotId {
        self.id
    }

    /// Returns the normalized query key.
    #[inline]
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the stored listing.
    #[inline]
    #[must_use]
    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    /// Consumes the snapshot, returning its listing.
    #[must_use]
    pub fn into_listing(self) -> Listing {
        self.listing
    }

    /// Returns when the snapshot was captured.
    #[inline]
    #[must_use]
    pub fn captured_at(&self) -> Timestamp {
        self.captured_at
    }

    /// Returns true if captured at or after `since`.
    #[must_use]
    pub fn is_fresh_since(&self, since: Timestamp) -> bool {
        !self.captured_at.is_before(&since)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Snapshot({} '{}' {} at {})",
            self.id, self.query, self.listing, self.captured_at
        )
    }
}
