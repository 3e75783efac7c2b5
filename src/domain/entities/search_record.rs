//! # Search Record Entity
//!
//! One history row per live search, kept for trending and failure analysis.

use crate::domain::value_objects::{NormalizedQuery, Timestamp};
use serde::{Deserialize, Serialize};

/// A search history record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Query as typed (trimmed).
    pub query: String,
    /// Lowercase, trimmed grouping key.
    pub query_normalized: String,
    /// Number of listings returned to the caller.
    pub result_count: usize,
    /// When the search ran.
    pub searched_at: Timestamp,
}

impl SearchRecord {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(query: &NormalizedQuery, result_count: usize) -> Self {
        Self {
            query: query.display().to_string(),
            query_normalized: query.as_str().to_string(),
            result_count,
            searched_at: Timestamp::now(),
        }
    }
}
