//! # Query Value Object
//!
//! User search string plus its normalized cache key.
//!
//! # Examples
//!
//! ```
//! use pricehawk::domain::value_objects::query::NormalizedQuery;
//!
//! let query = NormalizedQuery::parse("  iPhone 15 ").unwrap();
//! assert_eq!(query.as_str(), "iphone 15");
//! assert_eq!(query.display(), "iPhone 15");
//!
//! assert!(NormalizedQuery::parse("   ").is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated, normalized product query.
///
/// The normalized form (trimmed, lowercase) is the key for snapshot and
/// history lookups. The trimmed original is kept for human-facing text such
/// as fallback titles and vendor search links.
///
/// # Invariants
///
/// - The normalized form is never empty.
/// - Two queries are equal iff their normalized forms are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedQuery {
    display: String,
    normalized: String,
}

impl NormalizedQuery {
    /// Validates and normalizes a raw query.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::BlankQuery`] if the input is empty after
    /// trimming.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::BlankQuery);
        }
        Ok(Self {
            display: trimmed.to_string(),
            normalized: trimmed.to_lowercase(),
        })
    }

    /// Returns the normalized key.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Returns the trimmed query as the user typed it.
    #[inline]
    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }
}

impl PartialEq for NormalizedQuery {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for NormalizedQuery {}

impl std::hash::Hash for NormalizedQuery {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
    }
}

impl fmt::Display for NormalizedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_lowercases() {
        let q = NormalizedQuery::parse("\t Galaxy S24 Ultra  ").unwrap();
        assert_eq!(q.as_str(), "galaxy s24 ultra");
        assert_eq!(q.display(), "Galaxy S24 Ultra");
    }

    #[test]
    fn rejects_blank() {
        assert_eq!(NormalizedQuery::parse(""), Err(DomainError::BlankQuery));
        assert_eq!(NormalizedQuery::parse("   "), Err(DomainError::BlankQuery));
        assert_eq!(NormalizedQuery::parse("\n\t"), Err(DomainError::BlankQuery));
    }

    #[test]
    fn equality_uses_normalized_form() {
        let a = NormalizedQuery::parse("iPhone 15").unwrap();
        let b = NormalizedQuery::parse("  IPHONE 15").unwrap();
        assert_eq!(a, b);
        assert_ne!(a.display(), b.display());
    }
}
