//! # Identifiers
//!
//! Vendor, snapshot and tracked product identifiers.

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a marketplace vendor.
///
/// Stored lowercase. The identifier `fallback` is reserved for synthetic
/// listings produced when no vendor returned data.
///
/// # Examples
///
/// ```
/// use pricehawk::domain::value_objects::ids::VendorId;
///
/// let id = VendorId::new("Amazon");
/// assert_eq!(id.as_str(), "amazon");
/// assert!(!id.is_fallback());
/// assert!(VendorId::fallback().is_fallback());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorId(String);

impl VendorId {
    /// The reserved identifier carried by fallback listings.
    pub const FALLBACK: &'static str = "fallback";

    /// Creates a vendor id, trimming and lowercasing the input.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_lowercase())
    }

    /// Creates a vendor id for a configured marketplace.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidVendorId`] if the id is empty, uses
    /// characters other than `[a-z0-9_-]`, or is the reserved `fallback` id.
    pub fn parse(id: &str) -> DomainResult<Self> {
        let candidate = Self::new(id);
        if candidate.0.is_empty() {
            return Err(DomainError::invalid_vendor_id("empty"));
        }
        if candidate.is_fallback() {
            return Err(DomainError::invalid_vendor_id(format!(
                "'{}' is reserved",
                Self::FALLBACK
            )));
        }
        let valid = candidate
            .0
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid {
            return Err(DomainError::invalid_vendor_id(candidate.0));
        }
        Ok(candidate)
    }

    /// Returns the reserved fallback vendor id.
    #[must_use]
    pub fn fallback() -> Self {
        Self(Self::FALLBACK.to_string())
    }

    /// Returns true for the reserved fallback id.
    #[inline]
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.0 == Self::FALLBACK
    }

    /// Returns the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a persisted snapshot row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(Uuid);

impl SnapshotId {
    /// Wraps an existing UUID.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generates a random snapshot id.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn get(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a tracked product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackedProductId(Uuid);

impl TrackedProductId {
    /// Wraps an existing UUID.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generates a random id.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn get(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for TrackedProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_simple_ids() {
        assert_eq!(VendorId::parse(" Flipkart ").unwrap().as_str(), "flipkart");
        assert!(VendorId::parse("reliance-digital").is_ok());
        assert!(VendorId::parse("vijay_sales2").is_ok());
    }

    #[test]
    fn parse_rejects_reserved_and_malformed() {
        assert!(VendorId::parse("").is_err());
        assert!(VendorId::parse("fallback").is_err());
        assert!(VendorId::parse("FALLBACK").is_err());
        assert!(VendorId::parse("has space").is_err());
    }

    #[test]
    fn snapshot_ids_are_unique() {
        assert_ne!(SnapshotId::new_v4(), SnapshotId::new_v4());
    }
}
