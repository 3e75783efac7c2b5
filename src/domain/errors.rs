//! # Domain Errors
//!
//! Error types raised when constructing domain values.
//!
//! Domain errors signal that an input violates an invariant of the data
//! model (a blank query, a negative price, a rating outside `[0, 5]`).
//! They never carry I/O failures; those live in the infrastructure layer.

use thiserror::Error;

/// Error type for domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Query is empty after trimming.
    #[error("query must not be blank")]
    BlankQuery,

    /// Price is negative, not finite, or unparseable.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// Rating is outside `[0, 5]` or unparseable.
    #[error("invalid rating: {0}")]
    InvalidRating(String),

    /// Vendor identifier is empty or malformed.
    #[error("invalid vendor id: {0}")]
    InvalidVendorId(String),

    /// Tracked product name is empty after trimming.
    #[error("product name must not be blank")]
    BlankProductName,
}

impl DomainError {
    /// Creates an invalid price error.
    #[must_use]
    pub fn invalid_price(message: impl Into<String>) -> Self {
        Self::InvalidPrice(message.into())
    }

    /// Creates an invalid rating error.
    #[must_use]
    pub fn invalid_rating(message: impl Into<String>) -> Self {
        Self::InvalidRating(message.into())
    }

    /// Creates an invalid vendor id error.
    #[must_use]
    pub fn invalid_vendor_id(message: impl Into<String>) -> Self {
        Self::InvalidVendorId(message.into())
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(DomainError::BlankQuery.to_string(), "query must not be blank");
        assert!(DomainError::invalid_price("-1").to_string().contains("-1"));
        assert!(DomainError::invalid_rating("7").to_string().contains("rating"));
        assert!(
            DomainError::invalid_vendor_id("")
                .to_string()
                .contains("vendor")
        );
        assert!(DomainError::BlankProductName.to_string().contains("product name"));
    }
}
