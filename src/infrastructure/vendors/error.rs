//! # Vendor Errors
//!
//! Error types for vendor client operations.
//!
//! Every vendor adapter reports failure through [`VendorError`]. The fetch
//! coordinator never lets these escape: they become an absent outcome.
//!
//! # Examples
//!
//! ```
//! use pricehawk::infrastructure::vendors::error::VendorError;
//!
//! let error = VendorError::timeout("search page took too long");
//! assert!(error.is_retryable());
//!
//! let error = VendorError::protocol_error("price element missing");
//! assert!(!error.is_retryable());
//! ```

use crate::domain::value_objects::VendorId;
use thiserror::Error;

/// Error type for vendor client operations.
#[derive(Debug, Clone, Error)]
pub enum VendorError {
    /// Request timed out.
    #[error("vendor timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Timeout duration in milliseconds.
        timeout_ms: Option<u64>,
    },

    /// Network or connection error.
    #[error("vendor connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// The vendor refused the request (401/403, bot wall).
    #[error("vendor rejected request: {message}")]
    Rejected {
        /// Error message.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("vendor rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
        /// Retry after duration in milliseconds.
        retry_after_ms: Option<u64>,
    },

    /// Invalid request parameters.
    #[error("vendor invalid request: {message}")]
    InvalidRequest {
        /// Error message.
        message: String,
    },

    /// Response could not be parsed into a listing.
    #[error("vendor protocol error: {message}")]
    ProtocolError {
        /// Error message.
        message: String,
    },

    /// Vendor is disabled or otherwise unavailable.
    #[error("vendor unavailable: {vendor_id} - {message}")]
    VendorUnavailable {
        /// The vendor ID.
        vendor_id: VendorId,
        /// Error message.
        message: String,
    },

    /// Internal adapter error.
    #[error("vendor internal error: {message}")]
    InternalError {
        /// Error message.
        message: String,
    },
}

impl VendorError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout error with duration.
    #[must_use]
    pub fn timeout_with_duration(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a rejected error.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_ms: None,
        }
    }

    /// Creates a rate limited error with retry duration.
    #[must_use]
    pub fn rate_limited_with_retry(message: impl Into<String>, retry_after_ms: u64) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_ms: Some(retry_after_ms),
        }
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol_error(message: impl Into<String>) -> Self {
        Self::ProtocolError {
            message: message.into(),
        }
    }

    /// Creates a vendor unavailable error.
    #[must_use]
    pub fn vendor_unavailable(vendor_id: VendorId, message: impl Into<String>) -> Self {
        Self::VendorUnavailable {
            vendor_id,
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Returns true if this error is transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::Connection { .. }
                | Self::RateLimited { .. }
                | Self::VendorUnavailable { .. }
        )
    }

    /// Returns true if this is a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns the retry delay in milliseconds, if applicable.
    #[must_use]
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_ms, .. } => *retry_after_ms,
            _ => None,
        }
    }
}

/// Result type for vendor operations.
pub type VendorResult<T> = Result<T, VendorError>;
