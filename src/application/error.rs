//! # Application Errors
//!
//! Error types for the application layer.
//!
//! Vendor failures and persistence failures are absorbed inside the
//! aggregation pipeline and only ever logged. The one error a caller of
//! `fetch_pricing` can observe is [`ApplicationError::InvalidQuery`]. The
//! remaining variants are raised while wiring the service at startup.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── InvalidQuery(String)                  - Blank or malformed query
//! ├── Domain(DomainError)                   - Invalid domain value in settings or input
//! ├── Infrastructure(InfrastructureError)   - Database / network setup failures
//! ├── Configuration(String)                 - Invalid settings
//! └── Internal(String)                      - Unexpected state
//! ```
//!
//! # Examples
//!
//! ```
//! use pricehawk::application::error::{ApplicationError, InfrastructureError};
//! use pricehawk::domain::DomainError;
//!
//! let err: ApplicationError = DomainError::BlankQuery.into();
//! assert!(err.is_invalid_query());
//!
//! let err: ApplicationError = InfrastructureError::database("refused").into();
//! assert!(!err.is_invalid_query());
//! ```

use crate::domain::errors::DomainError;
use crate::infrastructure::persistence::RepositoryError;
use thiserror::Error;

/// Infrastructure layer error.
///
/// Failures of external systems met while building the service.
#[derive(Debug, Error)]
pub enum InfrastructureError {
    /// Database error.
    #[error("database error: {0}")]
    Database(String),

    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl InfrastructureError {
    /// Creates a database error.
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Repository(e) => e.is_connection(),
            Self::Database(_) => false,
        }
    }
}

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The query was blank or otherwise unusable.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Domain error from value construction.
    #[error("domain error: {0}")]
    Domain(DomainError),

    /// Infrastructure error from external systems.
    #[error("infrastructure error: {0}")]
    Infrastructure(#[from] InfrastructureError),

    /// Settings failed to load or validate.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates an invalid query error.
    #[must_use]
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this is an invalid query error.
    #[must_use]
    pub fn is_invalid_query(&self) -> bool {
        matches!(self, Self::InvalidQuery(_))
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Infrastructure(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl From<DomainError> for ApplicationError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::BlankQuery => Self::InvalidQuery(error.to_string()),
            other => Self::Domain(other),
        }
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
