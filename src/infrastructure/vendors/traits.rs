//! # Vendor Client Trait
//!
//! Port definition for marketplace integrations.
//!
//! This module defines the [`VendorClient`] trait that every marketplace
//! adapter implements. One client exists per vendor; the fetch coordinator
//! runs them concurrently and treats each as an unreliable black box.
//!
//! # Examples
//!
//! ```ignore
//! use pricehawk::infrastructure::vendors::traits::VendorClient;
//!
//! #[async_trait::async_trait]
//! impl VendorClient for MyMarketplace {
//!     // ... implement required methods
//! }
//! ```

use crate::domain::entities::Listing;
use crate::domain::value_objects::{NormalizedQuery, VendorId};
use crate::infrastructure::vendors::error::VendorResult;
use async_trait::async_trait;
use std::fmt;

/// Trait defining the interface for marketplace adapters.
///
/// # Error Handling
///
/// `fetch` returns `Ok(None)` when the vendor answered but had no usable
/// listing, and `Err(VendorError)` for every failure. Implementations must
/// not panic across this boundary; the coordinator isolates panics anyway,
/// but a panic is logged as a failure rather than a clean miss.
#[async_trait]
pub trait VendorClient: Send + Sync + fmt::Debug {
    /// Returns the vendor ID.
    fn vendor_id(&self) -> &VendorId;

    /// Returns a vendor-specific time budget in milliseconds.
    ///
    /// When `None`, the coordinator's per-vendor budget applies. When set,
    /// the smaller of the two wins.
    fn timeout_ms(&self) -> Option<u64> {
        None
    }

    /// Fetches the best-matching listing for a query.
    ///
    /// # Errors
    ///
    /// - `VendorError::Timeout` - Request timed out
    /// - `VendorError::Connection` - Network failure
    /// - `VendorError::Rejected` - Vendor refused the request
    /// - `VendorError::ProtocolError` - Response could not be interpreted
    async fn fetch(&self, query: &NormalizedQuery) -> VendorResult<Option<Listing>>;
}
