//! # Vendor Adapters
//!
//! Marketplace integrations behind the [`VendorClient`] port.
//!
//! ## Available Components
//!
//! - [`VendorClient`]: Trait every marketplace adapter implements
//! - [`HttpVendorClient`]: JSON offer-endpoint adapter
//! - [`FallbackChain`]: Primary/secondary composition of two clients
//! - [`VendorProfile`]: Vendor identity and search deep links
//! - [`HttpClient`]: Shared reqwest wrapper with error mapping
//! - [`VendorError`]: Typed vendor failures

pub mod chain;
pub mod error;
pub mod http_client;
pub mod http_vendor;
pub mod profile;
pub mod specs;
pub mod traits;

pub use chain::FallbackChain;
pub use error::{VendorError, VendorResult};
pub use http_client::HttpClient;
pub use http_vendor::{HttpVendorClient, OfferItem, SearchResponse};
pub use profile::VendorProfile;
pub use specs::summarize_highlights;
pub use traits::VendorClient;
