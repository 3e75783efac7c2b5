//! # Domain Entities
//!
//! - [`Listing`]: one vendor offer for a query
//! - [`AggregationResult`]: the ordered listings returned for a query
//! - [`Snapshot`]: a persisted listing keyed by normalized query
//! - [`SearchRecord`]: a search history row
//! - [`TrackedProduct`]: a product a user asked to watch

pub mod aggregation_result;
pub mod listing;
pub mod search_record;
pub mod snapshot;
pub mod tracked_product;

pub use aggregation_result::AggregationResult;
pub use listing::{Listing, ListingBuilder};
pub use search_record::SearchRecord;
pub use snapshot::Snapshot;
pub use tracked_product::TrackedProduct;
