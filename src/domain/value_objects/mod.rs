//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! - [`NormalizedQuery`]: validated query and its cache key
//! - [`VendorId`], [`SnapshotId`], [`TrackedProductId`]: identifiers
//! - [`Price`]: non-negative decimal price
//! - [`Rating`]: star rating in `[0, 5]`
//! - [`Timestamp`]: UTC point in time

pub mod ids;
pub mod price;
pub mod query;
pub mod rating;
pub mod timestamp;

pub use ids::{SnapshotId, TrackedProductId, VendorId};
pub use price::Price;
pub use query::NormalizedQuery;
pub use rating::Rating;
pub use timestamp::Timestamp;
