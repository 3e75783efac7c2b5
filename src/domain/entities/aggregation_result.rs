//! # Aggregation Result
//!
//! The ordered listing set returned for one query.
//!
//! Order: price ascending, priceless listings last, ties in vendor arrival
//! order. The merger is the only producer of a correctly ordered result;
//! this type just carries it.

use crate::domain::entities::listing::Listing;
use serde::{Deserialize, Serialize};

/// Ordered listings for a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregationResult(Vec<Listing>);

impl AggregationResult {
    /// Wraps listings that are already in result order.
    #[must_use]
    pub fn from_ordered(listings: Vec<Listing>) -> Self {
        Self(listings)
    }

    /// An empty result.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the listings in order.
    #[inline]
    #[must_use]
    pub fn listings(&self) -> &[Listing] {
        &self.0
    }

    /// Consumes the result, returning its listings.
    #[must_use]
    pub fn into_listings(self) -> Vec<Listing> {
        self.0
    }

    /// Iterates the listings in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Listing> {
        self.0.iter()
    }

    /// Number of listings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no listings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The cheapest priced listing.
    #[must_use]
    pub fn cheapest(&self) -> Option<&Listing> {
        self.0.first().filter(|l| l.has_price())
    }

    /// True if the result is non-empty and made only of fallback listings.
    #[must_use]
    pub fn is_fallback_only(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(Listing::is_fallback)
    }
}

impl IntoIterator for AggregationResult {
    type Item = Listing;
    type IntoIter = std::vec::IntoIter<Listing>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a AggregationResult {
    type Item = &'a Listing;
    type IntoIter = std::slice::Iter<'a, Listing>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
