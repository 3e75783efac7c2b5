//! # Result Merger
//!
//! Turns per-vendor outcomes into an ordered [`AggregationResult`].
//!
//! The merger is pure: no I/O, inputs are consumed and a new result is
//! built from them.
//!
//! ## Ordering
//!
//! - priced listings by price ascending
//! - priceless listings after every priced one
//! - equal keys keep their input (vendor arrival) order
//!
//! ## Policies
//!
//! - [`MergePolicy::Strict`] drops absent and priceless entries.
//! - [`MergePolicy::Lenient`] keeps priceless entries at the tail; used for
//!   fallback-only results.

use crate::domain::entities::{AggregationResult, Listing};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Which entries survive a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MergePolicy {
    /// Keep only priced listings.
    #[default]
    Strict,
    /// Keep priceless listings after priced ones.
    Lenient,
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "STRICT"),
            Self::Lenient => write!(f, "LENIENT"),
        }
    }
}

/// Result ordering: price ascending, priceless last.
#[must_use]
pub fn price_order(a: &Listing, b: &Listing) -> Ordering {
    match (a.price(), b.price()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sorts listings into result order. Stable.
pub fn sort_listings(listings: &mut [Listing]) {
    listings.sort_by(price_order);
}

/// Merges vendor outcomes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultMerger {
    policy: MergePolicy,
}

impl ResultMerger {
    /// Creates a merger with the given policy.
    #[must_use]
    pub fn new(policy: MergePolicy) -> Self {
        Self { policy }
    }

    /// A strict merger.
    #[must_use]
    pub fn strict() -> Self {
        Self::new(MergePolicy::Strict)
    }

    /// A lenient merger.
    #[must_use]
    pub fn lenient() -> Self {
        Self::new(MergePolicy::Lenient)
    }

    /// Returns the merge policy.
    #[inline]
    #[must_use]
    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// Filters, sorts and optionally enriches outcomes.
    ///
    /// `outcomes` are in vendor arrival order; `None` is a vendor with no
    /// listing. A non-blank `enrichment` is attached to the cheapest priced
    /// listing only, replacing whatever enrichment it carried.
    #[must_use]
    pub fn merge<I>(&self, outcomes: I, enrichment: Option<&str>) -> AggregationResult
    where
        I: IntoIterator<Item = Option<Listing>>,
    {
        let mut listings: Vec<Listing> = outcomes
            .into_iter()
            .flatten()
            .filter(|l| self.policy == MergePolicy::Lenient || l.has_price())
            .collect();

        sort_listings(&mut listings);

        if let Some(text) = enrichment.map(str::trim).filter(|t| !t.is_empty()) {
            if let Some(first) = listings.first_mut().filter(|l| l.has_price()) {
                *first = first.clone().with_enrichment(text);
            }
        }

        AggregationResult::from_ordered(listings)
    }
}
