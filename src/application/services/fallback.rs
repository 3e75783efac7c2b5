//! # Fallback Generator
//!
//! Synthetic search-link listings for when no vendor produced data.
//!
//! One priceless, in-stock listing per vendor profile, pointing at that
//! vendor's search page for the query. Every fallback listing carries the
//! reserved vendor id `fallback`, which is how the rest of the pipeline
//! recognizes (and refuses to persist) them.
//!
//! Output depends only on the inputs: the same query, profiles and
//! timestamp always yield identical listings.

use crate::domain::entities::Listing;
use crate::domain::value_objects::{NormalizedQuery, Timestamp, VendorId};
use crate::infrastructure::vendors::profile::VendorProfile;

/// Builds the fallback title for a vendor and query.
#[must_use]
pub fn fallback_title(profile: &VendorProfile, query: &NormalizedQuery) -> String {
    format!(
        "Open {} search for {}",
        profile.display_name(),
        query.display()
    )
}

/// Generates placeholder listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackGenerator;

impl FallbackGenerator {
    /// Creates a generator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// One listing per profile, in profile order.
    #[must_use]
    pub fn generate(
        &self,
        query: &NormalizedQuery,
        profiles: &[VendorProfile],
        observed_at: Timestamp,
    ) -> Vec<Listing> {
        profiles
            .iter()
            .map(|profile| {
                Listing::builder(
                    VendorId::fallback(),
                    profile.search_url(query),
                    fallback_title(profile, query),
                )
                .in_stock(true)
                .image_url(profile.placeholder_image())
                .observed_at(observed_at)
                .build()
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn query() -> NormalizedQuery {
        NormalizedQuery::parse("iPhone 15").unwrap()
    }

    #[test]
    fn one_priceless_listing_per_profile() {
        let at = Timestamp::from_secs(1_700_000_000).unwrap();
        let listings = FallbackGenerator::new().generate(&query(), &VendorProfile::builtins(), at);

        assert_eq!(listings.len(), 3);
        assert!(listings.iter().all(|l| l.is_fallback()));
        assert!(listings.iter().all(|l| !l.has_price() && l.in_stock()));
        assert_eq!(listings[0].title(), "Open Flipkart search for iPhone 15");
        assert_eq!(listings[0].url(), "https://www.flipkart.com/search?q=iPhone+15");
        assert_eq!(listings[1].url(), "https://www.amazon.in/s?k=iPhone+15");
        assert_eq!(
            listings[1].image_url(),
            Some("https://fpoimg.com/300x300?text=Amazon+Phone")
        );
        assert_eq!(listings[2].title(), "Open Croma search for iPhone 15");
    }

    #[test]
    fn output_is_deterministic() {
        let at = Timestamp::from_secs(1_700_000_000).unwrap();
        let generator = FallbackGenerator::new();
        let first = serde_json::to_vec(&generator.generate(&query(), &VendorProfile::builtins(), at))
            .unwrap();
        let second =
            serde_json::to_vec(&generator.generate(&query(), &VendorProfile::builtins(), at))
                .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn no_profiles_no_listings() {
        let listings = FallbackGenerator::new().generate(&query(), &[], Timestamp::now());
        assert!(listings.is_empty());
    }
}
