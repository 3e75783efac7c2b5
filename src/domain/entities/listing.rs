//! # Listing Entity
//!
//! One vendor's offer for a query at a point in time.
//!
//! # Examples
//!
//! ```
//! use pricehawk::domain::entities::listing::ListingBuilder;
//! use pricehawk::domain::value_objects::{Price, VendorId};
//!
//! let listing = ListingBuilder::new(
//!     VendorId::new("amazon"),
//!     "https://www.amazon.in/dp/B0CHX1W1XY",
//!     "Apple iPhone 15 (128 GB) - Black",
//! )
//! .price(Price::new(74999.0).unwrap())
//! .build();
//!
//! assert!(listing.has_price());
//! assert!(listing.in_stock());
//! ```

use crate::domain::value_objects::{Price, Rating, Timestamp, VendorId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A vendor offer.
///
/// Listings are immutable once built. The only permitted change is the
/// enrichment attach performed by the merger, which works on a copy via
/// [`Listing::with_enrichment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    vendor: VendorId,
    price: Option<Price>,
    url: String,
    title: String,
    in_stock: bool,
    image_url: Option<String>,
    rating: Option<Rating>,
    enrichment: Option<String>,
    observed_at: Timestamp,
}

impl Listing {
    /// Returns a builder for a listing.
    #[must_use]
    pub fn builder(
        vendor: VendorId,
        url: impl Into<String>,
        title: impl Into<String>,
    ) -> ListingBuilder {
        ListingBuilder::new(vendor, url, title)
    }

    /// Returns the vendor that produced this listing.
    #[inline]
    #[must_use]
    pub fn vendor(&self) -> &VendorId {
        &self.vendor
    }

    /// Returns the listed price, if the vendor exposed one.
    #[inline]
    #[must_use]
    pub fn price(&self) -> Option<Price> {
        self.price
    }

    /// Returns the product or search URL.
    #[inline]
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the listing title.
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns true if the vendor reports the item in stock.
    #[inline]
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.in_stock
    }

    /// Returns the image URL.
    #[inline]
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Returns the star rating.
    #[inline]
    #[must_use]
    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    /// Returns the enrichment summary (specs, rating digest).
    #[inline]
    #[must_use]
    pub fn enrichment(&self) -> Option<&str> {
        self.enrichment.as_deref()
    }

    /// Returns when the listing was observed.
    #[inline]
    #[must_use]
    pub fn observed_at(&self) -> Timestamp {
        self.observed_at
    }

    /// Returns true if a price is present.
    #[inline]
    #[must_use]
    pub fn has_price(&self) -> bool {
        self.price.is_some()
    }

    /// Returns true for synthetic listings produced by the fallback
    /// generator.
    #[inline]
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.vendor.is_fallback()
    }

    /// Returns a copy with the enrichment summary set.
    #[must_use]
    pub fn with_enrichment(mut self, enrichment: impl Into<String>) -> Self {
        self.enrichment = Some(enrichment.into());
        self
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.price {
            Some(price) => write!(f, "Listing({} @ {})", self.vendor, price),
            None => write!(f, "Listing({} unpriced)", self.vendor),
        }
    }
}

/// Builder for [`Listing`].
#[derive(Debug, Clone)]
pub struct ListingBuilder {
    vendor: VendorId,
    price: Option<Price>,
    url: String,
    title: String,
    in_stock: bool,
    image_url: Option<String>,
    rating: Option<Rating>,
    enrichment: Option<String>,
    observed_at: Option<Timestamp>,
}

impl ListingBuilder {
    /// Starts a listing that is in stock and has no price.
    #[must_use]
    pub fn new(vendor: VendorId, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            vendor,
            price: None,
            url: url.into(),
            title: title.into(),
            in_stock: true,
            image_url: None,
            rating: None,
            enrichment: None,
            observed_at: None,
        }
    }

    /// Sets the price.
    #[must_use]
    pub fn price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    /// Sets an optional price.
    #[must_use]
    pub fn maybe_price(mut self, price: Option<Price>) -> Self {
        self.price = price;
        self
    }

    /// Sets stock availability.
    #[must_use]
    pub fn in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    /// Sets the image URL.
    #[must_use]
    pub fn image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Sets an optional image URL.
    #[must_use]
    pub fn maybe_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }

    /// Sets the rating.
    #[must_use]
    pub fn rating(mut self, rating: Option<Rating>) -> Self {
        self.rating = rating;
        self
    }

    /// Sets the enrichment summary.
    #[must_use]
    pub fn enrichment(mut self, enrichment: Option<String>) -> Self {
        self.enrichment = enrichment;
        self
    }

    /// Sets the observation time. Defaults to now.
    #[must_use]
    pub fn observed_at(mut self, observed_at: Timestamp) -> Self {
        self.observed_at = Some(observed_at);
        self
    }

    /// Builds the listing.
    #[must_use]
    pub fn build(self) -> Listing {
        Listing {
            vendor: self.vendor,
            price: self.price,
            url: self.url,
            title: self.title,
            in_stock: self.in_stock,
            image_url: self.image_url,
            rating: self.rating,
            enrichment: self.enrichment,
            observed_at: self.observed_at.unwrap_or_else(Timestamp::now),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn priced(vendor: &str, price: f64) -> Listing {
        ListingBuilder::new(VendorId::new(vendor), "https://example.test/p", "Phone")
            .price(Price::new(price).unwrap())
            .build()
    }

    #[test]
    fn builder_defaults() {
        let listing = ListingBuilder::new(VendorId::new("croma"), "u", "t").build();
        assert!(listing.in_stock());
        assert!(!listing.has_price());
        assert!(listing.image_url().is_none());
        assert!(listing.enrichment().is_none());
        assert!(!listing.is_fallback());
    }

    #[test]
    fn with_enrichment_copies() {
        let original = priced("amazon", 100.0);
        let enriched = original.clone().with_enrichment("8 GB RAM");
        assert!(original.enrichment().is_none());
        assert_eq!(enriched.enrichment(), Some("8 GB RAM"));
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(priced("amazon", 74999.0)).unwrap();
        assert_eq!(json["vendor"], "amazon");
        assert_eq!(json["inStock"], true);
        assert_eq!(json["price"], 74999.0);
        assert!(json.get("observedAt").is_some());
    }

    #[test]
    fn display() {
        assert!(priced("amazon", 10.0).to_string().contains("amazon"));
        let unpriced = ListingBuilder::new(VendorId::fallback(), "u", "t").build();
        assert!(unpriced.to_string().contains("unpriced"));
        assert!(unpriced.is_fallback());
    }
}
