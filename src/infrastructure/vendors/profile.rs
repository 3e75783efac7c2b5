//! # Vendor Profiles
//!
//! Static identity of a marketplace: id, display name, search deep-link
//! template and placeholder artwork.
//!
//! Profiles are used by vendor adapters to resolve relative product links
//! and by the fallback generator to build search links.
//!
//! # Examples
//!
//! ```
//! use pricehawk::domain::value_objects::NormalizedQuery;
//! use pricehawk::infrastructure::vendors::profile::VendorProfile;
//!
//! let amazon = VendorProfile::amazon();
//! let query = NormalizedQuery::parse("iPhone 15").unwrap();
//! assert_eq!(amazon.search_url(&query), "https://www.amazon.in/s?k=iPhone+15");
//! ```

use crate::domain::errors::DomainResult;
use crate::domain::value_objects::{NormalizedQuery, VendorId};
use serde::{Deserialize, Serialize};
use url::Url;
use url::form_urlencoded;

/// Placeholder token replaced by the encoded query in search templates.
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Identity and link templates for one marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorProfile {
    id: VendorId,
    display_name: String,
    search_url_template: String,
    placeholder_image: String,
}

impl VendorProfile {
    /// Creates a profile.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the id is not a valid vendor id.
    pub fn new(
        id: &str,
        display_name: impl Into<String>,
        search_url_template: impl Into<String>,
        placeholder_image: impl Into<String>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: VendorId::parse(id)?,
            display_name: display_name.into(),
            search_url_template: search_url_template.into(),
            placeholder_image: placeholder_image.into(),
        })
    }

    /// Amazon India.
    #[must_use]
    pub fn amazon() -> Self {
        Self::builtin(
            "amazon",
            "Amazon",
            "https://www.amazon.in/s?k={query}",
            "https://fpoimg.com/300x300?text=Amazon+Phone",
        )
    }

    /// Flipkart.
    #[must_use]
    pub fn flipkart() -> Self {
        Self::builtin(
            "flipkart",
            "Flipkart",
            "https://www.flipkart.com/search?q={query}",
            "https://fpoimg.com/300x300?text=Flipkart+Phone",
        )
    }

    /// Croma.
    #[must_use]
    pub fn croma() -> Self {
        Self::builtin(
            "croma",
            "Croma",
            "https://www.croma.com/search/?text={query}",
            "https://fpoimg.com/300x300?text=Croma+Phone",
        )
    }

    /// Returns the built-in marketplace profiles in their default order.
    #[must_use]
    pub fn builtins() -> Vec<Self> {
        vec![Self::flipkart(), Self::amazon(), Self::croma()]
    }

    /// Looks up a built-in profile by id.
    #[must_use]
    pub fn builtin_by_id(id: &str) -> Option<Self> {
        let id = VendorId::new(id);
        Self::builtins().into_iter().find(|p| p.id == id)
    }

    fn builtin(id: &str, name: &str, template: &str, image: &str) -> Self {
        Self {
            id: VendorId::new(id),
            display_name: name.to_string(),
            search_url_template: template.to_string(),
            placeholder_image: image.to_string(),
        }
    }

    /// Returns the vendor id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &VendorId {
        &self.id
    }

    /// Returns the human-readable vendor name.
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the placeholder image URL.
    #[inline]
    #[must_use]
    pub fn placeholder_image(&self) -> &str {
        &self.placeholder_image
    }

    /// Returns the raw search URL template.
    #[inline]
    #[must_use]
    pub fn search_url_template(&self) -> &str {
        &self.search_url_template
    }

    /// Builds the vendor search deep link for a query.
    ///
    /// The query is form-encoded (spaces become `+`). Templates without a
    /// `{query}` placeholder get the encoded query appended.
    #[must_use]
    pub fn search_url(&self, query: &NormalizedQuery) -> String {
        let encoded: String = form_urlencoded::byte_serialize(query.display().as_bytes()).collect();
        if self.search_url_template.contains(QUERY_PLACEHOLDER) {
            self.search_url_template.replace(QUERY_PLACEHOLDER, &encoded)
        } else {
            format!("{}{}", self.search_url_template, encoded)
        }
    }

    /// Resolves a possibly relative product link against the vendor origin.
    ///
    /// Absolute `http(s)` links are returned unchanged.
    #[must_use]
    pub fn absolute_url(&self, href: &str) -> String {
        let href = href.trim();
        if href.starts_with("http://") || href.starts_with("https://") {
            return href.to_string();
        }
        let base = self.search_url_template.replace(QUERY_PLACEHOLDER, "");
        Url::parse(&base)
            .and_then(|base| base.join(href))
            .map(|u| u.to_string())
            .unwrap_or_else(|_| href.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builtin_search_links_encode_query() {
        let q = NormalizedQuery::parse("Galaxy S24 & Case").unwrap();
        assert_eq!(
            VendorProfile::flipkart().search_url(&q),
            "https://www.flipkart.com/search?q=Galaxy+S24+%26+Case"
        );
        assert_eq!(
            VendorProfile::croma().search_url(&q),
            "https://www.croma.com/search/?text=Galaxy+S24+%26+Case"
        );
    }

    #[test]
    fn template_without_placeholder_appends() {
        let profile =
            VendorProfile::new("shop", "Shop", "https://shop.test/find?q=", "img").unwrap();
        let q = NormalizedQuery::parse("pixel 8").unwrap();
        assert_eq!(profile.search_url(&q), "https://shop.test/find?q=pixel+8");
    }

    #[test]
    fn resolves_relative_links() {
        let amazon = VendorProfile::amazon();
        assert_eq!(
            amazon.absolute_url("/dp/B0CHX1W1XY"),
            "https://www.amazon.in/dp/B0CHX1W1XY"
        );
        assert_eq!(
            amazon.absolute_url("https://other.test/x"),
            "https://other.test/x"
        );
    }

    #[test]
    fn builtin_lookup() {
        assert_eq!(
            VendorProfile::builtin_by_id("Croma").unwrap().display_name(),
            "Croma"
        );
        assert!(VendorProfile::builtin_by_id("ebay").is_none());
    }

    #[test]
    fn new_rejects_reserved_id() {
        assert!(VendorProfile::new("fallback", "F", "t", "i").is_err());
    }
}
