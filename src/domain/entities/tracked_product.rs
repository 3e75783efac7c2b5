//! # Tracked Product Entity
//!
//! A product a user asked to watch, with the price seen when tracking
//! started.
//!
//! Tracked products are a plain list. Nothing in the aggregation pipeline
//! reads them.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Price, Timestamp, TrackedProductId};
use serde::{Deserialize, Serialize};

/// A watched product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedProduct {
    id: TrackedProductId,
    product_name: String,
    store: String,
    current_price: Option<Price>,
    tracked_at: Timestamp,
}

impl TrackedProduct {
    /// Starts tracking a product now.
    ///
    /// Name and store are trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::BlankProductName`] if the name is blank.
    pub fn new(
        product_name: &str,
        store: &str,
        current_price: Option<Price>,
    ) -> DomainResult<Self> {
        let product_name = product_name.trim();
        if product_name.is_empty() {
            return Err(DomainError::BlankProductName);
        }
        Ok(Self {
            id: TrackedProductId::new_v4(),
            product_name: product_name.to_string(),
            store: store.trim().to_string(),
            current_price,
            tracked_at: Timestamp::now(),
        })
    }

    /// Rebuilds a stored product.
    #[must_use]
    pub fn from_parts(
        id: TrackedProductId,
        product_name: impl Into<String>,
        store: impl Into<String>,
        current_price: Option<Price>,
        tracked_at: Timestamp,
    ) -> Self {
        Self {
            id,
            product_name: product_name.into(),
            store: store.into(),
            current_price,
            tracked_at,
        }
    }

    /// Returns the id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> TrackedProductId {
        self.id
    }

    /// Returns the product name.
    #[inline]
    #[must_use]
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Returns the store the price was seen at.
    #[inline]
    #[must_use]
    pub fn store(&self) -> &str {
        &self.store
    }

    /// Returns the price at tracking time, if known.
    #[inline]
    #[must_use]
    pub fn current_price(&self) -> Option<Price> {
        self.current_price
    }

    /// Returns when tracking started.
    #[inline]
    #[must_use]
    pub fn tracked_at(&self) -> Timestamp {
        self.tracked_at
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_stamps() {
        let before = Timestamp::now();
        let product =
            TrackedProduct::new("  Pixel 8 ", " Flipkart ", Some(Price::new(52999.0).unwrap()))
                .unwrap();
        assert_eq!(product.product_name(), "Pixel 8");
        assert_eq!(product.store(), "Flipkart");
        assert_eq!(product.current_price(), Some(Price::new(52999.0).unwrap()));
        assert!(!product.tracked_at().is_before(&before));
    }

    #[test]
    fn blank_name_is_rejected() {
        assert_eq!(
            TrackedProduct::new("   ", "Amazon", None).unwrap_err(),
            DomainError::BlankProductName
        );
    }

    #[test]
    fn serializes_camel_case() {
        let product = TrackedProduct::new("iPhone 15", "Amazon", None).unwrap();
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["productName"], "iPhone 15");
        assert_eq!(json["store"], "Amazon");
        assert!(json["currentPrice"].is_null());
        assert!(json["trackedAt"].is_string());
        assert!(json["id"].is_string());
    }
}
