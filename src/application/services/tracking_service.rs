//! # Tracking Service
//!
//! Adds products to the tracked list and reads it back.
//!
//! Unlike snapshot and history writes, adding a product is synchronous:
//! the caller gets the stored product or an error.

use crate::application::error::{ApplicationResult, InfrastructureError};
use crate::domain::entities::TrackedProduct;
use crate::domain::value_objects::Price;
use crate::infrastructure::persistence::traits::TrackedProductStore;
use std::sync::Arc;
use tracing::info;

/// Tracked product operations.
#[derive(Debug, Clone)]
pub struct TrackingService {
    store: Arc<dyn TrackedProductStore>,
}

impl TrackingService {
    /// Creates a service over a store.
    #[must_use]
    pub fn new(store: Arc<dyn TrackedProductStore>) -> Self {
        Self { store }
    }

    /// Starts tracking a product and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` for a blank name or an invalid
    /// price, and `ApplicationError::Infrastructure` when the store fails.
    pub async fn track(
        &self,
        product_name: &str,
        store: &str,
        current_price: Option<f64>,
    ) -> ApplicationResult<TrackedProduct> {
        let current_price = current_price.map(Price::new).transpose()?;
        let product = TrackedProduct::new(product_name, store, current_price)?;
        self.store
            .add(&product)
            .await
            .map_err(InfrastructureError::from)?;
        info!(
            id = %product.id(),
            product = product.product_name(),
            store = product.store(),
            "product tracked"
        );
        Ok(product)
    }

    /// Returns every tracked product, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Infrastructure` when the store fails.
    pub async fn tracked_products(&self) -> ApplicationResult<Vec<TrackedProduct>> {
        let products = self
            .store
            .list()
            .await
            .map_err(InfrastructureError::from)?;
        Ok(products)
    }
}
