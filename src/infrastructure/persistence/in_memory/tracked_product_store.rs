//! # In-Memory Tracked Product Store
//!
//! In-memory implementation of [`TrackedProductStore`].

use crate::domain::entities::TrackedProduct;
use crate::infrastructure::persistence::traits::{RepositoryResult, TrackedProductStore};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`TrackedProductStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrackedProductStore {
    products: Arc<RwLock<Vec<TrackedProduct>>>,
}

impl InMemoryTrackedProductStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.try_read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns true if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TrackedProductStore for InMemoryTrackedProductStore {
    async fn add(&self, product: &TrackedProduct) -> RepositoryResult<()> {
        self.products.write().await.push(product.clone());
        Ok(())
    }

    async fn list(&self) -> RepositoryResult<Vec<TrackedProduct>> {
        Ok(self.products.read().await.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_in_insertion_order() {
        let store = InMemoryTrackedProductStore::new();
        assert!(store.is_empty());

        for name in ["Pixel 8", "iPhone 15"] {
            let product = TrackedProduct::new(name, "Amazon", None).unwrap();
            store.add(&product).await.unwrap();
        }

        assert_eq!(store.len(), 2);
        let products = store.list().await.unwrap();
        assert_eq!(products[0].product_name(), "Pixel 8");
        assert_eq!(products[1].product_name(), "iPhone 15");
    }
}
