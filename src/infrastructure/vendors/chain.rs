//! # Fallback Chain
//!
//! A vendor client that tries a primary source, then a secondary one.
//!
//! Marketplaces often expose more than one way to read an offer (a search
//! API and a product-page endpoint, for example). The chain keeps them
//! behind a single canonical [`VendorClient`] for the vendor, so the
//! coordinator still sees exactly one client per vendor.
//!
//! Resolution:
//! - first `Ok(Some(listing))` wins
//! - a clean miss from either source means the vendor had nothing
//! - only when every source failed is the last error returned

use crate::domain::entities::Listing;
use crate::domain::value_objects::{NormalizedQuery, VendorId};
use crate::infrastructure::vendors::error::{VendorError, VendorResult};
use crate::infrastructure::vendors::traits::VendorClient;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Primary/secondary vendor client.
#[derive(Debug, Clone)]
pub struct FallbackChain {
    vendor_id: VendorId,
    primary: Arc<dyn VendorClient>,
    secondary: Arc<dyn VendorClient>,
}

impl FallbackChain {
    /// Creates a chain reporting under the primary client's vendor id.
    #[must_use]
    pub fn new(primary: Arc<dyn VendorClient>, secondary: Arc<dyn VendorClient>) -> Self {
        Self {
            vendor_id: primary.vendor_id().clone(),
            primary,
            secondary,
        }
    }

    /// Returns the primary client.
    #[inline]
    #[must_use]
    pub fn primary(&self) -> &Arc<dyn VendorClient> {
        &self.primary
    }

    /// Returns the secondary client.
    #[inline]
    #[must_use]
    pub fn secondary(&self) -> &Arc<dyn VendorClient> {
        &self.secondary
    }
}

#[async_trait]
impl VendorClient for FallbackChain {
    fn vendor_id(&self) -> &VendorId {
        &self.vendor_id
    }

    fn timeout_ms(&self) -> Option<u64> {
        match (self.primary.timeout_ms(), self.secondary.timeout_ms()) {
            (Some(a), Some(b)) => Some(a.saturating_add(b)),
            _ => None,
        }
    }

    async fn fetch(&self, query: &NormalizedQuery) -> VendorResult<Option<Listing>> {
        let mut last_error: Option<VendorError> = None;
        let mut missed = false;

        for (stage, client) in [("primary", &self.primary), ("secondary", &self.secondary)] {
            match client.fetch(query).await {
                Ok(Some(listing)) => return Ok(Some(listing)),
                Ok(None) => {
                    debug!(vendor = %self.vendor_id, stage, "no listing");
                    missed = true;
                }
                Err(e) => {
                    debug!(vendor = %self.vendor_id, stage, error = %e, "source failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if !missed => Err(e),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Price;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Scripted {
        id: VendorId,
        outcome: fn() -> VendorResult<Option<Listing>>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(outcome: fn() -> VendorResult<Option<Listing>>) -> Arc<Self> {
            Arc::new(Self {
                id: VendorId::new("flipkart"),
                outcome,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl VendorClient for Scripted {
        fn vendor_id(&self) -> &VendorId {
            &self.id
        }

        async fn fetch(&self, _query: &NormalizedQuery) -> VendorResult<Option<Listing>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    fn listed() -> VendorResult<Option<Listing>> {
        Ok(Some(
            Listing::builder(VendorId::new("flipkart"), "https://f.test/p", "Phone")
                .price(Price::new(100.0).unwrap())
                .build(),
        ))
    }

    fn empty() -> VendorResult<Option<Listing>> {
        Ok(None)
    }

    fn broken() -> VendorResult<Option<Listing>> {
        Err(VendorError::connection("reset"))
    }

    fn query() -> NormalizedQuery {
        NormalizedQuery::parse("pixel 8").unwrap()
    }

    #[tokio::test]
    async fn primary_hit_skips_secondary() {
        let primary = Scripted::new(listed);
        let secondary = Scripted::new(broken);
        let chain = FallbackChain::new(primary.clone(), secondary.clone());

        assert!(chain.fetch(&query()).await.unwrap().is_some());
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn primary_failure_uses_secondary() {
        let chain = FallbackChain::new(Scripted::new(broken), Scripted::new(listed));
        assert!(chain.fetch(&query()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn miss_and_failure_is_miss() {
        let chain = FallbackChain::new(Scripted::new(empty), Scripted::new(broken));
        assert!(chain.fetch(&query()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn both_failing_returns_last_error() {
        let chain = FallbackChain::new(Scripted::new(broken), Scripted::new(broken));
        let err = chain.fetch(&query()).await.unwrap_err();
        assert!(matches!(err, VendorError::Connection { .. }));
    }

    #[test]
    fn reports_primary_vendor() {
        let chain = FallbackChain::new(Scripted::new(empty), Scripted::new(empty));
        assert_eq!(chain.vendor_id().as_str(), "flipkart");
        assert_eq!(chain.timeout_ms(), None);
    }
}
