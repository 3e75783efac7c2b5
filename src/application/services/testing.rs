//! Scripted collaborators shared by the service tests.

#![allow(clippy::unwrap_used, clippy::panic)]

use crate::domain::entities::Listing;
use crate::domain::value_objects::{NormalizedQuery, Price, VendorId};
use crate::infrastructure::vendors::error::{VendorError, VendorResult};
use crate::infrastructure::vendors::traits::VendorClient;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// What a scripted vendor does on every fetch.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Script {
    Price(f64),
    PriceAfter(f64, Duration),
    Nothing,
    Fail,
    Hang,
    Panic,
}

#[derive(Debug)]
pub(crate) struct ScriptedVendor {
    id: VendorId,
    script: Script,
    timeout_ms: Option<u64>,
    calls: AtomicUsize,
}

impl ScriptedVendor {
    pub(crate) fn new(id: &str, script: Script) -> Arc<Self> {
        Arc::new(Self {
            id: VendorId::new(id),
            script,
            timeout_ms: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn with_timeout(id: &str, script: Script, timeout_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            id: VendorId::new(id),
            script,
            timeout_ms: Some(timeout_ms),
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn listing(&self, price: f64) -> Listing {
        Listing::builder(
            self.id.clone(),
            format!("https://{}.test/p", self.id),
            format!("Phone at {}", self.id),
        )
        .price(Price::new(price).unwrap())
        .build()
    }
}

#[async_trait]
impl VendorClient for ScriptedVendor {
    fn vendor_id(&self) -> &VendorId {
        &self.id
    }

    fn timeout_ms(&self) -> Option<u64> {
        self.timeout_ms
    }

    async fn fetch(&self, _query: &NormalizedQuery) -> VendorResult<Option<Listing>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script {
            Script::Price(p) => Ok(Some(self.listing(p))),
            Script::PriceAfter(p, delay) => {
                tokio::time::sleep(delay).await;
                Ok(Some(self.listing(p)))
            }
            Script::Nothing => Ok(None),
            Script::Fail => Err(VendorError::connection("connection reset")),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(None)
            }
            Script::Panic => panic!("scripted vendor panic"),
        }
    }
}

/// Upcasts scripted vendors for the coordinator.
pub(crate) fn clients(vendors: &[Arc<ScriptedVendor>]) -> Vec<Arc<dyn VendorClient>> {
    vendors
        .iter()
        .map(|v| Arc::clone(v) as Arc<dyn VendorClient>)
        .collect()
}
