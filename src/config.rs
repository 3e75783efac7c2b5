//! # Configuration
//!
//! Layered settings for the service binary.
//!
//! Sources, later ones winning:
//!
//! 1. Built-in defaults
//! 2. `config/pricehawk.toml` (optional, or the path given to [`Settings::load`])
//! 3. Environment variables prefixed `PRICEHAWK`, nested with `__`
//!    (for example `PRICEHAWK__AGGREGATION__FALLBACK_ENABLED=false`)
//!
//! Settings are validated after deserialisation; an invalid file never
//! reaches the service.

use crate::application::error::{ApplicationError, ApplicationResult, InfrastructureError};
use crate::application::services::{AggregationConfig, WorkerPoolConfig};
use crate::domain::value_objects::VendorId;
use crate::infrastructure::enrichment::{EnrichmentSource, HighlightsEnrichment};
use crate::infrastructure::vendors::{
    FallbackChain, HttpClient, HttpVendorClient, VendorClient, VendorProfile,
};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

/// Default settings file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/pricehawk.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "PRICEHAWK";

/// Default per-vendor HTTP timeout in milliseconds.
pub const DEFAULT_VENDOR_TIMEOUT_MS: u64 = 10_000;

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_vendor_timeout_ms() -> u64 {
    DEFAULT_VENDOR_TIMEOUT_MS
}

fn default_true() -> bool {
    true
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Listen address.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

/// One configured marketplace.
///
/// `search_url_template` and `placeholder_image` may be omitted for the
/// built-in marketplaces (`amazon`, `flipkart`, `croma`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorSettings {
    /// Vendor id.
    pub id: String,
    /// Name shown in fallback titles.
    pub display_name: Option<String>,
    /// JSON offer endpoint.
    pub endpoint: String,
    /// Optional second offer endpoint tried when the first has nothing.
    pub secondary_endpoint: Option<String>,
    /// Search deep-link template containing `{query}`.
    pub search_url_template: Option<String>,
    /// Placeholder image for fallback listings.
    pub placeholder_image: Option<String>,
    /// HTTP timeout.
    #[serde(default = "default_vendor_timeout_ms")]
    pub timeout_ms: u64,
    /// Disabled vendors are neither queried nor offered as fallback links.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl VendorSettings {
    /// Resolves the vendor profile, filling gaps from the built-ins.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` for an invalid id or when a
    /// non-built-in vendor omits its templates.
    pub fn profile(&self) -> ApplicationResult<VendorProfile> {
        let builtin = VendorProfile::builtin_by_id(&self.id);
        let display_name = self
            .display_name
            .clone()
            .or_else(|| builtin.as_ref().map(|p| p.display_name().to_string()))
            .unwrap_or_else(|| self.id.clone());
        let template = self
            .search_url_template
            .clone()
            .or_else(|| builtin.as_ref().map(|p| p.search_url_template().to_string()))
            .ok_or_else(|| {
                ApplicationError::configuration(format!(
                    "vendor '{}' needs search_url_template",
                    self.id
                ))
            })?;
        let image = self
            .placeholder_image
            .clone()
            .or_else(|| builtin.as_ref().map(|p| p.placeholder_image().to_string()))
            .unwrap_or_default();

        VendorProfile::new(&self.id, display_name, template, image)
            .map_err(|e| ApplicationError::configuration(e.to_string()))
    }

    /// Builds the vendor client.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile is invalid or the HTTP client cannot
    /// be built.
    pub fn build_client(&self) -> ApplicationResult<Arc<dyn VendorClient>> {
        let profile = self.profile()?;
        let http = HttpClient::new(self.timeout_ms)
            .map_err(|e| InfrastructureError::network(e.to_string()))?;
        let primary: Arc<dyn VendorClient> = Arc::new(HttpVendorClient::new(
            profile.clone(),
            self.endpoint.clone(),
            http.clone(),
        ));
        match &self.secondary_endpoint {
            Some(secondary) => {
                let secondary: Arc<dyn VendorClient> =
                    Arc::new(HttpVendorClient::new(profile, secondary.clone(), http));
                Ok(Arc::new(FallbackChain::new(primary, secondary)))
            }
            None => Ok(primary),
        }
    }
}

/// Specs enrichment endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentSettings {
    /// Specs endpoint.
    pub endpoint: String,
    /// HTTP timeout.
    #[serde(default = "default_vendor_timeout_ms")]
    pub timeout_ms: u64,
}

/// All service settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pipeline deadlines, freshness and fallback.
    pub aggregation: AggregationConfig,
    /// Worker pool sizing.
    pub worker_pool: WorkerPoolConfig,
    /// Configured marketplaces, in query order.
    pub vendors: Vec<VendorSettings>,
    /// Optional specs enrichment.
    pub enrichment: Option<EnrichmentSettings>,
    /// Postgres URL; in-memory stores are used when absent.
    pub database_url: Option<String>,
    /// HTTP server.
    pub server: ServerSettings,
}

impl Settings {
    /// Loads settings from defaults, a TOML file and the environment.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if a source cannot be read
    /// or the result fails validation.
    pub fn load(path: Option<&str>) -> ApplicationResult<Self> {
        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);
        let config = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ApplicationError::configuration(e.to_string()))?;
        Self::from_config(config)
    }

    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` for malformed or invalid
    /// settings.
    pub fn from_toml(text: &str) -> ApplicationResult<Self> {
        let config = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()
            .map_err(|e| ApplicationError::configuration(e.to_string()))?;
        Self::from_config(config)
    }

    fn from_config(config: Config) -> ApplicationResult<Self> {
        let settings: Self = config
            .try_deserialize()
            .map_err(|e| ApplicationError::configuration(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` for zero or oversized
    /// deadlines and windows, a bad pool sizing, duplicate or reserved vendor ids, or an unparseable bind
    /// address.
    pub fn validate(&self) -> ApplicationResult<()> {
        self.aggregation.validate()?;
        self.worker_pool
            .validate()
            .map_err(|e| ApplicationError::configuration(e.to_string()))?;

        let mut seen = HashSet::new();
        for vendor in &self.vendors {
            let id = VendorId::parse(&vendor.id)
                .map_err(|e| ApplicationError::configuration(e.to_string()))?;
            if !seen.insert(id.clone()) {
                return Err(ApplicationError::configuration(format!(
                    "duplicate vendor id '{id}'"
                )));
            }
            if vendor.timeout_ms == 0 {
                return Err(ApplicationError::configuration(format!(
                    "vendor '{id}' timeout_ms must be positive"
                )));
            }
            if vendor.endpoint.trim().is_empty() {
                return Err(ApplicationError::configuration(format!(
                    "vendor '{id}' endpoint is empty"
                )));
            }
        }

        self.bind_addr()?;
        Ok(())
    }

    /// Parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the address is invalid.
    pub fn bind_addr(&self) -> ApplicationResult<SocketAddr> {
        self.server.bind_addr.parse().map_err(|e| {
            ApplicationError::configuration(format!(
                "server.bind_addr '{}': {e}",
                self.server.bind_addr
            ))
        })
    }

    /// Enabled vendors, in configured order.
    pub fn enabled_vendors(&self) -> impl Iterator<Item = &VendorSettings> {
        self.vendors.iter().filter(|v| v.enabled)
    }

    /// Clients for the enabled vendors.
    ///
    /// # Errors
    ///
    /// Returns the first vendor wiring error.
    pub fn vendor_clients(&self) -> ApplicationResult<Vec<Arc<dyn VendorClient>>> {
        self.enabled_vendors()
            .map(VendorSettings::build_client)
            .collect()
    }

    /// Profiles for the enabled vendors.
    ///
    /// # Errors
    ///
    /// Returns the first profile error.
    pub fn vendor_profiles(&self) -> ApplicationResult<Vec<VendorProfile>> {
        self.enabled_vendors().map(VendorSettings::profile).collect()
    }

    /// Builds the enrichment source, if configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn enrichment_source(&self) -> ApplicationResult<Option<Arc<dyn EnrichmentSource>>> {
        let Some(enrichment) = &self.enrichment else {
            return Ok(None);
        };
        let http = HttpClient::new(enrichment.timeout_ms)
            .map_err(|e| InfrastructureError::network(e.to_string()))?;
        Ok(Some(Arc::new(HighlightsEnrichment::new(
            enrichment.endpoint.clone(),
            http,
        ))))
    }
}
