//! # HTTP Client Utilities
//!
//! Shared HTTP client wrapper for vendor adapters and enrichment sources.
//!
//! Provides:
//! - Configurable request timeouts
//! - JSON deserialization
//! - Mapping of transport and status failures to [`VendorError`]
//!
//! # Examples
//!
//! ```ignore
//! use pricehawk::infrastructure::vendors::http_client::HttpClient;
//!
//! let client = HttpClient::new(5000)?;
//! let response: SearchResponse = client
//!     .get_with_params("https://offers.example/search", &[("q", "iphone 15")])
//!     .await?;
//! ```

use crate::infrastructure::vendors::error::{VendorError, VendorResult};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// User agent sent with every vendor request.
pub const DEFAULT_USER_AGENT: &str = concat!("pricehawk/", env!("CARGO_PKG_VERSION"));

/// HTTP client wrapper for vendor adapters.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client.
    client: Client,
    /// Request timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified timeout.
    ///
    /// # Errors
    ///
    /// Returns `VendorError::InternalError` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> VendorResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        Self::with_headers(timeout_ms, headers)
    }

    /// Creates a new HTTP client with custom default headers.
    ///
    /// # Errors
    ///
    /// Returns `VendorError::InternalError` if the client cannot be created.
    pub fn with_headers(timeout_ms: u64, default_headers: HeaderMap) -> VendorResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .default_headers(default_headers)
            .build()
            .map_err(|e| {
                VendorError::internal_error(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a GET request and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `VendorError::Connection` or `VendorError::Timeout` if the
    /// request fails, and `VendorError::ProtocolError` if the body cannot be
    /// parsed.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> VendorResult<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Makes a GET request with query parameters and deserializes the JSON
    /// response.
    ///
    /// # Errors
    ///
    /// Same as [`HttpClient::get`].
    pub async fn get_with_params<T: DeserializeOwned, P: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        params: &P,
    ) -> VendorResult<T> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Handles the HTTP response, checking status and deserializing JSON.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> VendorResult<T> {
        let status = response.status();

        if status.is_success() {
            response.json::<T>().await.map_err(|e| {
                VendorError::protocol_error(format!("Failed to parse response: {}", e))
            })
        } else {
            let retry_after_ms = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(|secs| secs.saturating_mul(1000));
            let error_body = response.text().await.unwrap_or_default();
            Err(self.map_status_error(status, &error_body, retry_after_ms))
        }
    }

    /// Maps a reqwest error to a VendorError.
    fn map_reqwest_error(&self, error: reqwest::Error) -> VendorError {
        if error.is_timeout() {
            VendorError::timeout_with_duration("Request timed out", self.timeout_ms)
        } else if error.is_connect() {
            VendorError::connection(format!("Connection failed: {}", error))
        } else if error.is_decode() {
            VendorError::protocol_error(format!("Failed to decode body: {}", error))
        } else {
            VendorError::connection(format!("HTTP request failed: {}", error))
        }
    }

    /// Maps an HTTP status code to a VendorError.
    fn map_status_error(
        &self,
        status: StatusCode,
        body: &str,
        retry_after_ms: Option<u64>,
    ) -> VendorError {
        match status {
            StatusCode::BAD_REQUEST => {
                VendorError::invalid_request(format!("Bad request: {}", body))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                VendorError::rejected(format!("Request rejected ({}): {}", status, body))
            }
            StatusCode::TOO_MANY_REQUESTS => match retry_after_ms {
                Some(ms) => VendorError::rate_limited_with_retry("Rate limit exceeded", ms),
                None => VendorError::rate_limited("Rate limit exceeded"),
            },
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                VendorError::timeout(format!("Upstream timeout ({})", status))
            }
            StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE => {
                VendorError::connection(format!("Server error ({}): {}", status, body))
            }
            _ => VendorError::protocol_error(format!("HTTP error ({}): {}", status, body)),
        }
    }
}
