//! # HTTP Vendor Client
//!
//! Generic [`VendorClient`] for marketplaces reachable through a JSON offer
//! search endpoint.
//!
//! The endpoint is called as `GET {endpoint}?q={query}` and must answer with
//! a [`SearchResponse`]. Offers are reported the way storefronts display
//! them (price and rating as text), so the adapter normalizes:
//!
//! - price text (`"₹ 73,999"`) into a [`Price`]
//! - availability text into a stock flag
//! - rating text (`"4.5 out of 5 stars"`) into a [`Rating`]
//! - relative product links into absolute URLs
//! - highlight bullets into an enrichment summary
//!
//! The first offer with a readable price is the best match. An answer with
//! no priced offer is a clean miss (`Ok(None)`), not a failure.

use crate::domain::entities::Listing;
use crate::domain::value_objects::{NormalizedQuery, Price, Rating, VendorId};
use crate::infrastructure::vendors::error::VendorResult;
use crate::infrastructure::vendors::http_client::HttpClient;
use crate::infrastructure::vendors::profile::VendorProfile;
use crate::infrastructure::vendors::specs::summarize_highlights;
use crate::infrastructure::vendors::traits::VendorClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

const OUT_OF_STOCK_MARKERS: &[&str] = &["out of stock", "currently unavailable", "sold out"];

/// Offer search response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Offers in relevance order.
    #[serde(default)]
    pub offers: Vec<OfferItem>,
}

/// One offer as reported by the storefront.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfferItem {
    /// Product title.
    pub title: Option<String>,
    /// Product link, absolute or relative to the vendor origin.
    pub url: Option<String>,
    /// Displayed price text.
    pub price: Option<String>,
    /// Displayed availability text.
    pub availability: Option<String>,
    /// Thumbnail URL.
    pub image: Option<String>,
    /// Displayed rating text.
    pub rating: Option<String>,
    /// Highlight bullets (RAM, storage, camera...).
    #[serde(default)]
    pub highlights: Vec<String>,
}

/// Returns false when availability text reports the item unavailable.
#[must_use]
pub fn availability_in_stock(text: Option<&str>) -> bool {
    match text {
        Some(text) => {
            let lower = text.to_lowercase();
            !OUT_OF_STOCK_MARKERS.iter().any(|m| lower.contains(m))
        }
        None => true,
    }
}

/// JSON offer-endpoint vendor client.
#[derive(Debug, Clone)]
pub struct HttpVendorClient {
    profile: VendorProfile,
    endpoint: String,
    client: HttpClient,
}

impl HttpVendorClient {
    /// Creates a client for a vendor profile and offer endpoint.
    #[must_use]
    pub fn new(profile: VendorProfile, endpoint: impl Into<String>, client: HttpClient) -> Self {
        Self {
            profile,
            endpoint: endpoint.into(),
            client,
        }
    }

    /// Returns the vendor profile.
    #[must_use]
    pub fn profile(&self) -> &VendorProfile {
        &self.profile
    }

    /// Returns the offer endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Converts the first priced offer into a listing.
    fn to_listing(&self, query: &NormalizedQuery, response: SearchResponse) -> Option<Listing> {
        for offer in response.offers {
            let Some(href) = offer.url.as_deref().filter(|u| !u.trim().is_empty()) else {
                debug!(vendor = %self.profile.id(), "offer without link skipped");
                continue;
            };
            let price = match offer.price.as_deref().map(Price::parse_text) {
                Some(Ok(price)) => price,
                Some(Err(e)) => {
                    debug!(vendor = %self.profile.id(), error = %e, "unreadable price skipped");
                    continue;
                }
                None => continue,
            };

            let title = offer
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| query.display().to_string());
            let rating = offer
                .rating
                .as_deref()
                .and_then(|r| Rating::parse_text(r).ok());

            return Some(
                Listing::builder(self.profile.id().clone(), self.profile.absolute_url(href), title)
                    .price(price)
                    .in_stock(availability_in_stock(offer.availability.as_deref()))
                    .maybe_image_url(offer.image)
                    .rating(rating)
                    .enrichment(summarize_highlights(&offer.highlights))
                    .build(),
            );
        }
        None
    }
}

#[async_trait]
impl VendorClient for HttpVendorClient {
    fn vendor_id(&self) -> &VendorId {
        self.profile.id()
    }

    fn timeout_ms(&self) -> Option<u64> {
        Some(self.client.timeout_ms())
    }

    async fn fetch(&self, query: &NormalizedQuery) -> VendorResult<Option<Listing>> {
        let response: SearchResponse = self
            .client
            .get_with_params(&self.endpoint, &[("q", query.display())])
            .await?;
        debug!(
            vendor = %self.profile.id(),
            offers = response.offers.len(),
            "offer search answered"
        );
        Ok(self.to_listing(query, response))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::infrastructure::vendors::error::VendorError;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> HttpVendorClient {
        HttpVendorClient::new(
            VendorProfile::amazon(),
            format!("{}/offers", server.uri()),
            HttpClient::new(2000).unwrap(),
        )
    }

    #[test]
    fn availability_markers() {
        assert!(availability_in_stock(None));
        assert!(availability_in_stock(Some("In stock")));
        assert!(!availability_in_stock(Some("Currently unavailable.")));
        assert!(!availability_in_stock(Some("OUT OF STOCK")));
    }

    #[tokio::test]
    async fn normalizes_first_priced_offer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/offers"))
            .and(query_param("q", "iPhone 15"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "offers": [
                    { "title": "Sponsored", "url": "/dp/AD", "price": "See options" },
                    {
                        "title": "Apple iPhone 15 (128 GB)",
                        "url": "/dp/B0CHX1W1XY",
                        "price": "₹74,999",
                        "availability": "In stock",
                        "rating": "4.5 out of 5 stars",
                        "highlights": ["128 GB ROM", "Free delivery", "A16 Bionic Chip"]
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let query = NormalizedQuery::parse("iPhone 15").unwrap();
        let listing = client.fetch(&query).await.unwrap().expect("listing");

        assert_eq!(listing.vendor().as_str(), "amazon");
        assert_eq!(listing.price(), Some(Price::new(74999.0).unwrap()));
        assert_eq!(listing.url(), "https://www.amazon.in/dp/B0CHX1W1XY");
        assert_eq!(listing.rating().unwrap().get(), 4.5);
        assert_eq!(listing.enrichment(), Some("128 GB ROM · A16 Bionic Chip"));
        assert!(listing.in_stock());
    }

    #[tokio::test]
    async fn no_priced_offer_is_clean_miss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "offers": [] })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let query = NormalizedQuery::parse("nothing").unwrap();
        assert!(client.fetch(&query).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_title_falls_back_to_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "offers": [{ "url": "https://www.amazon.in/dp/X", "price": "999" }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let query = NormalizedQuery::parse("Nokia 105").unwrap();
        let listing = client.fetch(&query).await.unwrap().unwrap();
        assert_eq!(listing.title(), "Nokia 105");
        assert!(listing.enrichment().is_none());
    }

    #[tokio::test]
    async fn server_error_is_vendor_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let query = NormalizedQuery::parse("pixel").unwrap();
        let err = client.fetch(&query).await.unwrap_err();
        assert!(matches!(err, VendorError::Connection { .. }));
    }
}
