//! # Enrichment Sources
//!
//! Port and HTTP adapter for the specs summary attached to the cheapest
//! listing.
//!
//! Enrichment runs alongside the vendor gather under the same deadline.
//! It is optional: a failure or a late answer just means the result goes
//! out without a summary.

use crate::domain::value_objects::{NormalizedQuery, Rating};
use crate::infrastructure::vendors::error::VendorResult;
use crate::infrastructure::vendors::http_client::HttpClient;
use crate::infrastructure::vendors::specs::{HIGHLIGHT_SEPARATOR, summarize_highlights};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Produces a one-line specs/rating summary for a query.
#[async_trait]
pub trait EnrichmentSource: Send + Sync + fmt::Debug {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Returns a summary, or `None` when nothing useful was found.
    ///
    /// # Errors
    ///
    /// Returns a `VendorError` when the source could not be read.
    async fn enrich(&self, query: &NormalizedQuery) -> VendorResult<Option<String>>;
}

/// Specs endpoint response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecsResponse {
    /// Highlight bullets for the best-matching product.
    #[serde(default)]
    pub highlights: Vec<String>,
    /// Displayed rating text.
    pub rating: Option<String>,
}

/// Builds a summary from a specs response.
///
/// Headline highlights come first, then the rating as `Rated x.y/5`.
#[must_use]
pub fn summarize(response: &SpecsResponse) -> Option<String> {
    let rating = response
        .rating
        .as_deref()
        .and_then(|r| Rating::parse_text(r).ok())
        .map(|r| format!("Rated {:.1}/5", r.get()));

    match (summarize_highlights(&response.highlights), rating) {
        (Some(specs), Some(rating)) => Some(format!("{specs}{HIGHLIGHT_SEPARATOR}{rating}")),
        (Some(specs), None) => Some(specs),
        (None, rating) => rating,
    }
}

/// Enrichment over an HTTP specs endpoint (`GET {endpoint}?q={query}`).
#[derive(Debug, Clone)]
pub struct HighlightsEnrichment {
    endpoint: String,
    client: HttpClient,
}

impl HighlightsEnrichment {
    /// Creates an enrichment source.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, client: HttpClient) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    /// Returns the specs endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EnrichmentSource for HighlightsEnrichment {
    fn name(&self) -> &str {
        "highlights"
    }

    async fn enrich(&self, query: &NormalizedQuery) -> VendorResult<Option<String>> {
        let response: SpecsResponse = self
            .client
            .get_with_params(&self.endpoint, &[("q", query.display())])
            .await?;
        Ok(summarize(&response))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn summary_combines_specs_and_rating() {
        let response = SpecsResponse {
            highlights: vec!["8 GB RAM".into(), "Free delivery".into()],
            rating: Some("4.46 out of 5 stars".into()),
        };
        assert_eq!(summarize(&response).as_deref(), Some("8 GB RAM · Rated 4.5/5"));
    }

    #[test]
    fn summary_with_nothing_is_none() {
        assert!(summarize(&SpecsResponse::default()).is_none());
        let response = SpecsResponse {
            highlights: vec![],
            rating: Some("no reviews".into()),
        };
        assert!(summarize(&response).is_none());
    }

    #[tokio::test]
    async fn fetches_from_specs_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/specs"))
            .and(query_param("q", "Pixel 8"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "highlights": ["6.2 inch Display", "Tensor G3 chip"],
            })))
            .mount(&server)
            .await;

        let source = HighlightsEnrichment::new(
            format!("{}/specs", server.uri()),
            HttpClient::new(2000).unwrap(),
        );
        let query = NormalizedQuery::parse("Pixel 8").unwrap();
        let summary = source.enrich(&query).await.unwrap();
        assert_eq!(summary.as_deref(), Some("6.2 inch Display · Tensor G3 chip"));
        assert_eq!(source.name(), "highlights");
    }
}
