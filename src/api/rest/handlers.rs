//! # REST Handlers
//!
//! Request handlers, shared state and response bodies.

use crate::application::error::ApplicationError;
use crate::application::services::{AggregationService, TrackingService};
use crate::domain::entities::{AggregationResult, SearchRecord, Snapshot, TrackedProduct};
use crate::domain::value_objects::Timestamp;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

/// Default number of rows for history endpoints.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Upper bound on rows for history endpoints.
pub const MAX_HISTORY_LIMIT: usize = 200;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The aggregation pipeline.
    pub service: AggregationService,
    /// The tracked product list.
    pub tracking: TrackingService,
}

impl AppState {
    /// Wraps the services.
    #[must_use]
    pub fn new(service: AggregationService, tracking: TrackingService) -> Self {
        Self { service, tracking }
    }
}

/// `?query=` parameter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    /// Raw search text.
    pub query: Option<String>,
}

/// `?query=&limit=` parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryParams {
    /// Raw search text.
    pub query: Option<String>,
    /// Maximum rows.
    pub limit: Option<usize>,
}

impl HistoryParams {
    fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT)
    }
}

/// `POST /api/tracked` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequest {
    /// Product to watch.
    pub product_name: String,
    /// Store the price was seen at.
    #[serde(default)]
    pub store: String,
    /// Price at tracking time.
    pub current_price: Option<f64>,
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error kind.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// When the error was produced.
    pub timestamp: Timestamp,
}

impl ErrorResponse {
    /// Creates an error body stamped now.
    #[must_use]
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Timestamp::now(),
        }
    }
}

/// Health body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests.
    pub status: String,
    /// Configured vendors.
    pub vendors: usize,
    /// Tasks currently admitted to the worker pool.
    pub in_flight: usize,
}

/// Application error mapped onto HTTP.
#[derive(Debug)]
pub struct ApiError(ApplicationError);

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self.0 {
            ApplicationError::InvalidQuery(_) => (StatusCode::BAD_REQUEST, "InvalidQuery"),
            ApplicationError::Domain(_) => (StatusCode::BAD_REQUEST, "InvalidRequest"),
            e if e.is_retryable() => (StatusCode::SERVICE_UNAVAILABLE, "Unavailable"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "InternalError"),
        };
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        } else {
            debug!(error = %self.0, "request rejected");
        }
        (status, Json(ErrorResponse::new(kind, self.0.to_string()))).into_response()
    }
}

/// `GET /api/smartphones?query=...`
///
/// # Errors
///
/// 400 for a blank or missing query.
pub async fn search_smartphones(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<AggregationResult>, ApiError> {
    let raw = params.query.unwrap_or_default();
    let result = state.service.fetch_pricing(&raw).await?;
    Ok(Json(result))
}

/// `GET /api/smartphones/history?query=...&limit=...`
///
/// # Errors
///
/// 400 for a blank query, 5xx when the store cannot be read.
pub async fn price_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<Snapshot>>, ApiError> {
    let limit = params.limit();
    let raw = params.query.unwrap_or_default();
    let snapshots = state.service.price_history(&raw, limit).await?;
    Ok(Json(snapshots))
}

/// `GET /api/searches?limit=...`
///
/// # Errors
///
/// 5xx when the history log cannot be read.
pub async fn recent_searches(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<SearchRecord>>, ApiError> {
    let records = state.service.recent_searches(params.limit()).await?;
    Ok(Json(records))
}

/// `POST /api/tracked`
///
/// # Errors
///
/// 400 for a blank product name or an invalid price, 5xx when the store
/// cannot be written.
pub async fn track_product(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TrackRequest>,
) -> Result<(StatusCode, Json<TrackedProduct>), ApiError> {
    let product = state
        .tracking
        .track(&request.product_name, &request.store, request.current_price)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /api/tracked`
///
/// # Errors
///
/// 5xx when the store cannot be read.
pub async fn tracked_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TrackedProduct>>, ApiError> {
    Ok(Json(state.tracking.tracked_products().await?))
}

/// `GET /api/health`
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        vendors: state.service.vendor_count(),
        in_flight: state.service.pool().in_flight(),
    })
}
