//! # REST API
//!
//! Thin axum surface over the aggregation and tracking services.
//!
//! # Endpoints
//!
//! ## Pricing
//! - `GET /api/smartphones?query=...` - Ordered listings for a query
//! - `GET /api/smartphones/history?query=...&limit=...` - Recent snapshots
//!
//! ## Searches
//! - `GET /api/searches?limit=...` - Recent searches
//!
//! ## Tracking
//! - `POST /api/tracked` - Start tracking a product
//! - `GET /api/tracked` - Tracked products, oldest first
//!
//! ## Health
//! - `GET /api/health` - Health check endpoint
//!
//! A blank query is answered with `400` and a body of the form
//! `{"error": "InvalidQuery", "message": "...", "timestamp": "..."}`.
//!
//! # Usage
//!
//! ```ignore
//! use pricehawk::api::rest::{create_router, AppState};
//! use std::sync::Arc;
//!
//! let router = create_router(Arc::new(AppState::new(service, tracking)));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    ApiError, AppState, ErrorResponse, HealthResponse, HistoryParams, SearchParams, TrackRequest,
};
pub use routes::create_router;
