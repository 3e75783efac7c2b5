//! # REST Routes
//!
//! Router assembly.

use crate::api::rest::handlers::{
    AppState, health_check, price_history, recent_searches, search_smartphones, track_product,
    tracked_products,
};
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Builds the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/smartphones", get(search_smartphones))
        .route("/api/smartphones/history", get(price_history))
        .route("/api/searches", get(recent_searches))
        .route("/api/tracked", get(tracked_products).post(track_product))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::application::services::testing::{Script, ScriptedVendor, clients};
    use crate::application::services::{
        AggregationConfig, AggregationService, TrackingService, WorkerPool, WorkerPoolConfig,
    };
    use crate::infrastructure::persistence::in_memory::{
        InMemoryHistoryLog, InMemorySnapshotStore, InMemoryTrackedProductStore,
    };
    use crate::infrastructure::vendors::VendorProfile;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    const BODY_LIMIT: usize = 1024 * 1024;

    fn router(vendors: &[Arc<ScriptedVendor>]) -> (Router, AggregationService) {
        let pool = WorkerPool::new(WorkerPoolConfig::new(1, 4, 16)).unwrap();
        let service = AggregationService::new(
            &AggregationConfig::default(),
            pool,
            clients(vendors),
            VendorProfile::builtins(),
            Arc::new(InMemorySnapshotStore::new()),
            Arc::new(InMemoryHistoryLog::new()),
        );
        let tracking = TrackingService::new(Arc::new(InMemoryTrackedProductStore::new()));
        let state = Arc::new(AppState::new(service.clone(), tracking));
        (create_router(state), service)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        send(app, request).await
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn search_returns_sorted_listings() {
        let vendors = [
            ScriptedVendor::new("amazon", Script::Price(74999.0)),
            ScriptedVendor::new("croma", Script::Price(73999.0)),
        ];
        let (app, _) = router(&vendors);

        let (status, body) = get_json(app, "/api/smartphones?query=iPhone%2015").await;
        assert_eq!(status, StatusCode::OK);
        let listings = body.as_array().unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0]["vendor"], "croma");
        assert_eq!(listings[0]["price"], 73999.0);
        assert_eq!(listings[1]["vendor"], "amazon");
        assert_eq!(listings[1]["inStock"], true);
    }

    #[tokio::test]
    async fn blank_query_is_bad_request() {
        let vendors = [ScriptedVendor::new("amazon", Script::Price(1.0))];

        for uri in ["/api/smartphones?query=%20%20", "/api/smartphones"] {
            let (app, _) = router(&vendors);
            let (status, body) = get_json(app, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "InvalidQuery");
            assert!(body["message"].as_str().unwrap().contains("blank"));
            assert!(body["timestamp"].is_string());
        }
        assert_eq!(vendors[0].calls(), 0);
    }

    #[tokio::test]
    async fn history_endpoints_report_persisted_searches() {
        let vendors = [ScriptedVendor::new("amazon", Script::Price(74999.0))];
        let (app, service) = router(&vendors);

        let (status, _) = get_json(app.clone(), "/api/smartphones?query=Pixel%208").await;
        assert_eq!(status, StatusCode::OK);
        service.pool().wait_idle().await;

        let (status, body) =
            get_json(app.clone(), "/api/smartphones/history?query=pixel%208&limit=5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = get_json(app, "/api/searches").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["query"], "Pixel 8");
        assert_eq!(body[0]["result_count"], 1);
    }

    #[tokio::test]
    async fn tracked_products_round_trip_over_http() {
        let (app, _) = router(&[]);

        let (status, created) = post_json(
            app.clone(),
            "/api/tracked",
            serde_json::json!({
                "productName": "Galaxy S24",
                "store": "Croma",
                "currentPrice": 64999.0
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["productName"], "Galaxy S24");
        assert_eq!(created["currentPrice"], 64999.0);
        assert!(created["id"].is_string());
        assert!(created["trackedAt"].is_string());

        let (status, body) = get_json(app, "/api/tracked").await;
        assert_eq!(status, StatusCode::OK);
        let products = body.as_array().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["id"], created["id"]);
        assert_eq!(products[0]["store"], "Croma");
    }

    #[tokio::test]
    async fn tracking_a_blank_name_is_bad_request() {
        let (app, _) = router(&[]);

        let (status, body) = post_json(
            app.clone(),
            "/api/tracked",
            serde_json::json!({ "productName": "  ", "store": "Amazon" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "InvalidRequest");

        let (status, body) = post_json(
            app.clone(),
            "/api/tracked",
            serde_json::json!({ "productName": "Pixel 8", "currentPrice": -1.0 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("price"));

        let (_, body) = get_json(app, "/api/tracked").await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn health_reports_vendor_count() {
        let vendors = [
            ScriptedVendor::new("amazon", Script::Nothing),
            ScriptedVendor::new("croma", Script::Nothing),
        ];
        let (app, _) = router(&vendors);

        let (status, body) = get_json(app, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["vendors"], 2);
    }
}
