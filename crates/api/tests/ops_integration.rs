//! Integration tests for operations endpoints
//!
//! Tests: health, service index, request IDs, unknown routes

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use tally_api::{REQUEST_ID_HEADER, build_router, state::AppState};
use tally_query::{
    Aggregation, Dimension, DimensionRow, MemoryBackend, QueryError, SalesBackend, SplitRow,
    TimeWindow, TimestampRow,
};

/// Backend whose store is unreachable
struct DownBackend;

#[async_trait]
impl SalesBackend for DownBackend {
    async fn aggregate_by_dimension(
        &self,
        _window: &TimeWindow,
        _dimension: Dimension,
        _aggregation: &Aggregation,
    ) -> tally_query::Result<Vec<DimensionRow>> {
        Err(QueryError::Connection("database is down".into()))
    }

    async fn aggregate_by_timestamp(
        &self,
        _window: &TimeWindow,
        _aggregation: &Aggregation,
    ) -> tally_query::Result<Vec<TimestampRow>> {
        Err(QueryError::Connection("database is down".into()))
    }

    async fn aggregate_by_timestamp_and_dimension(
        &self,
        _window: &TimeWindow,
        _dimension: Dimension,
        _aggregation: &Aggregation,
    ) -> tally_query::Result<Vec<SplitRow>> {
        Err(QueryError::Connection("database is down".into()))
    }

    async fn health_check(&self) -> tally_query::Result<()> {
        Err(QueryError::Connection("database is down".into()))
    }

    fn name(&self) -> &'static str {
        "down"
    }
}

fn test_app() -> Router {
    build_router(AppState::new(Arc::new(MemoryBackend::empty())))
}

fn down_app() -> Router {
    build_router(AppState::new(Arc::new(DownBackend)))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(json!({}))
}

#[tokio::test]
async fn test_health_ok() {
    let response = test_app().oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"]["status"], "connected");
    assert_eq!(body["database"]["backend"], "memory");
    assert!(body["uptime_secs"].is_u64());
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_health_database_down() {
    let response = down_app().oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = response_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["database"]["status"], "disconnected");
    assert!(body["database"]["error"].as_str().unwrap().contains("down"));
}

#[tokio::test]
async fn test_backend_failure_is_query_error() {
    let response = down_app()
        .oneshot(get(
            "/charts/line?startDate=2024-01-01&endDate=2024-01-31&groupBy=week",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_json(response).await;
    assert_eq!(body["error"], "QUERY_ERROR");
}

#[tokio::test]
async fn test_index() {
    let response = test_app().oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["name"], "tally");
    assert!(!body["version"].as_str().unwrap().is_empty());
    assert_eq!(body["endpoints"].as_array().unwrap().len(), 3);
    assert_eq!(body["examples"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let response = test_app().oneshot(get("/nope")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"], "NOT_FOUND");
    assert!(body["message"].as_str().unwrap().contains("/nope"));
}

#[tokio::test]
async fn test_request_id_echoed() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header(REQUEST_ID_HEADER, "req-42")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");
}

#[tokio::test]
async fn test_request_id_generated() {
    let app = test_app();

    let first = app.clone().oneshot(get("/")).await.unwrap();
    let second = app.oneshot(get("/nope")).await.unwrap();

    let first_id = first.headers()[REQUEST_ID_HEADER].to_str().unwrap().to_string();
    let second_id = second.headers()[REQUEST_ID_HEADER].to_str().unwrap().to_string();
    assert_eq!(first_id.len(), 36);
    assert_ne!(first_id, second_id);
}
