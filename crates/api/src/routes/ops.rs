//! Operations routes
//!
//! Health check and service index. These routes take no parameters.

use axum::http::StatusCode;
use axum::{Json, Router, extract::State, routing::get};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use tally_analytics::ChartType;

use crate::state::AppState;

// =============================================================================
// Response Types
// =============================================================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` or `error`
    pub status: &'static str,
    /// RFC 3339 timestamp of the check
    pub timestamp: String,
    /// Server uptime in seconds
    pub uptime_secs: u64,
    /// Database connectivity
    pub database: DatabaseHealth,
}

/// Database part of the health response
#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    /// `connected` or `disconnected`
    pub status: &'static str,
    /// Backend name
    pub backend: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Service index response
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<EndpointInfo>,
    pub examples: Vec<String>,
}

/// One endpoint in the service index
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

// =============================================================================
// Routes
// =============================================================================

/// Operations routes (health, index)
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
///
/// GET /health
///
/// Probes the sales backend. Returns 503 if the probe fails.
async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let probe = state.backend.health_check().await;

    let (status, database) = match probe {
        Ok(()) => (
            StatusCode::OK,
            DatabaseHealth {
                status: "connected",
                backend: state.backend.name(),
                error: None,
            },
        ),
        Err(e) => {
            tracing::error!(backend = state.backend.name(), error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                DatabaseHealth {
                    status: "disconnected",
                    backend: state.backend.name(),
                    error: Some(e.to_string()),
                },
            )
        }
    };

    let body = HealthResponse {
        status: if status.is_success() { "ok" } else { "error" },
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime_secs: state.uptime_secs(),
        database,
    };

    (status, Json(body))
}

/// Service index
///
/// GET /
async fn index_handler() -> Json<IndexResponse> {
    let examples = ChartType::ALL
        .iter()
        .map(|chart| {
            let extra = match chart {
                ChartType::Pie | ChartType::Bar => "&dimension=category&limit=5",
                ChartType::Line => "&groupBy=week",
                ChartType::Area => "&groupBy=month&splitBy=region",
            };
            format!("/charts/{}?startDate=2024-01-01&endDate=2024-06-30{}", chart, extra)
        })
        .collect();

    Json(IndexResponse {
        name: "tally",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec![
            EndpointInfo {
                method: "GET",
                path: "/charts/{type}",
                description: "Render a pie, bar, line or area chart over sales",
            },
            EndpointInfo {
                method: "GET",
                path: "/health",
                description: "Service and database health",
            },
            EndpointInfo {
                method: "GET",
                path: "/",
                description: "This index",
            },
        ],
        examples,
    })
}
