//! Tally API
//!
//! HTTP API serving sales charts.
//!
//! # Overview
//!
//! Built on Axum, this crate turns query strings into
//! [`tally_analytics::ChartQuery`] values, renders them through the
//! [`tally_analytics::ChartEngine`] held in [`AppState`], and maps every
//! failure to a JSON error body.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use tally_api::{build_router, AppState};
//! use tally_query::SqliteBackend;
//!
//! let backend = Arc::new(SqliteBackend::open("sales.db").await?);
//! let app = build_router(AppState::new(backend));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! # Endpoints
//!
//! - `GET /charts/{type}` - Pie, bar, line or area chart
//! - `GET /health` - Service and database health
//! - `GET /` - Service index
//!
//! # Query Parameters
//!
//! - `startDate`, `endDate` - Inclusive `YYYY-MM-DD` range (required)
//! - `groupBy` - Time bucket (day, week, month); line and area charts
//! - `dimension` - Grouping column; pie and bar charts
//! - `metric` - `sum(field)`, `avg(field)` or `count(*)`
//! - `limit`, `order` - Top-N for pie and bar charts
//! - `splitBy` - Series column for area charts

pub mod error;
pub mod request_id;
pub mod routes;
pub mod state;
pub mod types;

// Re-exports
pub use error::{ApiError, ErrorResponse, Result};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_layer};
pub use routes::build_router;
pub use state::AppState;
pub use types::ChartParams;
