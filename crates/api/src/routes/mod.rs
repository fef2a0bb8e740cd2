//! API routes
//!
//! Chart endpoints plus operations routes (health, index).

pub mod charts;
pub mod ops;

use axum::http::{Method, Uri};
use axum::{Router, middleware};

use crate::error::ApiError;
use crate::request_id::request_id_layer;
use crate::state::AppState;

/// Build the complete API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Operations routes (health, index)
        .merge(ops::routes())
        // Chart routes
        .merge(charts::routes())
        .fallback(not_found)
        .layer(middleware::from_fn(request_id_layer))
        .with_state(state)
}

/// JSON 404 for unknown routes
async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::NotFound(format!("route {} {}", method, uri.path()))
}
