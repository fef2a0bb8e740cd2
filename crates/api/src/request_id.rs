//! Request ID middleware
//!
//! Tags every request with an ID, runs the handler inside a span carrying
//! that ID, and logs the response status.
//!
//! An incoming `x-request-id` header is reused when it looks sane, otherwise
//! a fresh UUID is generated. The ID is echoed back on the response and made
//! available to handlers as a [`RequestId`] extension.

use std::time::Instant;

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, error, info, warn};
use uuid::Uuid;

/// Header carrying the request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest client-supplied ID we accept
const MAX_REQUEST_ID_LEN: usize = 128;

/// Request ID, stored in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Pick the client's ID if usable, else generate one
fn resolve_request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Request ID middleware
///
/// Apply with `axum::middleware::from_fn(request_id_layer)`.
pub async fn request_id_layer(mut request: Request<Body>, next: Next) -> Response {
    let request_id = resolve_request_id(&request);
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    request.extensions_mut().insert(RequestId(request_id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    async move {
        let started = Instant::now();
        let mut response = next.run(request).await;

        let status = response.status();
        let elapsed_ms = started.elapsed().as_millis() as u64;
        if status.is_server_error() {
            error!(status = status.as_u16(), elapsed_ms, "request failed");
        } else if status.is_client_error() {
            warn!(status = status.as_u16(), elapsed_ms, "request rejected");
        } else {
            info!(status = status.as_u16(), elapsed_ms, "request completed");
        }

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }
        response
    }
    .instrument(span)
    .await
}
