//! HTTP error mapping
//!
//! Every failure leaves the API as `{"error": CODE, "message": text}` with a
//! status derived from the error kind.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tally_analytics::AnalyticsError;
use tally_query::QueryError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A query parameter is missing or does not parse
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// No route matched
    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),

    /// Chart rendering failed
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

impl ApiError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Status and machine-readable code
    pub fn classify(&self) -> (StatusCode, &'static str) {
        const INVALID: (StatusCode, &str) = (StatusCode::BAD_REQUEST, "VALIDATION_ERROR");

        match self {
            Self::Validation { .. } => INVALID,
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::Analytics(err) => match err {
                AnalyticsError::UnsupportedChartType(_) => {
                    (StatusCode::BAD_REQUEST, "UNSUPPORTED_CHART_TYPE")
                }
                AnalyticsError::Backend(e) if !is_caller_error(e) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "QUERY_ERROR")
                }
                AnalyticsError::InvalidMetricFormat(_)
                | AnalyticsError::UnsupportedOperation(_)
                | AnalyticsError::MissingRequiredParameter { .. }
                | AnalyticsError::InvalidTimeRange(_)
                | AnalyticsError::InvalidParameter(_)
                | AnalyticsError::Backend(_) => INVALID,
            },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.classify().0
    }

    pub fn code(&self) -> &'static str {
        self.classify().1
    }
}

/// A query string that does not deserialize, e.g. a repeated key
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation("query", rejection.body_text())
    }
}

/// Backend errors caused by what the request asked for, not by the store
fn is_caller_error(err: &QueryError) -> bool {
    matches!(
        err,
        QueryError::UnknownField(_) | QueryError::NonNumericField(_) | QueryError::InvalidWindow(_)
    )
}

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(code, status = status.as_u16(), %message, "request failed");
        } else {
            tracing::warn!(code, status = status.as_u16(), %message, "request rejected");
        }

        (status, Json(ErrorResponse { error: code, message })).into_response()
    }
}
