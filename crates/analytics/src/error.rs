//! Analytics error types

use thiserror::Error;

use crate::charts::ChartType;

/// Analytics errors
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Metric expression does not match a known shape
    #[error("invalid metric format: {0}")]
    InvalidMetricFormat(String),

    /// Operation outside sum, avg and count (or not applicable to the field)
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// No algorithm registered for the chart type
    #[error("unsupported chart type: {0}")]
    UnsupportedChartType(String),

    /// A chart-specific required parameter was absent
    #[error("{field} is required for {chart} charts")]
    MissingRequiredParameter {
        field: &'static str,
        chart: ChartType,
    },

    /// Invalid date range
    #[error("invalid time range: {0}")]
    InvalidTimeRange(String),

    /// Parameter present but out of range or malformed
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Backend error (from tally-query)
    #[error("backend error: {0}")]
    Backend(#[from] tally_query::QueryError),
}

/// Result type for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;
