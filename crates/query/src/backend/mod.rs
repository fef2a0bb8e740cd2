//! Sales backend trait and implementations

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::aggregate::{Aggregation, DimensionRow, SplitRow, TimeWindow, TimestampRow};
use crate::error::{QueryError, Result};
use crate::sale::Dimension;

/// Numeric columns of the sales table
pub const NUMERIC_FIELDS: &[&str] = &["amount"];

/// Columns that can be counted
pub const COUNTABLE_FIELDS: &[&str] = &[
    "id",
    "occurred_at",
    "category",
    "product",
    "region",
    "channel",
    "amount",
];

/// Row aggregation capability over the sales table
///
/// Implemented by the SQLite and in-memory backends. Every method filters to
/// the inclusive `window` and groups before aggregating; none of them sort by
/// the aggregate value.
#[async_trait]
pub trait SalesBackend: Send + Sync {
    /// Aggregate per distinct value of `dimension`, ordered by that value
    async fn aggregate_by_dimension(
        &self,
        window: &TimeWindow,
        dimension: Dimension,
        aggregation: &Aggregation,
    ) -> Result<Vec<DimensionRow>>;

    /// Aggregate per distinct timestamp, ascending
    async fn aggregate_by_timestamp(
        &self,
        window: &TimeWindow,
        aggregation: &Aggregation,
    ) -> Result<Vec<TimestampRow>>;

    /// Aggregate per (timestamp, dimension value) pair, ascending by timestamp
    async fn aggregate_by_timestamp_and_dimension(
        &self,
        window: &TimeWindow,
        dimension: Dimension,
        aggregation: &Aggregation,
    ) -> Result<Vec<SplitRow>>;

    /// Check if backend is available
    async fn health_check(&self) -> Result<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Validate the field an aggregation reads against the sales schema
///
/// Returns the column name to aggregate, or `None` for `CountAll`.
pub fn resolve_field(aggregation: &Aggregation) -> Result<Option<&'static str>> {
    match aggregation {
        Aggregation::CountAll => Ok(None),
        Aggregation::CountField { field } => COUNTABLE_FIELDS
            .iter()
            .find(|c| **c == field)
            .copied()
            .map(Some)
            .ok_or_else(|| QueryError::UnknownField(field.clone())),
        Aggregation::Sum { field } | Aggregation::Avg { field } => {
            if let Some(column) = NUMERIC_FIELDS.iter().find(|c| **c == field) {
                Ok(Some(*column))
            } else if COUNTABLE_FIELDS.contains(&field.as_str()) {
                Err(QueryError::NonNumericField(field.clone()))
            } else {
                Err(QueryError::UnknownField(field.clone()))
            }
        }
    }
}
