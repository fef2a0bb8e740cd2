//! Aggregation descriptors and grouped result rows
//!
//! An [`Aggregation`] tells a backend what to compute per group. Backends
//! answer with [`AggregateValues`], keyed the way the aggregation asked for
//! them, so callers can pull the number back out without knowing which
//! backend produced it.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::error::{QueryError, Result};

/// What to compute for each group of sales
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Aggregation {
    /// Sum of a numeric field
    Sum { field: String },
    /// Mean of a numeric field
    Avg { field: String },
    /// Number of rows in the group
    CountAll,
    /// Number of non-null occurrences of a field in the group
    CountField { field: String },
}

impl Aggregation {
    /// Sum of `field`
    pub fn sum(field: impl Into<String>) -> Self {
        Self::Sum {
            field: field.into(),
        }
    }

    /// Mean of `field`
    pub fn avg(field: impl Into<String>) -> Self {
        Self::Avg {
            field: field.into(),
        }
    }

    /// Non-null count of `field`
    pub fn count_field(field: impl Into<String>) -> Self {
        Self::CountField {
            field: field.into(),
        }
    }

    /// Field this aggregation reads, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Sum { field } | Self::Avg { field } | Self::CountField { field } => {
                Some(field)
            }
            Self::CountAll => None,
        }
    }
}

/// Raw aggregate result for one group
///
/// Only the slot the aggregation asked for is populated. A `None` inside the
/// sum/avg maps means the backend computed the aggregate over no non-null
/// values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateValues {
    /// Per-field sums
    pub sum: HashMap<String, Option<f64>>,
    /// Per-field means
    pub avg: HashMap<String, Option<f64>>,
    /// Row count (for `CountAll`)
    pub count: Option<u64>,
    /// Per-field non-null counts
    pub field_counts: HashMap<String, u64>,
}

impl AggregateValues {
    /// Store a computed aggregate in the slot matching `aggregation`
    pub fn from_result(aggregation: &Aggregation, value: Option<f64>) -> Self {
        let mut values = Self::default();
        match aggregation {
            Aggregation::Sum { field } => {
                values.sum.insert(field.clone(), value);
            }
            Aggregation::Avg { field } => {
                values.avg.insert(field.clone(), value);
            }
            Aggregation::CountAll => {
                values.count = Some(value.map(|v| v as u64).unwrap_or(0));
            }
            Aggregation::CountField { field } => {
                values
                    .field_counts
                    .insert(field.clone(), value.map(|v| v as u64).unwrap_or(0));
            }
        }
        values
    }
}

/// One group of a dimension aggregation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionRow {
    /// The dimension value (e.g., "Europe")
    pub value: String,
    /// Aggregate over the group
    pub aggregate: AggregateValues,
}

/// One group of a timestamp aggregation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimestampRow {
    /// Exact timestamp shared by the group
    pub occurred_at: DateTime<Utc>,
    /// Aggregate over the group
    pub aggregate: AggregateValues,
}

/// One group of a timestamp + dimension aggregation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitRow {
    /// Exact timestamp shared by the group
    pub occurred_at: DateTime<Utc>,
    /// Value of the split dimension
    pub split_value: String,
    /// Aggregate over the group
    pub aggregate: AggregateValues,
}

/// Inclusive UTC window that sales are filtered to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Start of the window (inclusive)
    pub start: DateTime<Utc>,
    /// End of the window (inclusive)
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Create a window from two timestamps
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end < start {
            return Err(QueryError::InvalidWindow(
                "end must not be before start".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Window covering whole calendar days, `start` through `end` inclusive
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let last_instant = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
            .ok_or_else(|| QueryError::InvalidWindow("invalid end of day".to_string()))?;
        Self::new(
            start.and_time(NaiveTime::MIN).and_utc(),
            end.and_time(last_instant).and_utc(),
        )
    }

    /// Check if a timestamp falls inside the window
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_result_fills_matching_slot() {
        let values = AggregateValues::from_result(&Aggregation::sum("amount"), Some(12.5));
        assert_eq!(values.sum.get("amount"), Some(&Some(12.5)));
        assert!(values.avg.is_empty());
        assert!(values.count.is_none());

        let values = AggregateValues::from_result(&Aggregation::CountAll, Some(3.0));
        assert_eq!(values.count, Some(3));

        let values = AggregateValues::from_result(&Aggregation::count_field("region"), None);
        assert_eq!(values.field_counts.get("region"), Some(&0));
    }

    #[test]
    fn test_window_from_dates_covers_end_day() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let window = TimeWindow::from_dates(start, end).unwrap();

        let late = Utc.with_ymd_and_hms(2024, 1, 3, 23, 59, 59).unwrap();
        let next_day = Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap();
        assert!(window.contains(late));
        assert!(!window.contains(next_day));
    }

    #[test]
    fn test_window_rejects_reversed_dates() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(TimeWindow::from_dates(start, end).is_err());
    }

    #[test]
    fn test_aggregation_field() {
        assert_eq!(Aggregation::sum("amount").field(), Some("amount"));
        assert_eq!(Aggregation::CountAll.field(), None);
    }
}
