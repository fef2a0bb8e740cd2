//! Metric expressions
//!
//! A metric expression names what to compute per group: `sum(amount)`,
//! `avg(amount)` or `count(*)`. Parsing yields a [`MetricSpec`], which maps
//! onto the backend's [`Aggregation`] descriptor and knows how to pull its
//! number back out of an aggregate row.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tally_query::{AggregateValues, Aggregation};

use crate::error::{AnalyticsError, Result};

/// Field placeholder meaning "every row"
pub const COUNT_ALL_FIELD: &str = "*";

static METRIC_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(sum|avg)\((\w+)\)$").unwrap());

/// Aggregate operation applied to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Sum,
    Avg,
    Count,
}

impl Operation {
    /// Parse an operation token
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "sum" => Ok(Self::Sum),
            "avg" => Ok(Self::Avg),
            "count" => Ok(Self::Count),
            _ => Err(AnalyticsError::UnsupportedOperation(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Avg => "avg",
            Self::Count => "count",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed metric: which field, which operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub field: String,
    pub operation: Operation,
}

impl MetricSpec {
    pub fn new(field: impl Into<String>, operation: Operation) -> Self {
        Self {
            field: field.into(),
            operation,
        }
    }

    /// `count(*)`
    pub fn count_all() -> Self {
        Self::new(COUNT_ALL_FIELD, Operation::Count)
    }

    /// Parse a metric expression
    ///
    /// Accepts `count(*)` and `sum(<field>)` / `avg(<field>)` where the field
    /// is a single word. Anything else is an [`AnalyticsError::InvalidMetricFormat`].
    pub fn parse(expr: &str) -> Result<Self> {
        if expr == "count(*)" {
            return Ok(Self::count_all());
        }

        let captures = METRIC_PATTERN
            .captures(expr)
            .ok_or_else(|| AnalyticsError::InvalidMetricFormat(expr.to_string()))?;

        Ok(Self::new(&captures[2], Operation::parse(&captures[1])?))
    }

    /// Backend descriptor for this metric
    pub fn aggregation(&self) -> Result<Aggregation> {
        to_aggregation(&self.field, self.operation)
    }

    /// Numeric value of this metric in an aggregate row
    pub fn extract(&self, values: &AggregateValues) -> f64 {
        extract_value(values, self.operation, &self.field)
    }
}

impl fmt::Display for MetricSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.operation, self.field)
    }
}

/// Map a field and operation onto the backend's aggregation descriptor
pub fn to_aggregation(field: &str, operation: Operation) -> Result<Aggregation> {
    match (operation, field) {
        (Operation::Count, COUNT_ALL_FIELD) => Ok(Aggregation::CountAll),
        (Operation::Count, field) => Ok(Aggregation::count_field(field)),
        (Operation::Sum | Operation::Avg, COUNT_ALL_FIELD) => Err(
            AnalyticsError::UnsupportedOperation(format!("{}({})", operation, field)),
        ),
        (Operation::Sum, field) => Ok(Aggregation::sum(field)),
        (Operation::Avg, field) => Ok(Aggregation::avg(field)),
    }
}

/// Read the metric value out of an aggregate row
///
/// Absent or null aggregates read as 0.
pub fn extract_value(values: &AggregateValues, operation: Operation, field: &str) -> f64 {
    match operation {
        Operation::Sum => values.sum.get(field).copied().flatten().unwrap_or(0.0),
        Operation::Avg => values.avg.get(field).copied().flatten().unwrap_or(0.0),
        Operation::Count if field == COUNT_ALL_FIELD => values.count.unwrap_or(0) as f64,
        Operation::Count => values.field_counts.get(field).copied().unwrap_or(0) as f64,
    }
}
