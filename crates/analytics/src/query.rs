//! Chart query parameters
//!
//! A [`ChartQuery`] describes one chart request: the date range, the metric,
//! and whichever of `group_by`, `dimension` and `split_by` the chart type
//! needs. Which of those are required is decided per chart, not here.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_query::{Dimension, TimeWindow};

use crate::error::{AnalyticsError, Result};
use crate::metric::MetricSpec;

/// Maximum allowed result limit
pub const MAX_LIMIT: u32 = 100;

/// Maximum span between start and end date, in days
pub const MAX_SPAN_DAYS: i64 = 365;

/// Metric used when the request names none
pub const DEFAULT_METRIC: &str = "sum(amount)";

fn default_metric() -> String {
    DEFAULT_METRIC.to_string()
}

/// Time bucket granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    Day,
    Week,
    Month,
}

impl GroupBy {
    /// Parse a granularity token, matched exactly
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(AnalyticsError::InvalidParameter(format!(
                "groupBy must be one of day, week, month (got '{}')",
                s
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl FromStr for GroupBy {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction for dimension charts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(AnalyticsError::InvalidParameter(format!(
                "order must be asc or desc (got '{}')",
                s
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One chart request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartQuery {
    /// First day of the range (inclusive)
    pub start_date: NaiveDate,
    /// Last day of the range (inclusive)
    pub end_date: NaiveDate,
    /// Time bucket granularity (line, area)
    #[serde(default)]
    pub group_by: Option<GroupBy>,
    /// Grouping dimension (pie, bar)
    #[serde(default)]
    pub dimension: Option<Dimension>,
    /// Metric expression, e.g. `sum(amount)`
    #[serde(default = "default_metric")]
    pub metric: String,
    /// Maximum number of results (1-100)
    #[serde(default)]
    pub limit: Option<u32>,
    /// Sort direction by value
    #[serde(default)]
    pub order: SortOrder,
    /// Dimension splitting the series (area)
    #[serde(default)]
    pub split_by: Option<Dimension>,
}

impl ChartQuery {
    /// Create a query over a date range with default metric and order
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            group_by: None,
            dimension: None,
            metric: default_metric(),
            limit: None,
            order: SortOrder::default(),
            split_by: None,
        }
    }

    pub fn with_group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = Some(group_by);
        self
    }

    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimension = Some(dimension);
        self
    }

    pub fn with_metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = metric.into();
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_split_by(mut self, split_by: Dimension) -> Self {
        self.split_by = Some(split_by);
        self
    }

    /// Check the constraints shared by every chart type
    ///
    /// Dates must be ordered and at most [`MAX_SPAN_DAYS`] apart, the limit
    /// must lie in `1..=MAX_LIMIT` and the metric must parse into a backend
    /// aggregation.
    pub fn validate(&self) -> Result<()> {
        if self.start_date > self.end_date {
            return Err(AnalyticsError::InvalidTimeRange(
                "startDate must be on or before endDate".to_string(),
            ));
        }

        let span = (self.end_date - self.start_date).num_days();
        if span > MAX_SPAN_DAYS {
            return Err(AnalyticsError::InvalidTimeRange(format!(
                "date range must not exceed {} days (got {})",
                MAX_SPAN_DAYS, span
            )));
        }

        if let Some(limit) = self.limit
            && !(1..=MAX_LIMIT).contains(&limit)
        {
            return Err(AnalyticsError::InvalidParameter(format!(
                "limit must be between 1 and {} (got {})",
                MAX_LIMIT, limit
            )));
        }

        self.metric_spec()?.aggregation()?;
        Ok(())
    }

    /// Parsed metric expression
    pub fn metric_spec(&self) -> Result<MetricSpec> {
        MetricSpec::parse(&self.metric)
    }

    /// UTC window covering the whole start and end days
    pub fn window(&self) -> Result<TimeWindow> {
        TimeWindow::from_dates(self.start_date, self.end_date)
            .map_err(|e| AnalyticsError::InvalidTimeRange(e.to_string()))
    }
}
