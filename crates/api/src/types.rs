//! API request types
//!
//! Query parameters arrive as camelCase strings and are parsed here so that
//! every malformed value gets the same JSON error shape.

use chrono::NaiveDate;
use serde::Deserialize;
use tally_analytics::{ChartQuery, GroupBy, SortOrder};
use tally_query::Dimension;

use crate::error::{ApiError, Result};

/// Query parameters for `GET /charts/{type}`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartParams {
    /// First day, `YYYY-MM-DD` (required)
    pub start_date: Option<String>,
    /// Last day, `YYYY-MM-DD` (required)
    pub end_date: Option<String>,
    /// day, week or month
    pub group_by: Option<String>,
    /// category, region, product or channel
    pub dimension: Option<String>,
    /// Metric expression (default `sum(amount)`)
    pub metric: Option<String>,
    /// Result limit, 1-100
    pub limit: Option<String>,
    /// asc or desc (default desc)
    pub order: Option<String>,
    /// Split dimension for area charts
    pub split_by: Option<String>,
}

impl ChartParams {
    /// Convert to an analytics query
    ///
    /// Parses each value; range checks are left to [`ChartQuery::validate`].
    pub fn to_query(&self) -> Result<ChartQuery> {
        let start = parse_date("startDate", self.start_date.as_deref())?;
        let end = parse_date("endDate", self.end_date.as_deref())?;
        let mut query = ChartQuery::new(start, end);

        if let Some(group_by) = non_empty(&self.group_by) {
            query.group_by = Some(
                GroupBy::parse(group_by)
                    .map_err(|_| ApiError::validation("groupBy", "must be one of day, week, month"))?,
            );
        }

        if let Some(dimension) = non_empty(&self.dimension) {
            query.dimension = Some(parse_dimension("dimension", dimension)?);
        }

        if let Some(split_by) = non_empty(&self.split_by) {
            query.split_by = Some(parse_dimension("splitBy", split_by)?);
        }

        if let Some(metric) = non_empty(&self.metric) {
            query.metric = metric.to_string();
        }

        if let Some(limit) = non_empty(&self.limit) {
            query.limit = Some(
                limit
                    .parse()
                    .map_err(|_| ApiError::validation("limit", "must be an integer between 1 and 100"))?,
            );
        }

        if let Some(order) = non_empty(&self.order) {
            query.order = SortOrder::parse(order)
                .map_err(|_| ApiError::validation("order", "must be asc or desc"))?;
        }

        Ok(query)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(field: &str, value: Option<&str>) -> Result<NaiveDate> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation(field, "is required"))?;

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::validation(field, format!("'{}' is not a YYYY-MM-DD date", value)))
}

fn parse_dimension(field: &str, value: &str) -> Result<Dimension> {
    value.parse().map_err(|_| {
        ApiError::validation(field, "must be one of category, region, product, channel")
    })
}
