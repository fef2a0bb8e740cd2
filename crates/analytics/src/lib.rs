//! Tally Analytics Engine
//!
//! Turns a chart request into a chart-ready payload.
//!
//! # Overview
//!
//! This crate is the chart layer for Tally, built on top of `tally-query`.
//! It includes:
//!
//! - **Metrics**: `sum(amount)`, `avg(amount)`, `count(*)` parsing and value extraction
//! - **Buckets**: day, week and month bucket keys and full bucket ranges
//! - **Series**: gap filling and split-series pivoting
//! - **Charts**: pie, bar, line and area strategies behind [`ChartEngine`]
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use tally_analytics::{ChartEngine, ChartQuery, ChartType, GroupBy};
//!
//! let engine = ChartEngine::new(Arc::new(backend));
//!
//! let query = ChartQuery::new(start, end).with_group_by(GroupBy::Week);
//! let line = engine.render(ChartType::Line, &query).await?;
//! ```

pub mod aggregate;
pub mod bucket;
pub mod charts;
pub mod error;
pub mod metric;
pub mod query;
pub mod response;
pub mod series;


// Re-exports for convenience
pub use aggregate::aggregate_by_dimension;
pub use bucket::{bucket_key, bucket_key_for, enumerate_buckets};
pub use charts::{AreaChart, BarChart, Chart, ChartEngine, ChartType, LineChart, PieChart};
pub use error::{AnalyticsError, Result};
pub use metric::{COUNT_ALL_FIELD, MetricSpec, Operation, extract_value, to_aggregation};
pub use query::{ChartQuery, DEFAULT_METRIC, GroupBy, MAX_LIMIT, MAX_SPAN_DAYS, SortOrder};
pub use response::{ChartData, Dataset, PieSlice, SeriesResponse};
pub use series::{
    BucketValue, SplitSeries, fill_missing_buckets, group_by_bucket, pivot_split_series,
};
