//! Area chart

use async_trait::async_trait;
use tally_query::SalesBackend;

use crate::bucket::enumerate_buckets;
use crate::charts::{Chart, ChartType, require};
use crate::error::Result;
use crate::query::ChartQuery;
use crate::response::{ChartData, Dataset, SeriesResponse};
use crate::series::pivot_split_series;

/// One time series per value of the split dimension
pub struct AreaChart;

#[async_trait]
impl Chart for AreaChart {
    async fn render(&self, backend: &dyn SalesBackend, query: &ChartQuery) -> Result<ChartData> {
        let group_by = require(query.group_by, "groupBy", self.chart_type())?;
        let split_by = require(query.split_by, "splitBy", self.chart_type())?;
        let metric = query.metric_spec()?;
        let aggregation = metric.aggregation()?;
        let window = query.window()?;

        let rows = backend
            .aggregate_by_timestamp_and_dimension(&window, split_by, &aggregation)
            .await?;

        // No rows means no series, whatever the range
        if rows.is_empty() {
            return Ok(ChartData::Series(SeriesResponse::empty()));
        }

        let buckets = enumerate_buckets(query.start_date, query.end_date, group_by);
        let pivot = pivot_split_series(&rows, group_by, &buckets, metric.operation, &metric.field);

        Ok(ChartData::Series(SeriesResponse {
            labels: pivot.buckets,
            datasets: pivot
                .series
                .into_iter()
                .map(|(label, data)| Dataset { label, data })
                .collect(),
        }))
    }

    fn chart_type(&self) -> ChartType {
        ChartType::Area
    }
}
