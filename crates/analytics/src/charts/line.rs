//! Line chart

use async_trait::async_trait;
use tally_query::SalesBackend;

use crate::bucket::enumerate_buckets;
use crate::charts::{Chart, ChartType, require};
use crate::error::Result;
use crate::query::ChartQuery;
use crate::response::{ChartData, SeriesResponse};
use crate::series::{fill_missing_buckets, group_by_bucket};

/// Metric per time bucket over the whole date range
pub struct LineChart;

#[async_trait]
impl Chart for LineChart {
    async fn render(&self, backend: &dyn SalesBackend, query: &ChartQuery) -> Result<ChartData> {
        let group_by = require(query.group_by, "groupBy", self.chart_type())?;
        let metric = query.metric_spec()?;
        let aggregation = metric.aggregation()?;
        let window = query.window()?;

        let rows = backend.aggregate_by_timestamp(&window, &aggregation).await?;

        let grouped = group_by_bucket(&rows, group_by, metric.operation, &metric.field);
        let buckets = enumerate_buckets(query.start_date, query.end_date, group_by);
        let filled = fill_missing_buckets(&grouped, &buckets, 0.0);

        let (labels, data) = filled.into_iter().map(|b| (b.bucket, b.value)).unzip();
        Ok(ChartData::Series(SeriesResponse::single(labels, "Total", data)))
    }

    fn chart_type(&self) -> ChartType {
        ChartType::Line
    }
}
