//! Bar chart

use async_trait::async_trait;
use tally_query::SalesBackend;

use crate::aggregate::aggregate_by_dimension;
use crate::charts::{Chart, ChartType, require};
use crate::error::Result;
use crate::query::ChartQuery;
use crate::response::{ChartData, SeriesResponse};

/// Metric per dimension value, returned as a single "Total" dataset
pub struct BarChart;

#[async_trait]
impl Chart for BarChart {
    async fn render(&self, backend: &dyn SalesBackend, query: &ChartQuery) -> Result<ChartData> {
        let dimension = require(query.dimension, "dimension", self.chart_type())?;
        let slices = aggregate_by_dimension(backend, query, dimension).await?;

        let (labels, data) = slices.into_iter().map(|s| (s.label, s.value)).unzip();
        Ok(ChartData::Series(SeriesResponse::single(labels, "Total", data)))
    }

    fn chart_type(&self) -> ChartType {
        ChartType::Bar
    }
}
