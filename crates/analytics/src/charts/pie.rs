//! Pie chart

use async_trait::async_trait;
use tally_query::SalesBackend;

use crate::aggregate::aggregate_by_dimension;
use crate::charts::{Chart, ChartType, require};
use crate::error::Result;
use crate::query::ChartQuery;
use crate::response::ChartData;

/// Metric per dimension value, returned as slices
pub struct PieChart;

#[async_trait]
impl Chart for PieChart {
    async fn render(&self, backend: &dyn SalesBackend, query: &ChartQuery) -> Result<ChartData> {
        let dimension = require(query.dimension, "dimension", self.chart_type())?;
        let slices = aggregate_by_dimension(backend, query, dimension).await?;
        Ok(ChartData::Pie(slices))
    }

    fn chart_type(&self) -> ChartType {
        ChartType::Pie
    }
}
