//! Chart strategies and dispatch
//!
//! Each chart type has one strategy:
//!
//! - **pie**: metric per dimension value, as label/value slices
//! - **bar**: same aggregation, as one "Total" dataset
//! - **line**: metric per time bucket, gap-filled over the date range
//! - **area**: one gap-filled series per split dimension value
//!
//! Strategies check their own required parameters. [`ChartEngine`] owns the
//! backend and dispatches on [`ChartType`].

mod area;
mod bar;
mod line;
mod pie;

pub use area::AreaChart;
pub use bar::BarChart;
pub use line::LineChart;
pub use pie::PieChart;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tally_query::SalesBackend;
use tracing::debug;

use crate::error::{AnalyticsError, Result};
use crate::query::ChartQuery;
use crate::response::ChartData;

/// Supported chart types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Pie,
    Bar,
    Line,
    Area,
}

impl ChartType {
    pub const ALL: [ChartType; 4] = [Self::Pie, Self::Bar, Self::Line, Self::Area];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pie => "pie",
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Area => "area",
        }
    }
}

impl FromStr for ChartType {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pie" => Ok(Self::Pie),
            "bar" => Ok(Self::Bar),
            "line" => Ok(Self::Line),
            "area" => Ok(Self::Area),
            _ => Err(AnalyticsError::UnsupportedChartType(s.to_string())),
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chart algorithm
#[async_trait]
pub trait Chart: Send + Sync {
    /// Build the chart payload for `query`
    async fn render(&self, backend: &dyn SalesBackend, query: &ChartQuery) -> Result<ChartData>;

    /// Chart type this strategy renders, named in missing-parameter errors
    fn chart_type(&self) -> ChartType;
}

/// Unwrap a chart-specific required parameter
pub(crate) fn require<T>(value: Option<T>, field: &'static str, chart: ChartType) -> Result<T> {
    value.ok_or(AnalyticsError::MissingRequiredParameter { field, chart })
}

/// Chart engine dispatching requests to strategies
pub struct ChartEngine {
    backend: Arc<dyn SalesBackend>,
}

impl ChartEngine {
    /// Create a new chart engine over a backend
    pub fn new(backend: Arc<dyn SalesBackend>) -> Self {
        Self { backend }
    }

    /// Validate `query` and render it as `chart_type`
    pub async fn render(&self, chart_type: ChartType, query: &ChartQuery) -> Result<ChartData> {
        query.validate()?;

        let started = Instant::now();
        let backend = self.backend.as_ref();
        let data = match chart_type {
            ChartType::Pie => PieChart.render(backend, query).await?,
            ChartType::Bar => BarChart.render(backend, query).await?,
            ChartType::Line => LineChart.render(backend, query).await?,
            ChartType::Area => AreaChart.render(backend, query).await?,
        };

        debug!(
            chart = %chart_type,
            backend = backend.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "chart rendered"
        );
        Ok(data)
    }
}
