//! Chart command - Render a chart without the HTTP server
//!
//! # Usage
//!
//! ```bash
//! tally chart pie --start 2024-01-01 --end 2024-06-30 --dimension category --limit 5
//! tally chart bar --start 2024-01-01 --end 2024-06-30 --dimension region --metric "avg(amount)"
//! tally chart line --start 2024-01-01 --end 2024-03-31 --group-by week
//! tally chart area --start 2024-01-01 --end 2024-12-31 --group-by month --split-by channel
//! ```
//!
//! Output is the same JSON the `/charts/{type}` endpoint returns.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use tally_analytics::{ChartEngine, ChartQuery, ChartType, DEFAULT_METRIC, GroupBy, SortOrder};
use tally_config::Config;
use tally_query::Dimension;

use crate::backend::OpenedBackend;

/// Chart command arguments
#[derive(Args, Debug)]
pub struct ChartArgs {
    /// Chart type (pie, bar, line, area)
    pub chart_type: ChartType,

    /// First day, inclusive
    #[arg(short, long)]
    pub start: NaiveDate,

    /// Last day, inclusive
    #[arg(short, long)]
    pub end: NaiveDate,

    /// Time bucket for line and area charts (day, week, month)
    #[arg(short, long)]
    pub group_by: Option<GroupBy>,

    /// Grouping column for pie and bar charts
    #[arg(short, long)]
    pub dimension: Option<Dimension>,

    /// Metric expression
    #[arg(short, long, default_value = DEFAULT_METRIC)]
    pub metric: String,

    /// Keep the top N groups (pie and bar)
    #[arg(long)]
    pub limit: Option<u32>,

    /// Sort direction (asc, desc)
    #[arg(short, long, default_value_t = SortOrder::Desc)]
    pub order: SortOrder,

    /// Series column for area charts
    #[arg(long)]
    pub split_by: Option<Dimension>,

    /// Pretty-print the JSON
    #[arg(short, long)]
    pub pretty: bool,
}

impl ChartArgs {
    fn to_query(&self) -> ChartQuery {
        ChartQuery {
            start_date: self.start,
            end_date: self.end,
            group_by: self.group_by,
            dimension: self.dimension,
            metric: self.metric.clone(),
            limit: self.limit,
            order: self.order,
            split_by: self.split_by,
        }
    }
}

/// Run the chart command
pub async fn run(config: Config, args: ChartArgs) -> Result<()> {
    let backend = OpenedBackend::open(&config.database).await?;
    let engine = ChartEngine::new(backend.shared());

    let result = engine
        .render(args.chart_type, &args.to_query())
        .await
        .with_context(|| format!("failed to render {} chart", args.chart_type));
    backend.close().await;
    let data = result?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&data)?
    } else {
        serde_json::to_string(&data)?
    };
    println!("{}", output);
    Ok(())
}
