//! Dimension aggregation
//!
//! Groups sales by one categorical dimension, ranks the groups by metric
//! value and keeps the top `limit`.

use tally_query::{Dimension, SalesBackend};
use tracing::debug;

use crate::error::Result;
use crate::query::{ChartQuery, SortOrder};
use crate::response::PieSlice;

/// Aggregate the query's metric per value of `dimension`
///
/// Slices are sorted by value in `query.order` with a stable sort, so equal
/// values keep the order the backend returned them in. The limit is applied
/// after sorting.
pub async fn aggregate_by_dimension(
    backend: &dyn SalesBackend,
    query: &ChartQuery,
    dimension: Dimension,
) -> Result<Vec<PieSlice>> {
    let metric = query.metric_spec()?;
    let aggregation = metric.aggregation()?;
    let window = query.window()?;

    let rows = backend
        .aggregate_by_dimension(&window, dimension, &aggregation)
        .await?;

    let mut slices: Vec<PieSlice> = rows
        .iter()
        .map(|row| PieSlice::new(row.value.clone(), metric.extract(&row.aggregate)))
        .collect();

    sort_slices(&mut slices, query.order);

    if let Some(limit) = query.limit {
        slices.truncate(limit as usize);
    }

    debug!(
        dimension = %dimension,
        metric = %metric,
        groups = rows.len(),
        returned = slices.len(),
        "dimension aggregated"
    );

    Ok(slices)
}

fn sort_slices(slices: &mut [PieSlice], order: SortOrder) {
    match order {
        SortOrder::Asc => slices.sort_by(|a, b| a.value.total_cmp(&b.value)),
        SortOrder::Desc => slices.sort_by(|a, b| b.value.total_cmp(&a.value)),
    }
}
