//! In-memory backend
//!
//! Holds sales in a vector and groups them the same way the SQLite backend
//! does: dimension groups ordered by value, timestamp groups ascending, split
//! groups ascending by timestamp then value.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::aggregate::{
    AggregateValues, Aggregation, DimensionRow, SplitRow, TimeWindow, TimestampRow,
};
use crate::backend::{SalesBackend, resolve_field};
use crate::error::Result;
use crate::sale::{Dimension, Sale};

/// In-memory sales store
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    sales: Vec<Sale>,
}

impl MemoryBackend {
    /// Create a backend over a fixed set of sales
    pub fn new(sales: Vec<Sale>) -> Self {
        Self { sales }
    }

    /// Create an empty backend
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of stored sales
    pub fn len(&self) -> usize {
        self.sales.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    fn in_window<'a>(&'a self, window: &'a TimeWindow) -> impl Iterator<Item = &'a Sale> + 'a {
        self.sales.iter().filter(|s| window.contains(s.occurred_at))
    }
}

/// Aggregate one group of sales
///
/// Every stored field is non-null, so a field count is the group size.
fn compute(aggregation: &Aggregation, group: &[&Sale]) -> AggregateValues {
    let value = match aggregation {
        Aggregation::Sum { .. } => {
            (!group.is_empty()).then(|| group.iter().map(|s| s.amount).sum::<f64>())
        }
        Aggregation::Avg { .. } => (!group.is_empty())
            .then(|| group.iter().map(|s| s.amount).sum::<f64>() / group.len() as f64),
        Aggregation::CountAll | Aggregation::CountField { .. } => Some(group.len() as f64),
    };

    AggregateValues::from_result(aggregation, value)
}

#[async_trait]
impl SalesBackend for MemoryBackend {
    async fn aggregate_by_dimension(
        &self,
        window: &TimeWindow,
        dimension: Dimension,
        aggregation: &Aggregation,
    ) -> Result<Vec<DimensionRow>> {
        resolve_field(aggregation)?;
        let mut groups: BTreeMap<&str, Vec<&Sale>> = BTreeMap::new();
        for sale in self.in_window(window) {
            groups.entry(sale.dimension(dimension)).or_default().push(sale);
        }

        Ok(groups
            .into_iter()
            .map(|(value, group)| DimensionRow {
                value: value.to_string(),
                aggregate: compute(aggregation, &group),
            })
            .collect())
    }

    async fn aggregate_by_timestamp(
        &self,
        window: &TimeWindow,
        aggregation: &Aggregation,
    ) -> Result<Vec<TimestampRow>> {
        resolve_field(aggregation)?;
        let mut groups: BTreeMap<DateTime<Utc>, Vec<&Sale>> = BTreeMap::new();
        for sale in self.in_window(window) {
            groups.entry(sale.occurred_at).or_default().push(sale);
        }

        Ok(groups
            .into_iter()
            .map(|(occurred_at, group)| TimestampRow {
                occurred_at,
                aggregate: compute(aggregation, &group),
            })
            .collect())
    }

    async fn aggregate_by_timestamp_and_dimension(
        &self,
        window: &TimeWindow,
        dimension: Dimension,
        aggregation: &Aggregation,
    ) -> Result<Vec<SplitRow>> {
        resolve_field(aggregation)?;
        let mut groups: BTreeMap<(DateTime<Utc>, &str), Vec<&Sale>> = BTreeMap::new();
        for sale in self.in_window(window) {
            groups
                .entry((sale.occurred_at, sale.dimension(dimension)))
                .or_default()
                .push(sale);
        }

        Ok(groups
            .into_iter()
            .map(|((occurred_at, split_value), group)| SplitRow {
                occurred_at,
                split_value: split_value.to_string(),
                aggregate: compute(aggregation, &group),
            })
            .collect())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
