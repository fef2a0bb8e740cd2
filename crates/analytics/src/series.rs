//! Series reconciliation
//!
//! Turns sparse per-timestamp aggregate rows into gap-free series aligned on a
//! full bucket axis. Rows are folded into buckets (summed, or averaged for
//! `avg` metrics), then every bucket of the axis gets a value, 0 when no row
//! landed in it.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tally_query::{SplitRow, TimestampRow};

use crate::bucket::bucket_key_for;
use crate::metric::{Operation, extract_value};
use crate::query::GroupBy;

/// Value of one bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketValue {
    pub bucket: String,
    pub value: f64,
}

impl BucketValue {
    pub fn new(bucket: impl Into<String>, value: f64) -> Self {
        Self {
            bucket: bucket.into(),
            value,
        }
    }
}

/// Parallel series, one per split value, aligned on `buckets`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SplitSeries {
    /// Shared bucket axis
    pub buckets: Vec<String>,
    /// `(split value, one value per bucket)` in first-seen order
    pub series: Vec<(String, Vec<f64>)>,
}

/// Running sum and count of one bucket
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: u32,
}

impl Accumulator {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn value(&self, operation: Operation) -> f64 {
        match operation {
            Operation::Avg if self.count > 0 => self.sum / f64::from(self.count),
            _ => self.sum,
        }
    }
}

/// Align a sparse series on the full bucket axis
///
/// Emits one value per key of `full`, in order. The first sparse entry for a
/// key wins; keys with no entry get `fill`.
pub fn fill_missing_buckets(sparse: &[BucketValue], full: &[String], fill: f64) -> Vec<BucketValue> {
    let mut lookup: HashMap<&str, f64> = HashMap::with_capacity(sparse.len());
    for entry in sparse {
        lookup.entry(entry.bucket.as_str()).or_insert(entry.value);
    }

    full.iter()
        .map(|key| BucketValue::new(key.clone(), lookup.get(key.as_str()).copied().unwrap_or(fill)))
        .collect()
}

/// Fold timestamp rows into buckets, in first-seen bucket order
pub fn group_by_bucket(
    rows: &[TimestampRow],
    granularity: GroupBy,
    operation: Operation,
    field: &str,
) -> Vec<BucketValue> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Accumulator> = HashMap::new();

    for row in rows {
        let key = bucket_key_for(row.occurred_at, granularity);
        let value = extract_value(&row.aggregate, operation, field);

        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().add(value);
    }

    order
        .into_iter()
        .map(|key| {
            let value = groups.get(&key).map(|acc| acc.value(operation)).unwrap_or(0.0);
            BucketValue::new(key, value)
        })
        .collect()
}

/// Pivot split rows into one series per split value over `full`
///
/// The set of series is every split value seen anywhere in `rows`, so each
/// series has a point for every bucket even where that value had no rows.
pub fn pivot_split_series(
    rows: &[SplitRow],
    granularity: GroupBy,
    full: &[String],
    operation: Operation,
    field: &str,
) -> SplitSeries {
    let mut split_values: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut cells: HashMap<String, HashMap<&str, Accumulator>> = HashMap::new();

    for row in rows {
        let split = row.split_value.as_str();
        if seen.insert(split) {
            split_values.push(split.to_string());
        }

        let bucket = bucket_key_for(row.occurred_at, granularity);
        let value = extract_value(&row.aggregate, operation, field);
        cells
            .entry(bucket)
            .or_default()
            .entry(split)
            .or_default()
            .add(value);
    }

    let series = split_values
        .into_iter()
        .map(|split| {
            let values = full
                .iter()
                .map(|bucket| {
                    cells
                        .get(bucket.as_str())
                        .and_then(|by_split| by_split.get(split.as_str()))
                        .map(|acc| acc.value(operation))
                        .unwrap_or(0.0)
                })
                .collect();
            (split, values)
        })
        .collect();

    SplitSeries {
        buckets: full.to_vec(),
        series,
    }
}
