//! Chart payloads
//!
//! Field names (`label`, `value`, `labels`, `datasets`, `data`) are what
//! chart-rendering clients consume.

use serde::{Deserialize, Serialize};

/// One slice of a pie chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
}

impl PieSlice {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// One named series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
}

/// Labeled multi-series payload (bar, line, area)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesResponse {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl SeriesResponse {
    /// No labels and no datasets
    pub fn empty() -> Self {
        Self::default()
    }

    /// A single dataset over `labels`
    pub fn single(labels: Vec<String>, label: impl Into<String>, data: Vec<f64>) -> Self {
        Self {
            labels,
            datasets: vec![Dataset {
                label: label.into(),
                data,
            }],
        }
    }
}

/// Response of any chart type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartData {
    /// Flat label/value list
    Pie(Vec<PieSlice>),
    /// Labeled series
    Series(SeriesResponse),
}

impl ChartData {
    pub fn as_pie(&self) -> Option<&[PieSlice]> {
        match self {
            Self::Pie(slices) => Some(slices),
            Self::Series(_) => None,
        }
    }

    pub fn as_series(&self) -> Option<&SeriesResponse> {
        match self {
            Self::Series(series) => Some(series),
            Self::Pie(_) => None,
        }
    }
}
