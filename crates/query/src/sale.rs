//! Sale records and their categorical dimensions

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// A single persisted sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Sale ID (UUID)
    pub id: String,
    /// When the sale happened
    pub occurred_at: DateTime<Utc>,
    /// Product category (e.g., "Electronics")
    pub category: String,
    /// Product name
    pub product: String,
    /// Sales region (e.g., "Europe")
    pub region: String,
    /// Sales channel (e.g., "Online")
    pub channel: String,
    /// Sale amount
    pub amount: f64,
}

impl Sale {
    /// Create a sale with a fresh ID
    pub fn new(
        occurred_at: DateTime<Utc>,
        category: impl Into<String>,
        product: impl Into<String>,
        region: impl Into<String>,
        channel: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            occurred_at,
            category: category.into(),
            product: product.into(),
            region: region.into(),
            channel: channel.into(),
            amount,
        }
    }

    /// Value of a categorical dimension for this sale
    pub fn dimension(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Category => &self.category,
            Dimension::Region => &self.region,
            Dimension::Product => &self.product,
            Dimension::Channel => &self.channel,
        }
    }
}

/// Categorical attribute used to group sales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Category,
    Region,
    Product,
    Channel,
}

impl Dimension {
    /// All dimensions, in column order
    pub const ALL: [Dimension; 4] = [
        Dimension::Category,
        Dimension::Region,
        Dimension::Product,
        Dimension::Channel,
    ];

    /// Column name in the sales table
    pub fn column(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Region => "region",
            Self::Product => "product",
            Self::Channel => "channel",
        }
    }
}

impl FromStr for Dimension {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "category" => Ok(Self::Category),
            "region" => Ok(Self::Region),
            "product" => Ok(Self::Product),
            "channel" => Ok(Self::Channel),
            _ => Err(QueryError::UnknownField(s.to_string())),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}
