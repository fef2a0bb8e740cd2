//! Tally Query - sales storage and row aggregation
//!
//! Provides a unified interface for aggregating sales records across backends:
//! - **SQLite**: Persistent store used by `tally serve` and `tally seed`
//! - **Memory**: In-process store for tests and throwaway demo servers
//!
//! Backends never shape chart payloads. They group rows and hand back the raw
//! aggregate for each group; bucketing and reconciliation live in
//! `tally-analytics`.
//!
//! # Usage
//!
//! ```ignore
//! use tally_query::{Aggregation, Dimension, SalesBackend, SqliteBackend, TimeWindow};
//!
//! let backend = SqliteBackend::open("data/sales.db").await?;
//! let window = TimeWindow::from_dates(start, end)?;
//!
//! let rows = backend
//!     .aggregate_by_dimension(&window, Dimension::Region, &Aggregation::sum("amount"))
//!     .await?;
//! ```

pub mod aggregate;
pub mod backend;
pub mod error;
pub mod sale;
pub mod seed;

// Re-exports
pub use aggregate::{AggregateValues, Aggregation, DimensionRow, SplitRow, TimeWindow, TimestampRow};
pub use backend::SalesBackend;
pub use backend::memory::MemoryBackend;
pub use backend::sqlite::SqliteBackend;
pub use error::{QueryError, Result};
pub use sale::{Dimension, Sale};
pub use seed::{SeedOptions, generate_sales};
