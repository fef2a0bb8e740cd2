//! SQLite backend for persisted sales
//!
//! Stores sales in a single `sales` table and pushes grouping down into SQL.
//!
//! # Schema
//!
//! ```text
//! sales
//! ├── id           TEXT PRIMARY KEY
//! ├── occurred_at  INTEGER  (milliseconds since epoch, UTC)
//! ├── category     TEXT
//! ├── product      TEXT
//! ├── region       TEXT
//! ├── channel      TEXT
//! └── amount       REAL
//! ```

use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use tracing::{debug, info};

use crate::aggregate::{
    AggregateValues, Aggregation, DimensionRow, SplitRow, TimeWindow, TimestampRow,
};
use crate::backend::{SalesBackend, resolve_field};
use crate::error::{QueryError, Result};
use crate::sale::{Dimension, Sale};

/// Default connection pool size for file databases
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// SQLite-backed sales store
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    /// Open or create a sales database at the given path
    ///
    /// Creates the database file, parent directories and schema if missing.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_pool_size(path, DEFAULT_MAX_CONNECTIONS).await
    }

    /// Like [`SqliteBackend::open`] with an explicit pool size
    pub async fn open_with_pool_size<P: AsRef<Path>>(path: P, max_connections: u32) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| QueryError::Connection(format!("failed to open database: {}", e)))?;

        let backend = Self { pool };
        backend.init_schema().await?;

        info!(path = %path.display(), max_connections, "sales database opened");
        Ok(backend)
    }

    /// Create an in-memory database
    ///
    /// Uses a single connection, since every SQLite memory connection is its
    /// own database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| QueryError::Connection(format!("failed to create memory db: {}", e)))?;

        let backend = Self { pool };
        backend.init_schema().await?;
        Ok(backend)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sales (
                id TEXT PRIMARY KEY,
                occurred_at INTEGER NOT NULL,
                category TEXT NOT NULL,
                product TEXT NOT NULL,
                region TEXT NOT NULL,
                channel TEXT NOT NULL,
                amount REAL NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| QueryError::Execution(format!("failed to create sales table: {}", e)))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_sales_occurred_at ON sales(occurred_at)")
            .execute(&self.pool)
            .await
            .map_err(|e| QueryError::Execution(format!("failed to create index: {}", e)))?;

        Ok(())
    }

    /// Insert sales in a single transaction
    ///
    /// Rows whose ID already exists are skipped. Returns the number inserted.
    pub async fn insert_sales(&self, sales: &[Sale]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for sale in sales {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO sales (id, occurred_at, category, product, region, channel, amount)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&sale.id)
            .bind(sale.occurred_at.timestamp_millis())
            .bind(&sale.category)
            .bind(&sale.product)
            .bind(&sale.region)
            .bind(&sale.channel)
            .bind(sale.amount)
            .execute(&mut *tx)
            .await?;

            inserted += result.rows_affected();
        }

        tx.commit().await?;
        debug!(inserted, "sales inserted");
        Ok(inserted)
    }

    /// Delete every sale. Returns the number removed.
    pub async fn clear(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sales").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Total number of stored sales
    pub async fn count(&self) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM sales")
            .fetch_one(&self.pool)
            .await?;
        let total: i64 = row.try_get("total")?;
        Ok(total.max(0) as u64)
    }

    /// Close the connection pool
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn fetch(&self, sql: &str, window: &TimeWindow) -> Result<Vec<SqliteRow>> {
        let started = Instant::now();
        let rows = sqlx::query(sql)
            .bind(window.start.timestamp_millis())
            .bind(window.end.timestamp_millis())
            .fetch_all(&self.pool)
            .await?;

        debug!(
            rows = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            sql = %sql,
            "aggregate query executed"
        );
        Ok(rows)
    }
}

/// SQL expression computing `aggregation`, always typed as REAL
fn aggregate_expr(aggregation: &Aggregation) -> Result<String> {
    let func = match aggregation {
        Aggregation::Sum { .. } => "SUM",
        Aggregation::Avg { .. } => "AVG",
        Aggregation::CountAll | Aggregation::CountField { .. } => "COUNT",
    };
    let arg = resolve_field(aggregation)?.unwrap_or("*");
    Ok(format!("CAST({}({}) AS REAL)", func, arg))
}

fn read_aggregate(row: &SqliteRow, aggregation: &Aggregation) -> Result<AggregateValues> {
    let value: Option<f64> = row.try_get("agg")?;
    Ok(AggregateValues::from_result(aggregation, value))
}

fn read_timestamp(row: &SqliteRow) -> Result<DateTime<Utc>> {
    let millis: i64 = row.try_get("occurred_at")?;
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| QueryError::Execution(format!("timestamp out of range: {}", millis)))
}

#[async_trait]
impl SalesBackend for SqliteBackend {
    async fn aggregate_by_dimension(
        &self,
        window: &TimeWindow,
        dimension: Dimension,
        aggregation: &Aggregation,
    ) -> Result<Vec<DimensionRow>> {
        let column = dimension.column();
        let sql = format!(
            "SELECT {column} AS value, {agg} AS agg FROM sales \
             WHERE occurred_at >= ? AND occurred_at <= ? \
             GROUP BY {column} ORDER BY {column} ASC",
            column = column,
            agg = aggregate_expr(aggregation)?,
        );

        self.fetch(&sql, window)
            .await?
            .iter()
            .map(|row| {
                Ok(DimensionRow {
                    value: row.try_get("value")?,
                    aggregate: read_aggregate(row, aggregation)?,
                })
            })
            .collect()
    }

    async fn aggregate_by_timestamp(
        &self,
        window: &TimeWindow,
        aggregation: &Aggregation,
    ) -> Result<Vec<TimestampRow>> {
        let sql = format!(
            "SELECT occurred_at, {agg} AS agg FROM sales \
             WHERE occurred_at >= ? AND occurred_at <= ? \
             GROUP BY occurred_at ORDER BY occurred_at ASC",
            agg = aggregate_expr(aggregation)?,
        );

        self.fetch(&sql, window)
            .await?
            .iter()
            .map(|row| {
                Ok(TimestampRow {
                    occurred_at: read_timestamp(row)?,
                    aggregate: read_aggregate(row, aggregation)?,
                })
            })
            .collect()
    }

    async fn aggregate_by_timestamp_and_dimension(
        &self,
        window: &TimeWindow,
        dimension: Dimension,
        aggregation: &Aggregation,
    ) -> Result<Vec<SplitRow>> {
        let column = dimension.column();
        let sql = format!(
            "SELECT occurred_at, {column} AS split_value, {agg} AS agg FROM sales \
             WHERE occurred_at >= ? AND occurred_at <= ? \
             GROUP BY occurred_at, {column} ORDER BY occurred_at ASC, {column} ASC",
            column = column,
            agg = aggregate_expr(aggregation)?,
        );

        self.fetch(&sql, window)
            .await?
            .iter()
            .map(|row| {
                Ok(SplitRow {
                    occurred_at: read_timestamp(row)?,
                    split_value: row.try_get("split_value")?,
                    aggregate: read_aggregate(row, aggregation)?,
                })
            })
            .collect()
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| QueryError::Connection(format!("health check failed: {}", e)))?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
#[path = "sqlite_test.rs"]
mod sqlite_test;
