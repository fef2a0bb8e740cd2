//! Sales backend startup
//!
//! Opens the store named by `[database]`: a SQLite file, or an in-memory
//! vector filled with generated sales.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tally_config::{DatabaseBackend, DatabaseConfig};
use tally_query::{MemoryBackend, SalesBackend, SeedOptions, SqliteBackend, generate_sales};
use tracing::info;

/// An opened sales store
pub enum OpenedBackend {
    Sqlite(Arc<SqliteBackend>),
    Memory(Arc<MemoryBackend>),
}

impl OpenedBackend {
    /// Open the configured backend
    pub async fn open(config: &DatabaseConfig) -> Result<Self> {
        match config.backend {
            DatabaseBackend::Sqlite => {
                let path = config.db_path();
                let backend = SqliteBackend::open_with_pool_size(&path, config.max_connections)
                    .await
                    .with_context(|| format!("failed to open sales database at {}", path.display()))?;
                Ok(Self::Sqlite(Arc::new(backend)))
            }
            DatabaseBackend::Memory => {
                let options = SeedOptions::last_year(config.memory_seed_count, Utc::now());
                let sales = generate_sales(&mut rand::rng(), &options);
                info!(sales = sales.len(), "in-memory sales generated");
                Ok(Self::Memory(Arc::new(MemoryBackend::new(sales))))
            }
        }
    }

    /// Shared handle for the chart engine
    pub fn shared(&self) -> Arc<dyn SalesBackend> {
        match self {
            Self::Sqlite(backend) => backend.clone(),
            Self::Memory(backend) => backend.clone(),
        }
    }

    /// Release pooled connections
    pub async fn close(&self) {
        if let Self::Sqlite(backend) = self {
            backend.close().await;
        }
    }
}
