//! Sales database configuration

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Which sales backend to use
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    /// SQLite file (default)
    #[default]
    Sqlite,
    /// In-process store, seeded at startup and lost on exit
    Memory,
}

/// Sales database configuration
///
/// # Example
///
/// ```toml
/// [database]
/// backend = "sqlite"              # default
/// path = "~/.tally/sales.db"      # default
/// max_connections = 5             # default
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Backend type (sqlite, memory)
    pub backend: DatabaseBackend,

    /// Path to the SQLite database
    /// Default: "~/.tally/sales.db" (expanded at runtime)
    pub path: Option<PathBuf>,

    /// Maximum pooled connections
    pub max_connections: u32,

    /// Sales generated at startup for the memory backend
    pub memory_seed_count: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::Sqlite,
            path: None,
            max_connections: 5,
            memory_seed_count: 5000,
        }
    }
}

impl DatabaseConfig {
    /// Get the database path, expanding ~ to home directory
    pub fn db_path(&self) -> PathBuf {
        if let Some(ref path) = self.path {
            expand_tilde(path)
        } else {
            dirs::home_dir()
                .map(|h| h.join(".tally").join("sales.db"))
                .unwrap_or_else(|| PathBuf::from("./data/sales.db"))
        }
    }

    /// Apply a `DATABASE_URL`-style value
    ///
    /// Accepts `memory`, `sqlite::memory:`, `sqlite://<path>`, `sqlite:<path>`
    /// or a bare path.
    pub fn apply_url(&mut self, url: &str) {
        let url = url.trim();
        if url == "memory" || url == "sqlite::memory:" {
            self.backend = DatabaseBackend::Memory;
            return;
        }

        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);
        self.backend = DatabaseBackend::Sqlite;
        self.path = Some(PathBuf::from(path));
    }
}

/// Expand ~ to home directory
fn expand_tilde(path: &Path) -> PathBuf {
    path.to_str()
        .and_then(|s| s.strip_prefix("~/"))
        .and_then(|stripped| dirs::home_dir().map(|home| home.join(stripped)))
        .unwrap_or_else(|| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DatabaseConfig::default();
        assert_eq!(config.backend, DatabaseBackend::Sqlite);
        assert!(config.path.is_none());
        assert_eq!(config.max_connections, 5);
        assert!(config.db_path().ends_with("sales.db"));
    }

    #[test]
    fn test_custom_path() {
        let config: DatabaseConfig = toml::from_str(r#"path = "/var/lib/tally/sales.db""#).unwrap();
        assert_eq!(config.db_path(), PathBuf::from("/var/lib/tally/sales.db"));
    }

    #[test]
    fn test_memory_backend() {
        let config: DatabaseConfig = toml::from_str(r#"backend = "memory""#).unwrap();
        assert_eq!(config.backend, DatabaseBackend::Memory);
    }

    #[test]
    fn test_apply_url() {
        let mut config = DatabaseConfig::default();

        config.apply_url("sqlite://data/dev.db");
        assert_eq!(config.backend, DatabaseBackend::Sqlite);
        assert_eq!(config.path, Some(PathBuf::from("data/dev.db")));

        config.apply_url("sqlite:other.db");
        assert_eq!(config.path, Some(PathBuf::from("other.db")));

        config.apply_url("memory");
        assert_eq!(config.backend, DatabaseBackend::Memory);

        config.apply_url("/tmp/sales.db");
        assert_eq!(config.backend, DatabaseBackend::Sqlite);
        assert_eq!(config.path, Some(PathBuf::from("/tmp/sales.db")));
    }

    #[test]
    fn test_expand_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = expand_tilde(&path);
        if dirs::home_dir().is_some() {
            assert!(!expanded.to_str().unwrap().starts_with("~"));
        }
    }
}
