//! Tally Configuration
//!
//! Three TOML sections, `[server]`, `[log]` and `[database]`, each optional.
//! An empty file is a valid configuration.
//!
//! ```
//! use tally_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[server]\nport = 8080").unwrap();
//! assert_eq!(config.server.port, 8080);
//! ```
//!
//! # Environment
//!
//! `TALLY_DATABASE_URL` and `TALLY_PORT` override the file, see
//! [`Config::apply_env_overrides`].
//!
//! `configs/example.toml` lists every key with its default.

mod database;
mod error;
mod logging;
mod server;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use database::{DatabaseBackend, DatabaseConfig};
pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use server::ServerConfig;
pub use validation::MIN_PORT;

use serde::Deserialize;

/// Environment variable overriding `[database]`
pub const ENV_DATABASE_URL: &str = "TALLY_DATABASE_URL";

/// Environment variable overriding `[server].port`
pub const ENV_PORT: &str = "TALLY_PORT";

/// Complete configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    pub log: LogConfig,

    /// Sales database
    pub database: DatabaseConfig,
}

impl Config {
    /// Read and validate a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Load from an optional file, apply environment overrides, validate
    ///
    /// Without a file, defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Apply `TALLY_DATABASE_URL` and `TALLY_PORT` from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_DATABASE_URL)
            && !url.trim().is_empty()
        {
            self.database.apply_url(&url);
        }

        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port.trim().parse().map_err(|_| {
                ConfigError::invalid_value("server", "port", format!("{} is not a port: {}", ENV_PORT, port))
            })?;
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.log.level, LogLevel::Info);
        assert_eq!(config.database.backend, DatabaseBackend::Sqlite);
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 8080

[log]
level = "debug"
format = "json"

[database]
backend = "sqlite"
path = "/tmp/tally/sales.db"
max_connections = 2
"#;
        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.server.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.database.db_path(), PathBuf::from("/tmp/tally/sales.db"));
        assert_eq!(config.database.max_connections, 2);
    }

    #[test]
    fn test_invalid_toml() {
        let result = Config::from_str("[server\nport = 1");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_rejects_low_port() {
        let result = Config::from_str("[server]\nport = 80");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field: "port", .. })
        ));
    }

    #[test]
    fn test_rejects_empty_pool() {
        let result = Config::from_str("[database]\nmax_connections = 0");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                field: "max_connections",
                ..
            })
        ));
    }

    #[test]
    fn test_memory_backend_ignores_pool_size() {
        let config = Config::from_str("[database]\nbackend = \"memory\"\nmax_connections = 0").unwrap();
        assert_eq!(config.database.backend, DatabaseBackend::Memory);
    }

    #[test]
    fn test_overrides() {
        let env = HashMap::from([
            (ENV_DATABASE_URL, "sqlite://override.db".to_string()),
            (ENV_PORT, "4000".to_string()),
        ]);

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).cloned()).unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.database.path, Some(PathBuf::from("override.db")));
    }

    #[test]
    fn test_override_bad_port() {
        let mut config = Config::default();
        let result = config.apply_overrides(|key| (key == ENV_PORT).then(|| "abc".to_string()));
        assert!(result.is_err());
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 5000").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_from_missing_file() {
        let result = Config::from_file("/nonexistent/tally.toml");
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }
}
