//! Configuration validation
//!
//! Validates config consistency:
//! - Server port is in the allowed range and host is set
//! - SQLite pool has at least one connection

use crate::Config;
use crate::database::DatabaseBackend;
use crate::error::{ConfigError, Result};

/// Lowest port the server may bind
pub const MIN_PORT: u16 = 1000;

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_server(config)?;
    validate_database(config)?;
    Ok(())
}

fn validate_server(config: &Config) -> Result<()> {
    if config.server.host.trim().is_empty() {
        return Err(ConfigError::missing_field("server", "host"));
    }

    if config.server.port < MIN_PORT {
        return Err(ConfigError::invalid_value(
            "server",
            "port",
            format!("must be at least {} (got {})", MIN_PORT, config.server.port),
        ));
    }

    Ok(())
}

fn validate_database(config: &Config) -> Result<()> {
    if config.database.backend == DatabaseBackend::Sqlite {
        if config.database.max_connections == 0 {
            return Err(ConfigError::invalid_value(
                "database",
                "max_connections",
                "must be at least 1",
            ));
        }

        if let Some(ref path) = config.database.path
            && path.as_os_str().is_empty()
        {
            return Err(ConfigError::missing_field("database", "path"));
        }
    }

    Ok(())
}
