//! Configuration errors

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Why a configuration could not be loaded
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file named with `--config` could not be read
    #[error("failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Not valid TOML, or a value of the wrong type
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A field that must be set is empty
    #[error("[{section}] is missing required field '{field}'")]
    MissingField {
        section: &'static str,
        field: &'static str,
    },

    /// A field is set to an unusable value
    #[error("[{section}] has invalid {field}: {message}")]
    InvalidValue {
        section: &'static str,
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    pub fn missing_field(section: &'static str, field: &'static str) -> Self {
        Self::MissingField { section, field }
    }

    pub fn invalid_value(section: &'static str, field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            section,
            field,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_section_and_field() {
        let missing = ConfigError::missing_field("server", "host").to_string();
        assert_eq!(missing, "[server] is missing required field 'host'");

        let invalid = ConfigError::invalid_value("server", "port", "must be at least 1000").to_string();
        assert_eq!(invalid, "[server] has invalid port: must be at least 1000");
    }
}
