//! `[log]` section
//!
//! ```toml
//! [log]
//! level = "info"               # trace | debug | info | warn | error
//! format = "console"           # console | json
//! targets = "sqlx=warn"        # extra EnvFilter directives, optional
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

/// Minimum severity written to the log
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    const NAMES: [(&'static str, LogLevel); 5] = [
        ("trace", LogLevel::Trace),
        ("debug", LogLevel::Debug),
        ("info", LogLevel::Info),
        ("warn", LogLevel::Warn),
        ("error", LogLevel::Error),
    ];

    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_str(&self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(_, level)| level == self)
            .map(|(name, _)| *name)
            .unwrap_or("info")
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let wanted = if wanted == "warning" { "warn".to_string() } else { wanted };

        Self::NAMES
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, level)| *level)
            .ok_or_else(|| ConfigError::invalid_value("log", "level", format!("unknown level '{}'", s)))
    }
}

/// Line format of log output
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Console,
    /// One JSON object per line
    Json,
}

/// Logging settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Per-target overrides appended to the level, e.g. `tally_query=debug`
    pub targets: Option<String>,
}

impl LogConfig {
    /// Full filter directive for `level`, keeping the configured targets
    pub fn directive(&self, level: &str) -> String {
        match self.targets.as_deref().map(str::trim) {
            Some(targets) if !targets.is_empty() => format!("{},{}", level, targets),
            _ => level.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Console);
        assert_eq!(config.directive("info"), "info");
    }

    #[test]
    fn test_section_parses() {
        let config: LogConfig =
            toml::from_str("level = \"debug\"\nformat = \"json\"\ntargets = \"sqlx=warn\"").unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.directive(config.level.as_str()), "debug,sqlx=warn");
    }

    #[test]
    fn test_level_names() {
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::Trace.to_string(), "trace");
        assert!("fatal".parse::<LogLevel>().is_err());
        assert!(LogLevel::Debug < LogLevel::Error);
    }
}
