//! HTTP server configuration

use serde::Deserialize;

/// HTTP server configuration
///
/// # Example
///
/// ```toml
/// [server]
/// host = "0.0.0.0"        # default
/// port = 3000             # default
/// shutdown_timeout_secs = 10
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    /// Default: "0.0.0.0"
    pub host: String,

    /// Port to listen on (1000-65535)
    /// Default: 3000
    pub port: u16,

    /// Seconds to wait for in-flight requests on shutdown
    /// Default: 10
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            shutdown_timeout_secs: 10,
        }
    }
}

impl ServerConfig {
    /// `host:port` bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
