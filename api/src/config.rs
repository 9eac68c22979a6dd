//! Server configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use shared::config::{AnalysisConfig, DEFAULT_MAX_ELEVATED_LINES};
use std::net::SocketAddr;

/// Default request body limit for uploaded log content (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Server configuration.
///
/// Configuration values can be set via environment variables:
/// - `LOGSIEVE_HOST`: The host address to bind to (default: "0.0.0.0")
/// - `LOGSIEVE_PORT`: The port to listen on (default: 8080)
/// - `LOGSIEVE_MAX_ELEVATED_LINES`: Elevated lines sent for summary (default: 200)
/// - `LOGSIEVE_MAX_UPLOAD_BYTES`: Maximum request body size (default: 10 MiB)
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// Analysis policy applied when a request does not override it.
    pub analysis: AnalysisConfig,
    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `LOGSIEVE_PORT` is set but cannot be parsed as a valid port number
    /// - `LOGSIEVE_MAX_ELEVATED_LINES` or `LOGSIEVE_MAX_UPLOAD_BYTES` is not a number
    /// - The resulting analysis configuration is invalid
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("LOGSIEVE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("LOGSIEVE_PORT")
            .ok()
            .map(|p| p.parse::<u16>())
            .transpose()
            .context("LOGSIEVE_PORT must be a valid port number")?
            .unwrap_or(8080);

        let max_elevated_lines = std::env::var("LOGSIEVE_MAX_ELEVATED_LINES")
            .ok()
            .map(|n| n.parse::<usize>())
            .transpose()
            .context("LOGSIEVE_MAX_ELEVATED_LINES must be a positive integer")?
            .unwrap_or(DEFAULT_MAX_ELEVATED_LINES);

        let max_upload_bytes = std::env::var("LOGSIEVE_MAX_UPLOAD_BYTES")
            .ok()
            .map(|n| n.parse::<usize>())
            .transpose()
            .context("LOGSIEVE_MAX_UPLOAD_BYTES must be a positive integer")?
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        let analysis = AnalysisConfig::default().with_max_elevated_lines(max_elevated_lines);
        analysis.validate_config()?;

        Ok(Self {
            host,
            port,
            analysis,
            max_upload_bytes,
        })
    }

    /// Returns the socket address for binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the host and port combination is not a valid socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            analysis: AnalysisConfig::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
