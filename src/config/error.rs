//! Configuration error types for the config module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found at an explicitly requested path
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Failed to read config file
    #[error("Failed to read configuration file '{}': {source}", .path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Environment variable parse error
    #[error("Failed to parse environment variable '{var}': {message}")]
    EnvParseError { var: String, message: String },
}

impl ConfigError {
    /// Create an env parse error
    pub fn env_parse<V: Into<String>, M: Into<String>>(var: V, message: M) -> Self {
        Self::EnvParseError {
            var: var.into(),
            message: message.into(),
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
