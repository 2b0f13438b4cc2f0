//! Configuration schema definitions.
//!
//! This module defines the structure of the configuration file using serde.
//! Every section has defaults, so an empty file is a valid configuration.

use crate::params::{Limits, ParameterDefaults, ProtocolRevision};
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Values used for parameters not given on the command line
    pub defaults: ParameterDefaults,
    /// Driver protocol settings
    pub protocol: ProtocolConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Protocol configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Revision of the driver's control protocol: "legacy" or "current"
    pub revision: ProtocolRevision,
}

impl ProtocolConfig {
    pub fn limits(&self) -> Limits {
        Limits::for_revision(self.revision)
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `SERTOOL_LOG` is unset, e.g. "warn" or "sertool=debug"
    pub level: String,
    /// Log format: "json", "pretty", "compact"
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format
    Json,
    /// Pretty format with colors
    Pretty,
    /// Compact format
    #[default]
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}
