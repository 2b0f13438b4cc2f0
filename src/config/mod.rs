//! Configuration module for sertool.
//!
//! This module provides TOML-based configuration with environment variable overrides.
//!
//! # Configuration Resolution
//!
//! Configuration is loaded from the following locations (in order of priority):
//!
//! 1. `--config <PATH>` on the command line
//! 2. `SERTOOL_CONFIG` environment variable (explicit path)
//! 3. `./sertool.toml` (current directory)
//! 4. `~/.config/sertool/config.toml` (XDG)
//! 5. Built-in defaults (no file required)
//!
//! The file is only ever read; sertool keeps no state between runs.
//!
//! # Environment Overrides
//!
//! The pattern is: `SERTOOL_<SECTION>_<KEY>`
//!
//! Examples:
//! - `SERTOOL_DEFAULTS_BAUD_RATE=9600`
//! - `SERTOOL_PROTOCOL_REVISION=legacy`
//! - `SERTOOL_LOGGING_LEVEL=debug`
//!
//! # Example
//!
//! ```toml
//! [defaults]
//! baud_rate = 9600
//! parity = "e"
//! rcv_timeout = 2000
//!
//! [protocol]
//! revision = "current"
//!
//! [logging]
//! level = "info"
//! format = "compact"
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{get_default_config_path, resolve_config_path, ConfigLoader};
pub use schema::{Config, LogFormat, LoggingConfig, ProtocolConfig};
