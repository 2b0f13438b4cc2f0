//! Tracing subscriber setup.
//!
//! Logs go to stderr so stdout carries only the report.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const ENV_FILTER: &str = "SERTOOL_LOG";

/// Pick the filter: `-v` forces debug, then `SERTOOL_LOG`, then the configured level.
pub fn build_filter(logging: &LoggingConfig, verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_env(ENV_FILTER).unwrap_or_else(|_| EnvFilter::new(&logging.level))
}

pub fn init(logging: &LoggingConfig, verbose: bool) -> Result<(), TryInitError> {
    use tracing_subscriber::prelude::*;

    let filter = build_filter(logging, verbose);
    let registry = tracing_subscriber::registry().with(filter);
    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Json => registry.with(layer.json()).try_init(),
        LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
    }
}
