//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::Config;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "SERTOOL";

/// Config file name in the current directory
const LOCAL_CONFIG_FILE_NAME: &str = "sertool.toml";

/// Config file name inside the platform config directory
const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable for explicit config path
const CONFIG_PATH_ENV: &str = "SERTOOL_CONFIG";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `SERTOOL_CONFIG` environment variable (explicit path)
    /// 2. `./sertool.toml` (current directory)
    /// 3. `$XDG_CONFIG_HOME/sertool/config.toml` or `~/.config/sertool/config.toml`
    /// 4. Built-in defaults (no file required)
    ///
    /// Environment variables can override any config file values.
    pub fn load() -> ConfigResult<Self> {
        let config_path = resolve_config_path();

        let mut config = if let Some(ref path) = config_path {
            load_from_file(path)?
        } else {
            Config::default()
        };

        apply_env_overrides(&mut config)?;

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a specific file path.
    ///
    /// Unlike [`ConfigLoader::load`], a missing file is an error here.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }
        let mut config = load_from_file(&path)?;
        apply_env_overrides(&mut config)?;

        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }
}

/// Resolve the configuration file path using standard locations.
pub fn resolve_config_path() -> Option<PathBuf> {
    // 1. Explicit environment variable
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. Current directory
    let cwd_config = PathBuf::from(LOCAL_CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    // 3. XDG config directory
    if let Some(app_config) = get_default_config_path() {
        if app_config.exists() {
            return Some(app_config);
        }
    }

    None
}

/// Get the platform-specific config directory.
fn get_config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
}

/// Get the default config file path.
pub fn get_default_config_path() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join("sertool").join(CONFIG_FILE_NAME))
}

/// Load configuration from a file.
fn load_from_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(ConfigError::ParseError)
}

/// Parse `SERTOOL_<suffix>` into `target` if it is set.
fn override_from_env<T: FromStr>(suffix: &str, target: &mut T) -> ConfigResult<()> {
    let var = format!("{}_{}", ENV_PREFIX, suffix);
    if let Ok(val) = std::env::var(&var) {
        *target = val
            .trim()
            .parse()
            .map_err(|_| ConfigError::env_parse(var, format!("invalid value '{val}'")))?;
    }
    Ok(())
}

/// Apply environment variable overrides to the configuration.
///
/// Environment variables follow the pattern: `SERTOOL_<SECTION>_<KEY>`
/// For example:
/// - `SERTOOL_DEFAULTS_BAUD_RATE=9600`
/// - `SERTOOL_PROTOCOL_REVISION=legacy`
/// - `SERTOOL_LOGGING_LEVEL=debug`
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    let d = &mut config.defaults;
    override_from_env("DEFAULTS_BAUD_RATE", &mut d.baud_rate)?;
    override_from_env("DEFAULTS_DATA_BITS", &mut d.data_bits)?;
    override_from_env("DEFAULTS_PARITY", &mut d.parity)?;
    override_from_env("DEFAULTS_STOP_BITS", &mut d.stop_bits)?;
    override_from_env("DEFAULTS_RCV_TIMEOUT", &mut d.rcv_timeout)?;
    override_from_env("DEFAULTS_XMIT_TIMEOUT", &mut d.xmit_timeout)?;
    override_from_env("DEFAULTS_RX_FIFO_TRIGGER", &mut d.rx_fifo_trigger)?;
    override_from_env("DEFAULTS_TX_FIFO_TRIGGER", &mut d.tx_fifo_trigger)?;
    override_from_env("DEFAULTS_DMA", &mut d.dma)?;
    override_from_env("DEFAULTS_RX_FIFO_DMA_TRIGGER", &mut d.rx_fifo_dma_trigger)?;
    override_from_env("DEFAULTS_TX_FIFO_DMA_TRIGGER", &mut d.tx_fifo_dma_trigger)?;
    override_from_env("DEFAULTS_RX_GRAN", &mut d.rx_gran)?;
    override_from_env("DEFAULTS_TX_GRAN", &mut d.tx_gran)?;

    override_from_env("PROTOCOL_REVISION", &mut config.protocol.revision)?;

    override_from_env("LOGGING_LEVEL", &mut config.logging.level)?;
    override_from_env("LOGGING_FORMAT", &mut config.logging.format)?;

    Ok(())
}
