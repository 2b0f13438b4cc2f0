use crate::channel::ChannelError;
use crate::config::ConfigError;
use crate::device::DeviceError;
use crate::message::TransferError;
use crate::params::ValidationError;
use thiserror::Error;

/// A specialized `Result` type for a whole invocation.
pub type AppResult<T> = Result<T, AppError>;

/// Unified application error type.
///
/// Every variant is fatal. A receive that times out is not an error and
/// never reaches this type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid parameter: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Control request failed: {0}")]
    Channel(#[from] ChannelError),

    #[error("Message transfer failed: {0}")]
    Transfer(#[from] TransferError),
}

impl AppError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Config(_) => 3,
            Self::Device(_) => 4,
            Self::Channel(_) => 5,
            Self::Transfer(_) => 6,
        }
    }
}
