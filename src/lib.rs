//! sertool library
//!
//! User-space client for `/dev/serial`-style character devices that expose a
//! small ioctl control protocol: line parameters, receive-buffer clearing and
//! bounded message transfer.
//!
//! # Modules
//!
//! - `params`: line parameters, range validation and wire conversion
//! - `message`: message requests and the partial-receive policy
//! - `device`: the `ControlDevice` seam, the real ioctl device and a mock
//! - `channel`: the four control operations against one device handle
//! - `command`: one operator request and its outcome
//! - `report`: text and JSON rendering of outcomes
//! - `config`: TOML configuration with environment overrides
//! - `logging`: tracing subscriber setup
//! - `error`: unified error handling and exit codes

pub mod channel;
pub mod command;
pub mod config;
pub mod device;
pub mod error;
pub mod logging;
pub mod message;
pub mod params;
pub mod report;

// Re-export commonly used types for convenience
pub use channel::{ChannelError, ControlChannel, Operation};
pub use command::{execute, Command, Outcome};
pub use device::{ControlDevice, DeviceError, MockDevice, ScriptedReceive};
pub use error::{AppError, AppResult};
pub use message::{
    Direction, Message, MessageCodec, MessageFlags, ReceiveOutcome, TransferError, TransferResult,
};
pub use params::{
    Field, Limits, Parity, ParameterCodec, ParameterDefaults, PresentFields, ProtocolRevision,
    RawParameters, SerialParameters, ValidationError,
};

#[cfg(unix)]
pub use device::CharDevice;

// Re-export config types
pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
