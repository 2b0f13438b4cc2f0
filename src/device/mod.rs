//! Device abstraction for the control protocol.
//!
//! The [`ControlDevice`] trait is the seam between the protocol logic and the
//! ioctl calls, so the channel can run against real hardware or a mock.

pub mod error;
pub mod mock;
pub mod traits;
pub mod wire;

#[cfg(unix)]
pub mod char_device;

pub use error::DeviceError;
pub use mock::{MockDevice, ScriptedReceive, SentMessage};
pub use traits::ControlDevice;
pub use wire::{WireMessage, WireParams};

#[cfg(unix)]
pub use char_device::CharDevice;
