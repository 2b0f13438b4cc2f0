//! Bounded message transfer.
//!
//! Messages are built fresh for one exchange, handed to the device by
//! mutable reference, and decoded afterwards. A receive that times out is a
//! reportable partial outcome rather than an error.

pub mod codec;
pub mod error;

pub use codec::{MessageCodec, ReceiveOutcome, TransferResult};
pub use error::TransferError;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest receive buffer the command line will allocate, in bytes.
pub const MAX_RECEIVE_CAPACITY: u32 = 1 << 20;

bitflags! {
    /// Per-message request flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct MessageFlags: u16 {
        /// Do not return until the device has finished transmitting.
        const WAIT_FOR_XMIT = 1 << 7;
    }
}

/// Which way a message travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Send,
    Receive,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send => f.write_str("send"),
            Self::Receive => f.write_str("receive"),
        }
    }
}

/// One outbound or inbound message.
///
/// `buffer` always holds at least `requested_len` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub(crate) flags: MessageFlags,
    pub(crate) requested_len: usize,
    pub(crate) buffer: Vec<u8>,
}

impl Message {
    pub fn flags(&self) -> MessageFlags {
        self.flags
    }

    /// For sends, the payload length plus one terminator slot. For receives,
    /// the buffer capacity.
    pub fn requested_len(&self) -> usize {
        self.requested_len
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Mutable access for the device filling a receive buffer.
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// The outbound payload, without the terminator slot.
    pub fn payload(&self) -> &[u8] {
        let end = self.requested_len.saturating_sub(1).min(self.buffer.len());
        &self.buffer[..end]
    }
}
