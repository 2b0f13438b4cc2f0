//! Control channel for the serial device.
//!
//! Each operation is one blocking request/response pair against a borrowed
//! [`ControlDevice`]. The channel keeps no state between calls; everything
//! lives in the device handle, which the channel cannot outlive.
//!
//! ```text
//! SerialParameters ─┐                    ┌─> get / set / clear
//!                   ├──> ControlChannel ─┤
//! Message ──────────┘                    └─> send / receive
//! ```

use crate::device::ControlDevice;
use crate::message::{Direction, Message, MessageCodec, TransferError, TransferResult};
use crate::params::{ParameterCodec, SerialParameters};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

/// The parameter-level operations, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetParameters,
    SetParameters,
    ClearReceiveBuffer,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GetParameters => f.write_str("get parameters"),
            Self::SetParameters => f.write_str("set parameters"),
            Self::ClearReceiveBuffer => f.write_str("clear receive buffer"),
        }
    }
}

/// A get, set or clear exchange failed. Always fatal.
#[derive(Debug, Error)]
#[error("Failed to {operation} on {device}: {source}")]
pub struct ChannelError {
    pub operation: Operation,
    pub device: String,
    #[source]
    pub source: std::io::Error,
}

/// Dispatches the four control operations against one device handle.
#[derive(Debug)]
pub struct ControlChannel<'d, D: ControlDevice + ?Sized> {
    device: &'d mut D,
}

impl<'d, D: ControlDevice + ?Sized> ControlChannel<'d, D> {
    pub fn new(device: &'d mut D) -> Self {
        Self { device }
    }

    fn fail(&self, operation: Operation, source: std::io::Error) -> ChannelError {
        ChannelError {
            operation,
            device: self.device.name().to_string(),
            source,
        }
    }

    /// Read the device's full configuration.
    pub fn get_parameters(&mut self) -> Result<SerialParameters, ChannelError> {
        debug!(device = self.device.name(), "get parameters");
        match self.device.get_params() {
            Ok(wire) => Ok(ParameterCodec::decode_get_response(&wire)),
            Err(e) => Err(self.fail(Operation::GetParameters, e)),
        }
    }

    /// Apply the fields marked present in `params`.
    ///
    /// The attempted fields are logged before the exchange, so a failed set
    /// still leaves a record of what was sent.
    pub fn set_parameters(&mut self, params: &SerialParameters) -> Result<(), ChannelError> {
        info!(
            device = self.device.name(),
            fields = ?params.present,
            baud_rate = params.baud_rate,
            data_bits = params.data_bits,
            stop_bits = params.stop_bits,
            parity = %params.parity,
            "going to set"
        );
        let wire = ParameterCodec::encode_for_set(params);
        debug!(
            device = self.device.name(),
            flags = wire.flags,
            "set parameters"
        );
        self.device
            .set_params(&wire)
            .map_err(|e| self.fail(Operation::SetParameters, e))
    }

    pub fn clear_receive_buffer(&mut self) -> Result<(), ChannelError> {
        debug!(device = self.device.name(), "clear receive buffer");
        self.device
            .clear_rx_buffer()
            .map_err(|e| self.fail(Operation::ClearReceiveBuffer, e))
    }

    /// Send or receive `message`.
    ///
    /// A receive that times out yields a partial [`TransferResult::Received`];
    /// every other failure is a [`TransferError`].
    pub fn transfer_message(
        &mut self,
        direction: Direction,
        message: &mut Message,
    ) -> Result<TransferResult, TransferError> {
        debug!(
            device = self.device.name(),
            %direction,
            requested = message.requested_len(),
            "transfer message"
        );
        match direction {
            Direction::Send => {
                let status = self.device.send_message(message);
                let written = MessageCodec::decode_send_result(status)?;
                Ok(TransferResult::Sent {
                    written,
                    requested: message.requested_len(),
                })
            }
            Direction::Receive => {
                let status = self.device.receive_message(message);
                MessageCodec::decode_receive_result(status, message).map(TransferResult::Received)
            }
        }
    }
}
