//! One invocation of the tool: a single control exchange and its outcome.

use crate::channel::ControlChannel;
use crate::device::ControlDevice;
use crate::error::AppResult;
use crate::message::{Direction, MessageCodec, MessageFlags, TransferResult};
use crate::params::SerialParameters;

/// The exchange requested by the operator, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set(SerialParameters),
    Get,
    ClearReceiveBuffer,
    Send { payload: Vec<u8>, flags: MessageFlags },
    Receive { capacity: usize, flags: MessageFlags },
}

/// What the exchange produced, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The request that was applied; only its present fields are meaningful.
    Set(SerialParameters),
    Got(SerialParameters),
    Cleared,
    Transfer(TransferResult),
}

/// Run `command` against `device`.
///
/// Partial receives come back as `Ok`; every other failure is fatal.
pub fn execute<D: ControlDevice + ?Sized>(device: &mut D, command: Command) -> AppResult<Outcome> {
    let mut channel = ControlChannel::new(device);
    let outcome = match command {
        Command::Set(params) => {
            channel.set_parameters(&params)?;
            Outcome::Set(params)
        }
        Command::Get => Outcome::Got(channel.get_parameters()?),
        Command::ClearReceiveBuffer => {
            channel.clear_receive_buffer()?;
            Outcome::Cleared
        }
        Command::Send { payload, flags } => {
            let mut message = MessageCodec::encode_send(payload, flags);
            Outcome::Transfer(channel.transfer_message(Direction::Send, &mut message)?)
        }
        Command::Receive { capacity, flags } => {
            let mut message = MessageCodec::encode_receive(capacity, flags);
            Outcome::Transfer(channel.transfer_message(Direction::Receive, &mut message)?)
        }
    };
    Ok(outcome)
}
