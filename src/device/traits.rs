//! Core trait for the control-request mechanism.

use super::wire::WireParams;
use crate::message::Message;
use std::io;

/// One exclusively-owned device handle that answers control requests.
///
/// Each method is a single blocking exchange. Errors carry the OS status;
/// a receive timeout is reported as [`io::ErrorKind::TimedOut`] after the
/// device has written whatever it collected into the message buffer.
pub trait ControlDevice: std::fmt::Debug {
    /// Path or label of the device, for diagnostics.
    fn name(&self) -> &str;

    /// Read the full parameter record.
    fn get_params(&mut self) -> io::Result<WireParams>;

    /// Apply the fields flagged in `params.flags`.
    fn set_params(&mut self, params: &WireParams) -> io::Result<()>;

    /// Discard everything in the receive buffer.
    fn clear_rx_buffer(&mut self) -> io::Result<()>;

    /// Hand `message` to the device. Returns the number of bytes it accepted.
    fn send_message(&mut self, message: &mut Message) -> io::Result<usize>;

    /// Fill `message`'s buffer. Returns the number of bytes read.
    fn receive_message(&mut self, message: &mut Message) -> io::Result<usize>;
}

impl<D: ControlDevice + ?Sized> ControlDevice for Box<D> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get_params(&mut self) -> io::Result<WireParams> {
        (**self).get_params()
    }

    fn set_params(&mut self, params: &WireParams) -> io::Result<()> {
        (**self).set_params(params)
    }

    fn clear_rx_buffer(&mut self) -> io::Result<()> {
        (**self).clear_rx_buffer()
    }

    fn send_message(&mut self, message: &mut Message) -> io::Result<usize> {
        (**self).send_message(message)
    }

    fn receive_message(&mut self, message: &mut Message) -> io::Result<usize> {
        (**self).receive_message(message)
    }
}
