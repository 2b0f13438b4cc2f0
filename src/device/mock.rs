//! Mock control device for testing.
//!
//! Provides a `MockDevice` that behaves like a driver honouring the
//! present-fields bitset, records every request, and replays scripted
//! message outcomes without requiring actual hardware.

use super::traits::ControlDevice;
use super::wire::WireParams;
use crate::message::{Message, MessageFlags};
use crate::params::{ParameterCodec, PresentFields, SerialParameters};
use std::collections::VecDeque;
use std::io;

/// What the device does with the next receive request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedReceive {
    /// Bytes written into the caller's buffer, cut at its capacity.
    pub data: Vec<u8>,
    /// Returned status: a byte count, or the error kind to fail with.
    pub status: Result<usize, io::ErrorKind>,
}

impl ScriptedReceive {
    /// The device returns `data` and reports its length.
    pub fn complete(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            status: Ok(data.len()),
        }
    }

    /// The device writes `data` and then times out.
    pub fn timeout_after(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            status: Err(io::ErrorKind::TimedOut),
        }
    }
}

/// A message the mock accepted on a send request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub flags: MessageFlags,
    pub requested_len: usize,
    pub payload: Vec<u8>,
}

/// Mock control device.
///
/// # Example
/// ```
/// use sertool::device::{ControlDevice, MockDevice, ScriptedReceive};
/// use sertool::message::{MessageCodec, MessageFlags};
///
/// let mut device = MockDevice::new("MOCK0");
/// device.enqueue_receive(ScriptedReceive::complete(b"pong\0"));
///
/// let mut message = MessageCodec::encode_receive(16, MessageFlags::empty());
/// let n = device.receive_message(&mut message).unwrap();
/// assert_eq!(n, 5);
/// assert_eq!(&message.buffer()[..4], b"pong");
/// ```
#[derive(Debug, Clone)]
pub struct MockDevice {
    name: String,
    params: WireParams,
    set_log: Vec<WireParams>,
    sent: Vec<SentMessage>,
    receives: VecDeque<ScriptedReceive>,
    send_statuses: VecDeque<Result<usize, io::ErrorKind>>,
    fail_next: Option<io::ErrorKind>,
    clear_count: usize,
}

impl MockDevice {
    /// A device reporting the neutral default configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_params(name, &SerialParameters::default())
    }

    pub fn with_params(name: impl Into<String>, params: &SerialParameters) -> Self {
        let mut params = ParameterCodec::encode_for_set(params);
        params.flags = 0;
        Self::with_wire_params(name, params)
    }

    /// Start from a raw record, e.g. one with an out-of-table parity code.
    pub fn with_wire_params(name: impl Into<String>, params: WireParams) -> Self {
        Self {
            name: name.into(),
            params,
            set_log: Vec::new(),
            sent: Vec::new(),
            receives: VecDeque::new(),
            send_statuses: VecDeque::new(),
            fail_next: None,
            clear_count: 0,
        }
    }

    /// Script the outcome of the next unscripted receive.
    pub fn enqueue_receive(&mut self, receive: ScriptedReceive) {
        self.receives.push_back(receive);
    }

    /// Script the status of the next send. Unscripted sends accept everything.
    pub fn enqueue_send_status(&mut self, status: Result<usize, io::ErrorKind>) {
        self.send_statuses.push_back(status);
    }

    /// Make the next request of any kind fail with `kind`.
    pub fn fail_next(&mut self, kind: io::ErrorKind) {
        self.fail_next = Some(kind);
    }

    /// The record the device currently holds.
    pub fn current_params(&self) -> WireParams {
        self.params
    }

    /// Every record received by set requests, in order.
    pub fn set_log(&self) -> &[WireParams] {
        &self.set_log
    }

    pub fn sent_messages(&self) -> &[SentMessage] {
        &self.sent
    }

    pub fn clear_count(&self) -> usize {
        self.clear_count
    }

    fn take_failure(&mut self) -> io::Result<()> {
        match self.fail_next.take() {
            Some(kind) => Err(io::Error::from(kind)),
            None => Ok(()),
        }
    }
}

impl ControlDevice for MockDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_params(&mut self) -> io::Result<WireParams> {
        self.take_failure()?;
        Ok(self.params)
    }

    fn set_params(&mut self, params: &WireParams) -> io::Result<()> {
        self.take_failure()?;
        self.set_log.push(*params);

        let present = PresentFields::from_bits_truncate(params.flags);
        let current = &mut self.params;
        if present.contains(PresentFields::BAUD_RATE) {
            current.baud_rate = params.baud_rate;
        }
        if present.contains(PresentFields::DATA_BITS) {
            current.data_bits = params.data_bits;
        }
        if present.contains(PresentFields::RCV_TIMEOUT) {
            current.rcv_timeout = params.rcv_timeout;
        }
        if present.contains(PresentFields::XMIT_TIMEOUT) {
            current.xmit_timeout = params.xmit_timeout;
        }
        if present.contains(PresentFields::PARITY) {
            current.parity = params.parity;
        }
        if present.contains(PresentFields::STOP_BITS) {
            current.stop_bits = params.stop_bits;
        }
        if present.contains(PresentFields::FIFO_TRIGGER) {
            current.rx_fifo_trigger = params.rx_fifo_trigger;
            current.tx_fifo_trigger = params.tx_fifo_trigger;
            current.dma = params.dma;
            current.rx_fifo_dma_trigger = params.rx_fifo_dma_trigger;
            current.tx_fifo_dma_trigger = params.tx_fifo_dma_trigger;
            current.rx_gran = params.rx_gran;
            current.tx_gran = params.tx_gran;
        }
        Ok(())
    }

    fn clear_rx_buffer(&mut self) -> io::Result<()> {
        self.take_failure()?;
        self.receives.clear();
        self.clear_count += 1;
        Ok(())
    }

    fn send_message(&mut self, message: &mut Message) -> io::Result<usize> {
        self.take_failure()?;
        let status = self
            .send_statuses
            .pop_front()
            .unwrap_or(Ok(message.requested_len()));
        let count = status.map_err(io::Error::from)?;
        self.sent.push(SentMessage {
            flags: message.flags(),
            requested_len: message.requested_len(),
            payload: message.payload().to_vec(),
        });
        Ok(count)
    }

    fn receive_message(&mut self, message: &mut Message) -> io::Result<usize> {
        self.take_failure()?;
        let Some(script) = self.receives.pop_front() else {
            return Err(io::Error::from(io::ErrorKind::TimedOut));
        };
        let capacity = message.requested_len().min(message.buffer().len());
        let n = script.data.len().min(capacity);
        message.buffer_mut()[..n].copy_from_slice(&script.data[..n]);
        script.status.map_err(io::Error::from)
    }
}
