//! Encoding of message requests and decoding of their status.

use super::{Direction, Message, MessageFlags, TransferError};
use serde::Serialize;
use std::io;
use tracing::{info, warn};

/// Result of a receive exchange.
///
/// `missing` is signed: a negative value means the device reported more
/// bytes than the request had room for, and is kept as a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiveOutcome {
    pub payload: Vec<u8>,
    pub missing: i64,
    pub timed_out: bool,
}

impl ReceiveOutcome {
    /// The device timed out before the full message arrived.
    pub fn is_partial(&self) -> bool {
        self.timed_out
    }

    /// Byte accounting does not add up.
    pub fn is_inconsistent(&self) -> bool {
        self.missing < 0
    }
}

/// Successful outcome of a transfer exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "direction", rename_all = "snake_case")]
pub enum TransferResult {
    /// `written` is the device's own count and may be short of `requested`.
    Sent { written: usize, requested: usize },
    Received(ReceiveOutcome),
}

pub struct MessageCodec;

impl MessageCodec {
    /// Build an outbound message. One extra zero byte is reserved for the
    /// terminator and counted in the requested length.
    pub fn encode_send(payload: impl AsRef<[u8]>, flags: MessageFlags) -> Message {
        let payload = payload.as_ref();
        let mut buffer = Vec::with_capacity(payload.len() + 1);
        buffer.extend_from_slice(payload);
        buffer.push(0);
        Message {
            flags,
            requested_len: buffer.len(),
            buffer,
        }
    }

    /// Build an inbound message with a zeroed buffer of `capacity` bytes.
    pub fn encode_receive(capacity: usize, flags: MessageFlags) -> Message {
        Message {
            flags,
            requested_len: capacity,
            buffer: vec![0; capacity],
        }
    }

    /// Any error is fatal; otherwise the device's byte count is returned verbatim.
    pub fn decode_send_result(status: io::Result<usize>) -> Result<usize, TransferError> {
        status.map_err(|e| TransferError::failed(Direction::Send, e))
    }

    /// Decode a receive status against the buffer the device filled.
    ///
    /// The payload runs up to the first zero byte, never past the allocated
    /// capacity. A timeout yields a partial outcome with
    /// `missing = requested_len - (payload_len + 1)`; any other error is fatal.
    pub fn decode_receive_result(
        status: io::Result<usize>,
        message: &Message,
    ) -> Result<ReceiveOutcome, TransferError> {
        let capacity = message.requested_len.min(message.buffer.len());
        let window = &message.buffer[..capacity];
        let found = memchr::memchr(0, window).unwrap_or(window.len());
        let payload = window[..found].to_vec();

        match status {
            Ok(reported) => {
                if reported > capacity {
                    warn!(
                        reported,
                        capacity, "device reported more bytes than the receive buffer holds"
                    );
                }
                Ok(ReceiveOutcome {
                    payload,
                    missing: 0,
                    timed_out: false,
                })
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                let missing = message.requested_len as i64 - (found as i64 + 1);
                if missing < 0 {
                    warn!(
                        requested = message.requested_len,
                        found, missing, "receive accounting is inconsistent"
                    );
                }
                info!(received = found, missing, "receive timed out");
                Ok(ReceiveOutcome {
                    payload,
                    missing,
                    timed_out: true,
                })
            }
            Err(e) => Err(TransferError::failed(Direction::Receive, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(capacity: usize, data: &[u8]) -> Message {
        let mut message = MessageCodec::encode_receive(capacity, MessageFlags::empty());
        let n = data.len().min(capacity);
        message.buffer_mut()[..n].copy_from_slice(&data[..n]);
        message
    }

    fn timed_out() -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::TimedOut))
    }

    #[test]
    fn test_encode_send_reserves_terminator() {
        let message = MessageCodec::encode_send("hello", MessageFlags::WAIT_FOR_XMIT);
        assert_eq!(message.requested_len(), 6);
        assert_eq!(message.buffer(), b"hello\0");
        assert_eq!(message.payload(), b"hello");
        assert_eq!(message.flags(), MessageFlags::WAIT_FOR_XMIT);
    }

    #[test]
    fn test_encode_empty_send() {
        let message = MessageCodec::encode_send(b"", MessageFlags::empty());
        assert_eq!(message.requested_len(), 1);
        assert_eq!(message.payload(), b"");
    }

    #[test]
    fn test_encode_receive_preallocates() {
        let message = MessageCodec::encode_receive(32, MessageFlags::empty());
        assert_eq!(message.requested_len(), 32);
        assert_eq!(message.buffer().len(), 32);
        assert!(message.buffer().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_send_reports_device_count() {
        assert_eq!(MessageCodec::decode_send_result(Ok(3)).unwrap(), 3);
    }

    #[test]
    fn test_send_error_is_fatal_even_on_timeout() {
        let err = MessageCodec::decode_send_result(timed_out()).unwrap_err();
        assert_eq!(err.direction(), Direction::Send);
    }

    #[test]
    fn test_complete_receive_truncates_at_terminator() {
        let message = filled(16, b"abc\0def");
        let outcome = MessageCodec::decode_receive_result(Ok(4), &message).unwrap();
        assert_eq!(outcome.payload, b"abc");
        assert_eq!(outcome.missing, 0);
        assert!(!outcome.is_partial());
    }

    #[test]
    fn test_timeout_is_partial() {
        let message = filled(10, b"abcd\0");
        let outcome = MessageCodec::decode_receive_result(timed_out(), &message).unwrap();
        assert_eq!(outcome.payload, b"abcd");
        assert_eq!(outcome.missing, 5);
        assert!(outcome.is_partial());
        assert!(!outcome.is_inconsistent());
    }

    #[test]
    fn test_timeout_with_nothing_received() {
        let message = filled(8, b"");
        let outcome = MessageCodec::decode_receive_result(timed_out(), &message).unwrap();
        assert!(outcome.payload.is_empty());
        assert_eq!(outcome.missing, 7);
    }

    #[test]
    fn test_full_buffer_without_terminator_is_inconsistent() {
        let message = filled(4, b"wxyz");
        let outcome = MessageCodec::decode_receive_result(timed_out(), &message).unwrap();
        assert_eq!(outcome.payload, b"wxyz");
        assert_eq!(outcome.missing, -1);
        assert!(outcome.is_inconsistent());
    }

    #[test]
    fn test_oversized_count_stays_within_capacity() {
        let message = filled(4, b"wxyz");
        let outcome = MessageCodec::decode_receive_result(Ok(4096), &message).unwrap();
        assert_eq!(outcome.payload, b"wxyz");
    }

    #[test]
    fn test_other_receive_errors_are_fatal() {
        let message = filled(8, b"ab\0");
        let status = Err(io::Error::from_raw_os_error(5));
        let err = MessageCodec::decode_receive_result(status, &message).unwrap_err();
        assert_eq!(err.direction(), Direction::Receive);
    }
}
