//! Validation errors for line parameters.

use std::fmt;
use thiserror::Error;

/// A configurable field of the parameter record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    BaudRate,
    DataBits,
    RcvTimeout,
    XmitTimeout,
    Parity,
    StopBits,
    RxFifoTrigger,
    TxFifoTrigger,
    RxFifoDmaTrigger,
    TxFifoDmaTrigger,
    RxGranularity,
    TxGranularity,
}

impl Field {
    /// The name used in messages and configuration keys.
    pub const fn name(self) -> &'static str {
        match self {
            Self::BaudRate => "baud_rate",
            Self::DataBits => "data_bits",
            Self::RcvTimeout => "rcv_timeout",
            Self::XmitTimeout => "xmit_timeout",
            Self::Parity => "parity",
            Self::StopBits => "stop_bits",
            Self::RxFifoTrigger => "rx_fifo_trigger",
            Self::TxFifoTrigger => "tx_fifo_trigger",
            Self::RxFifoDmaTrigger => "rx_fifo_dma_trigger",
            Self::TxFifoDmaTrigger => "tx_fifo_dma_trigger",
            Self::RxGranularity => "rx_gran",
            Self::TxGranularity => "tx_gran",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operator input rejected before any device exchange.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A numeric field fell outside its legal range.
    #[error("{value} is not a valid {field}: must be between {min} and {max}")]
    OutOfRange {
        field: Field,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Parity was not one of `n`, `e` or `o`.
    #[error("'{0}' is not a valid parity: must be n (no parity), e (even) or o (odd)")]
    InvalidParity(char),
}

impl ValidationError {
    /// The field that failed validation.
    pub fn field(&self) -> Field {
        match self {
            Self::OutOfRange { field, .. } => *field,
            Self::InvalidParity(_) => Field::Parity,
        }
    }

    /// The legal range of the failing field, if it is numeric.
    pub fn range(&self) -> Option<(i64, i64)> {
        match self {
            Self::OutOfRange { min, max, .. } => Some((*min, *max)),
            Self::InvalidParity(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_display() {
        let err = ValidationError::OutOfRange {
            field: Field::DataBits,
            value: 9,
            min: 5,
            max: 8,
        };
        assert_eq!(
            err.to_string(),
            "9 is not a valid data_bits: must be between 5 and 8"
        );
        assert_eq!(err.field(), Field::DataBits);
        assert_eq!(err.range(), Some((5, 8)));
    }

    #[test]
    fn test_invalid_parity_display() {
        let err = ValidationError::InvalidParity('x');
        assert!(err.to_string().contains("'x'"));
        assert_eq!(err.field(), Field::Parity);
        assert_eq!(err.range(), None);
    }
}
