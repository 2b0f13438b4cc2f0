//! Typed view of the driver's parameter record.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Which fields a "set" exchange actually applies.
    ///
    /// Only meaningful on requests. A "get" response carries every field and
    /// its flags are never consulted.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct PresentFields: u16 {
        const BAUD_RATE = 1 << 0;
        const DATA_BITS = 1 << 1;
        const RCV_TIMEOUT = 1 << 2;
        const XMIT_TIMEOUT = 1 << 3;
        const PARITY = 1 << 4;
        const STOP_BITS = 1 << 5;
        /// Covers the FIFO triggers, DMA switch, DMA triggers and granularities.
        const FIFO_TRIGGER = 1 << 6;
        const WAIT_FOR_XMIT = 1 << 7;
    }
}

/// Parity checking mode.
///
/// On the wire, `0` and `2` both mean no parity, `1` is odd and `3` is even.
/// Any other code read back from the device is kept as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parity {
    #[default]
    None,
    Odd,
    Even,
    Unknown(u32),
}

impl Parity {
    /// Parse the operator's single-letter parity.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'n' => Some(Self::None),
            'o' => Some(Self::Odd),
            'e' => Some(Self::Even),
            _ => None,
        }
    }

    pub const fn to_wire(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Odd => 1,
            Self::Even => 3,
            Self::Unknown(code) => code,
        }
    }

    pub const fn from_wire(code: u32) -> Self {
        match code {
            0 | 2 => Self::None,
            1 => Self::Odd,
            3 => Self::Even,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("NO PARITY"),
            Self::Odd => f.write_str("ODD"),
            Self::Even => f.write_str("EVEN"),
            Self::Unknown(code) => write!(f, "UNKNOWN ({code})"),
        }
    }
}

/// A full line configuration plus the set of fields a request applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialParameters {
    pub present: PresentFields,
    pub baud_rate: u32,
    pub data_bits: u32,
    pub parity: Parity,
    pub stop_bits: u32,
    /// Milliseconds.
    pub rcv_timeout: i32,
    /// Milliseconds.
    pub xmit_timeout: i32,
    pub rx_fifo_trigger: u8,
    pub tx_fifo_trigger: u8,
    pub dma: bool,
    pub rx_fifo_dma_trigger: u8,
    pub tx_fifo_dma_trigger: u8,
    pub rx_gran: u8,
    pub tx_gran: u8,
}

impl Default for SerialParameters {
    /// Device-neutral values with no field marked present.
    fn default() -> Self {
        Self {
            present: PresentFields::empty(),
            baud_rate: 115_200,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: 1,
            rcv_timeout: 10_000,
            xmit_timeout: 10_000,
            rx_fifo_trigger: 16,
            tx_fifo_trigger: 32,
            dma: false,
            rx_fifo_dma_trigger: 0,
            tx_fifo_dma_trigger: 0,
            rx_gran: 0,
            tx_gran: 0,
        }
    }
}

impl SerialParameters {
    pub fn is_present(&self, fields: PresentFields) -> bool {
        self.present.contains(fields)
    }
}
