//! Legal ranges for each parameter, per protocol revision.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Highest baud rate the device accepts.
pub const MAX_BAUD_RATE: i64 = 3_688_400;

/// Longest receive or transmit timeout, in milliseconds.
pub const MAX_TIMEOUT_MS: i64 = 300_000;

/// Revision of the driver's control protocol.
///
/// The revisions differ only in the accepted data-bits range.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolRevision {
    /// Early drivers: 1 to 64 data bits.
    Legacy,
    /// Current drivers: 5 to 8 data bits.
    #[default]
    Current,
}

impl fmt::Display for ProtocolRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => f.write_str("legacy"),
            Self::Current => f.write_str("current"),
        }
    }
}

impl FromStr for ProtocolRevision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "current" => Ok(Self::Current),
            other => Err(format!(
                "unknown protocol revision '{other}' (expected 'legacy' or 'current')"
            )),
        }
    }
}

/// Inclusive range table used by [`ParameterCodec::validate`](super::ParameterCodec::validate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    pub baud_rate: RangeInclusive<i64>,
    pub data_bits: RangeInclusive<i64>,
    pub stop_bits: RangeInclusive<i64>,
    pub timeout_ms: RangeInclusive<i64>,
    /// Shared by the FIFO trigger, DMA trigger and granularity bytes.
    pub fifo: RangeInclusive<i64>,
}

impl Limits {
    pub fn for_revision(revision: ProtocolRevision) -> Self {
        let data_bits = match revision {
            ProtocolRevision::Legacy => 1..=64,
            ProtocolRevision::Current => 5..=8,
        };
        Self {
            baud_rate: 0..=MAX_BAUD_RATE,
            data_bits,
            stop_bits: 1..=64,
            timeout_ms: 0..=MAX_TIMEOUT_MS,
            fifo: 0..=i64::from(u8::MAX),
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::for_revision(ProtocolRevision::default())
    }
}
