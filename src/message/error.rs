//! Fatal message-transfer errors.

use super::Direction;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferError {
    /// The device rejected the exchange. A receive timeout never ends up here.
    #[error("{direction} failed: {source}")]
    Failed {
        direction: Direction,
        #[source]
        source: std::io::Error,
    },
}

impl TransferError {
    pub fn failed(direction: Direction, source: std::io::Error) -> Self {
        Self::Failed { direction, source }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Self::Failed { direction, .. } => *direction,
        }
    }
}
