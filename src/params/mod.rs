//! Line parameters for the serial control protocol.
//!
//! Holds the typed view of the driver's parameter record, the per-revision
//! range table, and the codec that validates operator input and converts
//! between [`SerialParameters`] and the wire record.

pub mod codec;
pub mod error;
pub mod limits;
pub mod types;

pub use codec::{ParameterCodec, ParameterDefaults, RawParameters};
pub use error::{Field, ValidationError};
pub use limits::{Limits, ProtocolRevision};
pub use types::{Parity, PresentFields, SerialParameters};
