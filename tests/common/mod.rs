//! Shared test utilities for sertool integration tests.
//!
//! This module provides:
//! - Mock devices with scripted receive outcomes
//! - Builders for raw operator input

#![allow(dead_code)]

use sertool::device::{MockDevice, ScriptedReceive};
use sertool::params::{Field, Limits, ParameterCodec, RawParameters, SerialParameters};
use std::ops::RangeInclusive;

/// Create a mock device that replays `receives` in order.
///
/// # Example
/// ```ignore
/// let mock = create_mock_device_with_receives("MOCK0", vec![ScriptedReceive::complete(b"OK\0")]);
/// ```
pub fn create_mock_device_with_receives(
    name: &str,
    receives: Vec<ScriptedReceive>,
) -> MockDevice {
    let mut mock = MockDevice::new(name);
    for receive in receives {
        mock.enqueue_receive(receive);
    }
    mock
}

/// Raw input with only the baud rate set.
pub fn raw_with_baud(baud_rate: i64) -> RawParameters {
    RawParameters {
        baud_rate: Some(baud_rate),
        ..Default::default()
    }
}

/// Validate `raw` against the current-revision table and built-in defaults.
pub fn validated(raw: &RawParameters) -> SerialParameters {
    ParameterCodec::default()
        .validate(raw)
        .expect("test input should validate")
}

/// Raw input with exactly one numeric field set.
pub fn raw_with(field: Field, value: i64) -> RawParameters {
    let mut raw = RawParameters::default();
    let slot = match field {
        Field::BaudRate => &mut raw.baud_rate,
        Field::DataBits => &mut raw.data_bits,
        Field::RcvTimeout => &mut raw.rcv_timeout,
        Field::XmitTimeout => &mut raw.xmit_timeout,
        Field::StopBits => &mut raw.stop_bits,
        Field::RxFifoTrigger => &mut raw.rx_fifo_trigger,
        Field::TxFifoTrigger => &mut raw.tx_fifo_trigger,
        Field::RxFifoDmaTrigger => &mut raw.rx_fifo_dma_trigger,
        Field::TxFifoDmaTrigger => &mut raw.tx_fifo_dma_trigger,
        Field::RxGranularity => &mut raw.rx_gran,
        Field::TxGranularity => &mut raw.tx_gran,
        Field::Parity => panic!("parity is not a numeric field"),
    };
    *slot = Some(value);
    raw
}

/// The legal range of a numeric field under `limits`.
pub fn range_of(limits: &Limits, field: Field) -> RangeInclusive<i64> {
    match field {
        Field::BaudRate => limits.baud_rate.clone(),
        Field::DataBits => limits.data_bits.clone(),
        Field::StopBits => limits.stop_bits.clone(),
        Field::RcvTimeout | Field::XmitTimeout => limits.timeout_ms.clone(),
        Field::Parity => panic!("parity is not a numeric field"),
        _ => limits.fifo.clone(),
    }
}

/// Every field with a numeric range.
pub const NUMERIC_FIELDS: [Field; 11] = [
    Field::BaudRate,
    Field::DataBits,
    Field::RcvTimeout,
    Field::XmitTimeout,
    Field::StopBits,
    Field::RxFifoTrigger,
    Field::TxFifoTrigger,
    Field::RxFifoDmaTrigger,
    Field::TxFifoDmaTrigger,
    Field::RxGranularity,
    Field::TxGranularity,
];
