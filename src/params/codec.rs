//! Validation and wire conversion for line parameters.

use super::error::{Field, ValidationError};
use super::limits::Limits;
use super::types::{Parity, PresentFields, SerialParameters};
use crate::device::WireParams;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Values used for every field the operator does not supply.
///
/// These are validated exactly like operator input, so a bad default in a
/// configuration file is caught before the device is touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterDefaults {
    pub baud_rate: i64,
    pub data_bits: i64,
    pub parity: char,
    pub stop_bits: i64,
    pub rcv_timeout: i64,
    pub xmit_timeout: i64,
    pub rx_fifo_trigger: i64,
    pub tx_fifo_trigger: i64,
    pub dma: bool,
    pub rx_fifo_dma_trigger: i64,
    pub tx_fifo_dma_trigger: i64,
    pub rx_gran: i64,
    pub tx_gran: i64,
}

impl Default for ParameterDefaults {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            data_bits: 8,
            parity: 'n',
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

/// Unvalidated operator input. `None` means "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParameters {
    pub baud_rate: Option<i64>,
    pub data_bits: Option<i64>,
    pub parity: Option<char>,
    pub stop_bits: Option<i64>,
    pub rcv_timeout: Option<i64>,
    pub xmit_timeout: Option<i64>,
    pub rx_fifo_trigger: Option<i64>,
    pub tx_fifo_trigger: Option<i64>,
    pub dma: Option<bool>,
    pub rx_fifo_dma_trigger: Option<i64>,
    pub tx_fifo_dma_trigger: Option<i64>,
    pub rx_gran: Option<i64>,
    pub tx_gran: Option<i64>,
    pub wait_for_xmit: bool,
}

/// Validates operator input and converts parameters to and from the wire.
#[derive(Debug, Clone, Default)]
pub struct ParameterCodec {
    limits: Limits,
    defaults: ParameterDefaults,
}

impl ParameterCodec {
    pub fn new(limits: Limits) -> Self {
        Self {
            limits,
            defaults: ParameterDefaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: ParameterDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Check every field against the range table and build the request.
    ///
    /// Fields missing from `raw` take their configured default but are not
    /// marked present. The first failing field aborts validation.
    pub fn validate(&self, raw: &RawParameters) -> Result<SerialParameters, ValidationError> {
        let d = &self.defaults;
        let l = &self.limits;
        let mut present = PresentFields::empty();

        let mut pick = |value: Option<i64>, default: i64, bit: PresentFields| match value {
            Some(v) => {
                present |= bit;
                v
            }
            None => default,
        };

        let rcv_timeout = pick(raw.rcv_timeout, d.rcv_timeout, PresentFields::RCV_TIMEOUT);
        let xmit_timeout = pick(raw.xmit_timeout, d.xmit_timeout, PresentFields::XMIT_TIMEOUT);
        let baud_rate = pick(raw.baud_rate, d.baud_rate, PresentFields::BAUD_RATE);
        let data_bits = pick(raw.data_bits, d.data_bits, PresentFields::DATA_BITS);
        let stop_bits = pick(raw.stop_bits, d.stop_bits, PresentFields::STOP_BITS);

        let fifo = PresentFields::FIFO_TRIGGER;
        let rx_fifo_trigger = pick(raw.rx_fifo_trigger, d.rx_fifo_trigger, fifo);
        let tx_fifo_trigger = pick(raw.tx_fifo_trigger, d.tx_fifo_trigger, fifo);
        let rx_fifo_dma_trigger = pick(raw.rx_fifo_dma_trigger, d.rx_fifo_dma_trigger, fifo);
        let tx_fifo_dma_trigger = pick(raw.tx_fifo_dma_trigger, d.tx_fifo_dma_trigger, fifo);
        let rx_gran = pick(raw.rx_gran, d.rx_gran, fifo);
        let tx_gran = pick(raw.tx_gran, d.tx_gran, fifo);

        let parity_letter = match raw.parity {
            Some(letter) => {
                present |= PresentFields::PARITY;
                letter
            }
            None => d.parity,
        };
        let dma = match raw.dma {
            Some(dma) => {
                present |= PresentFields::FIFO_TRIGGER;
                dma
            }
            None => d.dma,
        };
        if raw.wait_for_xmit {
            present |= PresentFields::WAIT_FOR_XMIT;
        }

        let rcv_timeout = check(Field::RcvTimeout, rcv_timeout, &l.timeout_ms)?;
        let xmit_timeout = check(Field::XmitTimeout, xmit_timeout, &l.timeout_ms)?;
        let baud_rate = check(Field::BaudRate, baud_rate, &l.baud_rate)?;
        let data_bits = check(Field::DataBits, data_bits, &l.data_bits)?;
        let stop_bits = check(Field::StopBits, stop_bits, &l.stop_bits)?;
        let parity = Parity::from_letter(parity_letter)
            .ok_or(ValidationError::InvalidParity(parity_letter))?;

        Ok(SerialParameters {
            present,
            baud_rate,
            data_bits,
            parity,
            stop_bits,
            rcv_timeout,
            xmit_timeout,
            rx_fifo_trigger: check(Field::RxFifoTrigger, rx_fifo_trigger, &l.fifo)?,
            tx_fifo_trigger: check(Field::TxFifoTrigger, tx_fifo_trigger, &l.fifo)?,
            dma,
            rx_fifo_dma_trigger: check(Field::RxFifoDmaTrigger, rx_fifo_dma_trigger, &l.fifo)?,
            tx_fifo_dma_trigger: check(Field::TxFifoDmaTrigger, tx_fifo_dma_trigger, &l.fifo)?,
            rx_gran: check(Field::RxGranularity, rx_gran, &l.fifo)?,
            tx_gran: check(Field::TxGranularity, tx_gran, &l.fifo)?,
        })
    }

    /// Copy every field and the present-fields bitset into the wire record.
    pub fn encode_for_set(params: &SerialParameters) -> WireParams {
        WireParams {
            flags: params.present.bits(),
            baud_rate: params.baud_rate,
            data_bits: params.data_bits,
            rcv_timeout: params.rcv_timeout,
            xmit_timeout: params.xmit_timeout,
            parity: params.parity.to_wire(),
            stop_bits: params.stop_bits,
            rx_fifo_trigger: params.rx_fifo_trigger,
            tx_fifo_trigger: params.tx_fifo_trigger,
            dma: params.dma,
            rx_fifo_dma_trigger: params.rx_fifo_dma_trigger,
            tx_fifo_dma_trigger: params.tx_fifo_dma_trigger,
            rx_gran: params.rx_gran,
            tx_gran: params.tx_gran,
        }
    }

    /// Decode a full "get" response.
    ///
    /// Unknown parity codes decode to [`Parity::Unknown`] instead of failing.
    /// Unknown flag bits are dropped.
    pub fn decode_get_response(wire: &WireParams) -> SerialParameters {
        SerialParameters {
            present: PresentFields::from_bits_truncate(wire.flags),
            baud_rate: wire.baud_rate,
            data_bits: wire.data_bits,
            parity: Parity::from_wire(wire.parity),
            stop_bits: wire.stop_bits,
            rcv_timeout: wire.rcv_timeout,
            xmit_timeout: wire.xmit_timeout,
            rx_fifo_trigger: wire.rx_fifo_trigger,
            tx_fifo_trigger: wire.tx_fifo_trigger,
            dma: wire.dma,
            rx_fifo_dma_trigger: wire.rx_fifo_dma_trigger,
            tx_fifo_dma_trigger: wire.tx_fifo_dma_trigger,
            rx_gran: wire.rx_gran,
            tx_gran: wire.tx_gran,
        }
    }
}

fn check<T: TryFrom<i64>>(
    field: Field,
    value: i64,
    range: &RangeInclusive<i64>,
) -> Result<T, ValidationError> {
    let out_of_range = || ValidationError::OutOfRange {
        field,
        value,
        min: *range.start(),
        max: *range.end(),
    };
    if !range.contains(&value) {
        return Err(out_of_range());
    }
    T::try_from(value).map_err(|_| out_of_range())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ProtocolRevision;
    use pretty_assertions::assert_eq;

    fn codec() -> ParameterCodec {
        ParameterCodec::default()
    }

    #[test]
    fn test_defaults_only_marks_nothing_present() {
        let params = codec().validate(&RawParameters::default()).unwrap();
        assert_eq!(params.present, PresentFields::empty());
        assert_eq!(params, SerialParameters::default());
    }

    #[test]
    fn test_subset_marks_exact_bits() {
        let raw = RawParameters {
            baud_rate: Some(9600),
            parity: Some('e'),
            ..Default::default()
        };
        let params = codec().validate(&raw).unwrap();
        assert_eq!(params.present, PresentFields::BAUD_RATE | PresentFields::PARITY);
        assert_eq!(params.baud_rate, 9600);
        assert_eq!(params.parity, Parity::Even);
        // Unset fields keep their defaults.
        assert_eq!(params.data_bits, 8);
    }

    #[test]
    fn test_fifo_fields_share_one_bit() {
        let raw = RawParameters {
            rx_gran: Some(4),
            dma: Some(true),
            wait_for_xmit: true,
            ..Default::default()
        };
        let params = codec().validate(&raw).unwrap();
        assert_eq!(
            params.present,
            PresentFields::FIFO_TRIGGER | PresentFields::WAIT_FOR_XMIT
        );
        assert_eq!(params.rx_gran, 4);
        assert!(params.dma);
    }

    #[test]
    fn test_rejects_data_bits_nine() {
        let raw = RawParameters {
            data_bits: Some(9),
            ..Default::default()
        };
        let err = codec().validate(&raw).unwrap_err();
        assert_eq!(err.field(), Field::DataBits);
        assert_eq!(err.range(), Some((5, 8)));
    }

    #[test]
    fn test_legacy_revision_accepts_wide_data_bits() {
        let codec = ParameterCodec::new(Limits::for_revision(ProtocolRevision::Legacy));
        let raw = RawParameters {
            data_bits: Some(64),
            ..Default::default()
        };
        assert_eq!(codec.validate(&raw).unwrap().data_bits, 64);

        let raw = RawParameters {
            data_bits: Some(65),
            ..Default::default()
        };
        assert_eq!(codec.validate(&raw).unwrap_err().range(), Some((1, 64)));
    }

    #[test]
    fn test_rejects_baud_rate_above_max() {
        let raw = RawParameters {
            baud_rate: Some(4_000_000),
            ..Default::default()
        };
        let err = codec().validate(&raw).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: Field::BaudRate,
                value: 4_000_000,
                min: 0,
                max: 3_688_400,
            }
        );
    }

    #[test]
    fn test_rejects_negative_timeout() {
        let raw = RawParameters {
            xmit_timeout: Some(-1),
            ..Default::default()
        };
        assert_eq!(codec().validate(&raw).unwrap_err().field(), Field::XmitTimeout);
    }

    #[test]
    fn test_rejects_unknown_parity_letter() {
        let raw = RawParameters {
            parity: Some('x'),
            ..Default::default()
        };
        assert_eq!(
            codec().validate(&raw).unwrap_err(),
            ValidationError::InvalidParity('x')
        );
    }

    #[test]
    fn test_first_failure_wins() {
        // Timeouts are checked before baud rate.
        let raw = RawParameters {
            baud_rate: Some(-5),
            rcv_timeout: Some(300_001),
            ..Default::default()
        };
        assert_eq!(codec().validate(&raw).unwrap_err().field(), Field::RcvTimeout);
    }

    #[test]
    fn test_bad_default_is_rejected() {
        let codec = codec().with_defaults(ParameterDefaults {
            stop_bits: 0,
            ..Default::default()
        });
        let err = codec.validate(&RawParameters::default()).unwrap_err();
        assert_eq!(err.field(), Field::StopBits);
    }

    #[test]
    fn test_fifo_byte_range() {
        let raw = RawParameters {
            tx_fifo_trigger: Some(256),
            ..Default::default()
        };
        assert_eq!(codec().validate(&raw).unwrap_err().range(), Some((0, 255)));
    }

    #[test]
    fn test_encode_copies_bitset_verbatim() {
        let raw = RawParameters {
            data_bits: Some(7),
            stop_bits: Some(2),
            ..Default::default()
        };
        let params = codec().validate(&raw).unwrap();
        let wire = ParameterCodec::encode_for_set(&params);
        assert_eq!(wire.flags, 0b0010_0010);
        assert_eq!(wire.data_bits, 7);
        assert_eq!(wire.stop_bits, 2);
        assert_eq!(wire.baud_rate, 115_200);
        assert_eq!(wire.rx_fifo_trigger, 16);
        assert_eq!(wire.tx_fifo_trigger, 32);

        let decoded = ParameterCodec::decode_get_response(&wire);
        assert_eq!(decoded.present, PresentFields::DATA_BITS | PresentFields::STOP_BITS);
    }

    #[test]
    fn test_decode_keeps_unknown_parity() {
        let wire = WireParams {
            parity: 9,
            baud_rate: 57_600,
            ..Default::default()
        };
        let params = ParameterCodec::decode_get_response(&wire);
        assert_eq!(params.parity, Parity::Unknown(9));
        assert_eq!(params.baud_rate, 57_600);
    }

    #[test]
    fn test_decode_both_no_parity_codes() {
        for code in [0, 2] {
            let wire = WireParams {
                parity: code,
                ..Default::default()
            };
            assert_eq!(ParameterCodec::decode_get_response(&wire).parity, Parity::None);
        }
    }
}
