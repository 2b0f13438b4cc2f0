//! Human-readable and JSON rendering of outcomes.

use crate::command::Outcome;
use crate::message::{ReceiveOutcome, TransferResult};
use crate::params::{PresentFields, SerialParameters};
use serde_json::{json, Value};
use std::fmt::Write;

/// Render `outcome` the way the operator sees it on stdout.
pub fn render_text(outcome: &Outcome) -> String {
    let mut out = String::new();
    match outcome {
        Outcome::Set(params) => {
            out.push_str("Going to SET:\n");
            write_present(&mut out, params);
        }
        Outcome::Got(params) => {
            out.push_str("GOT:\n");
            write_all(&mut out, params);
        }
        Outcome::Cleared => out.push_str("RX buffer cleared.\n"),
        Outcome::Transfer(TransferResult::Sent { written, requested }) => {
            let _ = writeln!(out, "WRITTEN = {written}");
            let _ = writeln!(out, "REQUESTED = {requested}");
        }
        Outcome::Transfer(TransferResult::Received(received)) => {
            write_received(&mut out, received);
        }
    }
    out
}

/// Render `outcome` as a JSON document.
pub fn render_json(outcome: &Outcome) -> Value {
    match outcome {
        Outcome::Set(params) => json!({
            "operation": "set",
            "applied": present_json(params),
        }),
        Outcome::Got(params) => json!({
            "operation": "get",
            "parameters": params_json(params),
        }),
        Outcome::Cleared => json!({ "operation": "clear_rx_buffer" }),
        Outcome::Transfer(TransferResult::Sent { written, requested }) => json!({
            "operation": "send",
            "written": written,
            "requested": requested,
        }),
        Outcome::Transfer(TransferResult::Received(received)) => json!({
            "operation": "receive",
            "data": String::from_utf8_lossy(&received.payload),
            "bytes": received.payload.len(),
            "missing": received.missing,
            "timed_out": received.timed_out,
            "inconsistent": received.is_inconsistent(),
        }),
    }
}

fn write_all(out: &mut String, p: &SerialParameters) {
    let _ = writeln!(out, "BAUDRATE = {}", p.baud_rate);
    let _ = writeln!(out, "DATABITS = {}", p.data_bits);
    let _ = writeln!(out, "RCV_TIMEOUT = {}", p.rcv_timeout);
    let _ = writeln!(out, "XMIT_TIMEOUT = {}", p.xmit_timeout);
    let _ = writeln!(out, "PARITY = {}", p.parity);
    let _ = writeln!(out, "STOPBITS = {}", p.stop_bits);
    write_fifo(out, p);
}

/// Unset fields are never shown.
fn write_present(out: &mut String, p: &SerialParameters) {
    if p.is_present(PresentFields::BAUD_RATE) {
        let _ = writeln!(out, "BAUDRATE = {}", p.baud_rate);
    }
    if p.is_present(PresentFields::DATA_BITS) {
        let _ = writeln!(out, "DATABITS = {}", p.data_bits);
    }
    if p.is_present(PresentFields::RCV_TIMEOUT) {
        let _ = writeln!(out, "RCV_TIMEOUT = {}", p.rcv_timeout);
    }
    if p.is_present(PresentFields::XMIT_TIMEOUT) {
        let _ = writeln!(out, "XMIT_TIMEOUT = {}", p.xmit_timeout);
    }
    if p.is_present(PresentFields::PARITY) {
        let _ = writeln!(out, "PARITY = {}", p.parity);
    }
    if p.is_present(PresentFields::STOP_BITS) {
        let _ = writeln!(out, "STOPBITS = {}", p.stop_bits);
    }
    if p.is_present(PresentFields::FIFO_TRIGGER) {
        write_fifo(out, p);
    }
    if p.is_present(PresentFields::WAIT_FOR_XMIT) {
        out.push_str("WAIT_FOR_XMIT = 1\n");
    }
}

fn write_fifo(out: &mut String, p: &SerialParameters) {
    let _ = writeln!(out, "RX_FIFO_TRIGGER = {}", p.rx_fifo_trigger);
    let _ = writeln!(out, "TX_FIFO_TRIGGER = {}", p.tx_fifo_trigger);
    let _ = writeln!(out, "DMA = {}", u8::from(p.dma));
    let _ = writeln!(out, "RX_FIFO_DMA_TRIGGER = {}", p.rx_fifo_dma_trigger);
    let _ = writeln!(out, "TX_FIFO_DMA_TRIGGER = {}", p.tx_fifo_dma_trigger);
    let _ = writeln!(out, "RX_GRANULARITY = {}", p.rx_gran);
    let _ = writeln!(out, "TX_GRANULARITY = {}", p.tx_gran);
}

fn write_received(out: &mut String, received: &ReceiveOutcome) {
    let _ = writeln!(out, "RECEIVED = {}", String::from_utf8_lossy(&received.payload));
    let _ = writeln!(out, "BYTES = {}", received.payload.len());
    if received.is_partial() {
        let _ = writeln!(out, "TIMED OUT, MISSING = {}", received.missing);
    }
    if received.is_inconsistent() {
        out.push_str("WARNING: device filled more of the buffer than was requested\n");
    }
}

fn params_json(p: &SerialParameters) -> Value {
    json!({
        "baud_rate": p.baud_rate,
        "data_bits": p.data_bits,
        "rcv_timeout": p.rcv_timeout,
        "xmit_timeout": p.xmit_timeout,
        "parity": p.parity.to_string(),
        "stop_bits": p.stop_bits,
        "rx_fifo_trigger": p.rx_fifo_trigger,
        "tx_fifo_trigger": p.tx_fifo_trigger,
        "dma": p.dma,
        "rx_fifo_dma_trigger": p.rx_fifo_dma_trigger,
        "tx_fifo_dma_trigger": p.tx_fifo_dma_trigger,
        "rx_gran": p.rx_gran,
        "tx_gran": p.tx_gran,
    })
}

fn present_json(p: &SerialParameters) -> Value {
    let all = params_json(p);
    let mut applied = serde_json::Map::new();
    let mut keep = |key: &str| {
        if let Some(value) = all.get(key) {
            applied.insert(key.to_string(), value.clone());
        }
    };
    let groups: [(PresentFields, &[&str]); 7] = [
        (PresentFields::BAUD_RATE, &["baud_rate"]),
        (PresentFields::DATA_BITS, &["data_bits"]),
        (PresentFields::RCV_TIMEOUT, &["rcv_timeout"]),
        (PresentFields::XMIT_TIMEOUT, &["xmit_timeout"]),
        (PresentFields::PARITY, &["parity"]),
        (PresentFields::STOP_BITS, &["stop_bits"]),
        (
            PresentFields::FIFO_TRIGGER,
            &[
                "rx_fifo_trigger",
                "tx_fifo_trigger",
                "dma",
                "rx_fifo_dma_trigger",
                "tx_fifo_dma_trigger",
                "rx_gran",
                "tx_gran",
            ],
        ),
    ];
    for (bit, keys) in groups {
        if p.is_present(bit) {
            for &key in keys {
                keep(key);
            }
        }
    }
    if p.is_present(PresentFields::WAIT_FOR_XMIT) {
        applied.insert("wait_for_xmit".to_string(), Value::Bool(true));
    }
    Value::Object(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Parity;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_shows_only_present_fields() {
        let mut params = SerialParameters::default();
        params.present = PresentFields::BAUD_RATE | PresentFields::PARITY;
        params.baud_rate = 9600;
        params.parity = Parity::Odd;

        assert_eq!(
            render_text(&Outcome::Set(params)),
            "Going to SET:\nBAUDRATE = 9600\nPARITY = ODD\n"
        );
    }

    #[test]
    fn test_get_shows_every_field() {
        let mut params = SerialParameters::default();
        params.parity = Parity::Unknown(6);
        let text = render_text(&Outcome::Got(params));
        assert!(text.starts_with("GOT:\nBAUDRATE = 115200\n"));
        assert!(text.contains("PARITY = UNKNOWN (6)\n"));
        assert!(text.contains("TX_FIFO_TRIGGER = 32\n"));
        assert!(text.ends_with("TX_GRANULARITY = 0\n"));
    }

    #[test]
    fn test_partial_receive_text() {
        let outcome = Outcome::Transfer(TransferResult::Received(ReceiveOutcome {
            payload: b"abcd".to_vec(),
            missing: 5,
            timed_out: true,
        }));
        assert_eq!(
            render_text(&outcome),
            "RECEIVED = abcd\nBYTES = 4\nTIMED OUT, MISSING = 5\n"
        );
    }

    #[test]
    fn test_inconsistent_receive_is_flagged() {
        let outcome = Outcome::Transfer(TransferResult::Received(ReceiveOutcome {
            payload: b"wxyz".to_vec(),
            missing: -1,
            timed_out: true,
        }));
        assert!(render_text(&outcome).contains("WARNING"));
        assert_eq!(render_json(&outcome)["inconsistent"], json!(true));
    }

    #[test]
    fn test_set_json_lists_applied_fields() {
        let mut params = SerialParameters::default();
        params.present = PresentFields::STOP_BITS | PresentFields::WAIT_FOR_XMIT;
        params.stop_bits = 2;

        let value = render_json(&Outcome::Set(params));
        assert_eq!(
            value,
            json!({
                "operation": "set",
                "applied": { "stop_bits": 2, "wait_for_xmit": true },
            })
        );
    }

    #[test]
    fn test_send_json() {
        let outcome = Outcome::Transfer(TransferResult::Sent {
            written: 3,
            requested: 6,
        });
        assert_eq!(render_json(&outcome)["written"], json!(3));
        assert_eq!(render_text(&outcome), "WRITTEN = 3\nREQUESTED = 6\n");
    }
}
