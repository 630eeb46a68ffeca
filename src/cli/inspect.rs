use crate::error::Result;
use crate::frame::decode;
use crate::hex_codec::from_hex;
use crate::method::Method;
use serde::Serialize;

/// Options for the inspect command
#[derive(Debug, Clone, Default)]
pub struct InspectOptions {
    pub json: bool,
}

/// Field-level description of a packet
#[derive(Debug, Clone, Serialize)]
pub struct PacketReport {
    pub payload: String,
    pub payload_len: usize,
    pub method: Method,
    pub redundancy: String,
    /// Decoded byte length of the code, `None` when it is not valid hex
    pub redundancy_len: Option<usize>,
    pub expected_redundancy_len: usize,
}

impl PacketReport {
    /// Whether the code has the length the method produces for this payload
    pub fn length_consistent(&self) -> bool {
        self.redundancy_len == Some(self.expected_redundancy_len)
    }
}

pub fn inspect_packet(wire: &[u8]) -> Result<PacketReport> {
    let packet = decode(wire)?;
    let redundancy_len = from_hex(&packet.redundancy).ok().map(|bytes| bytes.len());
    Ok(PacketReport {
        payload: packet.payload_lossy(),
        payload_len: packet.payload.len(),
        method: packet.method,
        expected_redundancy_len: packet.method.redundancy_len(packet.payload.len()),
        redundancy: packet.redundancy,
        redundancy_len,
    })
}

/// Render a packet description as text or JSON
pub fn show_packet(wire: &[u8], options: &InspectOptions) -> Result<String> {
    let report = inspect_packet(wire)?;
    if options.json {
        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n');
        return Ok(json);
    }

    let mut output = String::new();
    output.push_str("Packet\n");
    output.push_str("======\n\n");
    output.push_str(&format!("Payload: {}\n", report.payload));
    output.push_str(&format!("Payload length: {} bytes\n", report.payload_len));
    output.push_str(&format!("Method: {}\n", report.method));
    output.push_str(&format!("Redundancy: {}\n", report.redundancy));
    match report.redundancy_len {
        Some(len) => output.push_str(&format!("Redundancy length: {} bytes\n", len)),
        None => output.push_str("Redundancy length: not valid hex\n"),
    }
    output.push_str(&format!(
        "Expected length: {} bytes ({})\n",
        report.expected_redundancy_len,
        if report.length_consistent() {
            "consistent"
        } else {
            "mismatch"
        }
    ));
    Ok(output)
}
