use crate::corrupt::{ChannelBuffer, CorruptionReport, Corruptor, OperatorKind, DEFAULT_CAPACITY};
use crate::error::Result;
use crate::frame::Packet;
use rand::Rng;
use serde::Serialize;

/// Options for the corrupt command
#[derive(Debug, Clone)]
pub struct CorruptOptions {
    /// Seed for reproducible noise; OS entropy when absent
    pub seed: Option<u64>,
    pub capacity: usize,
    /// Fixed operator sequence instead of a random draw
    pub operators: Option<Vec<OperatorKind>>,
}

impl Default for CorruptOptions {
    fn default() -> Self {
        Self {
            seed: None,
            capacity: DEFAULT_CAPACITY,
            operators: None,
        }
    }
}

/// A packet as received and as forwarded after corruption
#[derive(Debug, Clone)]
pub struct Forwarded {
    pub received: Packet,
    pub forwarded: Packet,
    pub report: CorruptionReport,
}

impl Forwarded {
    /// Bytes to send downstream
    pub fn wire(&self) -> Vec<u8> {
        self.forwarded.to_wire_unchecked()
    }

    /// JSON description of what the channel did
    pub fn to_json(&self) -> Result<String> {
        let view = ForwardedJson {
            method: self.received.method.to_string(),
            redundancy: &self.received.redundancy,
            original: self.received.payload_lossy(),
            corrupted: self.forwarded.payload_lossy(),
            report: &self.report,
        };
        Ok(serde_json::to_string_pretty(&view)?)
    }
}

#[derive(Serialize)]
struct ForwardedJson<'a> {
    method: String,
    redundancy: &'a str,
    original: String,
    corrupted: String,
    report: &'a CorruptionReport,
}

/// Decode a packet, corrupt its payload and re-frame it with the original
/// method and redundancy code
pub fn forward_packet<R: Rng>(
    wire: &[u8],
    corruptor: &mut Corruptor<R>,
    capacity: usize,
    operators: Option<&[OperatorKind]>,
) -> Result<Forwarded> {
    let received = Packet::from_wire(wire)?;
    let mut buffer = ChannelBuffer::new(received.payload.clone(), capacity)?;
    let report = match operators {
        Some(kinds) => corruptor.apply(&mut buffer, kinds),
        None => corruptor.corrupt(&mut buffer),
    };
    tracing::info!(
        method = %received.method,
        operators = %report.summary(),
        before = report.original_len,
        after = report.final_len,
        "payload corrupted"
    );
    let forwarded = received.with_payload(buffer.into_bytes());
    Ok(Forwarded {
        received,
        forwarded,
        report,
    })
}

/// Offline relay: corrupt one packet held in memory
pub fn corrupt_packet(wire: &[u8], options: &CorruptOptions) -> Result<Forwarded> {
    let mut corruptor = Corruptor::from_seed_option(options.seed);
    forward_packet(
        wire,
        &mut corruptor,
        options.capacity,
        options.operators.as_deref(),
    )
}
