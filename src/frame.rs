//! Packet framing.
//!
//! # Wire Format
//!
//! ```text
//! <payload>|<METHOD>|<REDUNDANCY-HEX>
//! ```
//!
//! Fields are joined by a single `|` with no escaping and no length prefix.
//! The transport is expected to preserve message boundaries (one packet per
//! connection). Peers may append a NUL terminator; [`decode`] drops one.
//!
//! A sender must not put `|` in the payload ([`encode`] rejects it). Once the
//! payload has crossed the noisy channel it may contain anything, so the relay
//! forwards it with [`encode_unchecked`].

use crate::error::{NoisewireError, Result};
use crate::method::Method;
use crate::redundancy::encode_hex;

/// Field separator
pub const DELIMITER: u8 = b'|';

/// Optional trailing terminator accepted on decode
pub const TERMINATOR: u8 = 0;

/// Longest wire buffer a well-formed packet can occupy when its payload is at
/// most `payload_capacity` bytes (widest tag and code, plus a terminator)
pub fn max_wire_len(payload_capacity: usize) -> usize {
    let fields = Method::ALL
        .iter()
        .map(|m| m.as_str().len() + 2 * m.redundancy_len(payload_capacity))
        .max()
        .unwrap_or(0);
    payload_capacity + fields + 3
}

/// A decoded packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub payload: Vec<u8>,
    pub method: Method,
    /// Redundancy code as transmitted (uppercase hex from a well-behaved sender)
    pub redundancy: String,
}

impl Packet {
    /// Compute the redundancy code for `payload` and wrap both in a packet
    pub fn build(payload: &[u8], method: Method) -> Result<Self> {
        check_payload(payload)?;
        Ok(Self {
            payload: payload.to_vec(),
            method,
            redundancy: encode_hex(method, payload),
        })
    }

    /// Serialize for a sender; fails if the payload holds the delimiter
    pub fn to_wire(&self) -> Result<Vec<u8>> {
        encode(&self.payload, self.method, &self.redundancy)
    }

    /// Serialize without validating the payload
    pub fn to_wire_unchecked(&self) -> Vec<u8> {
        encode_unchecked(&self.payload, self.method, &self.redundancy)
    }

    pub fn from_wire(wire: &[u8]) -> Result<Self> {
        decode(wire)
    }

    /// Same packet with a different payload; method and code are carried as is
    pub fn with_payload(&self, payload: Vec<u8>) -> Self {
        Self {
            payload,
            method: self.method,
            redundancy: self.redundancy.clone(),
        }
    }

    /// Payload as text, replacing invalid UTF-8
    pub fn payload_lossy(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

fn check_payload(payload: &[u8]) -> Result<()> {
    match payload.iter().position(|&b| b == DELIMITER) {
        Some(pos) => Err(NoisewireError::DelimiterConflict(pos)),
        None => Ok(()),
    }
}

/// Join payload, method tag and redundancy hex with `|`
pub fn encode(payload: &[u8], method: Method, redundancy_hex: &str) -> Result<Vec<u8>> {
    check_payload(payload)?;
    Ok(encode_unchecked(payload, method, redundancy_hex))
}

/// Join the fields without checking the payload for delimiters
pub fn encode_unchecked(payload: &[u8], method: Method, redundancy_hex: &str) -> Vec<u8> {
    let tag = method.as_str().as_bytes();
    let mut wire = Vec::with_capacity(payload.len() + tag.len() + redundancy_hex.len() + 2);
    wire.extend_from_slice(payload);
    wire.push(DELIMITER);
    wire.extend_from_slice(tag);
    wire.push(DELIMITER);
    wire.extend_from_slice(redundancy_hex.as_bytes());
    wire
}

/// Split a wire buffer on its first two delimiters
pub fn decode(wire: &[u8]) -> Result<Packet> {
    let wire = wire.strip_suffix(&[TERMINATOR]).unwrap_or(wire);

    let first = wire
        .iter()
        .position(|&b| b == DELIMITER)
        .ok_or_else(|| NoisewireError::MalformedPacket("no field delimiter".into()))?;
    let rest = &wire[first + 1..];
    let second = rest
        .iter()
        .position(|&b| b == DELIMITER)
        .ok_or_else(|| NoisewireError::MalformedPacket("missing redundancy field".into()))?;

    let payload = wire[..first].to_vec();
    let tag = &rest[..second];
    let method = match std::str::from_utf8(tag) {
        Ok(tag) => Method::from_tag(tag)?,
        Err(_) => {
            return Err(NoisewireError::UnknownMethod(
                String::from_utf8_lossy(tag).into_owned(),
            ))
        }
    };
    let redundancy = std::str::from_utf8(&rest[second + 1..])
        .map_err(|_| NoisewireError::MalformedPacket("redundancy field is not text".into()))?
        .to_string();

    Ok(Packet {
        payload,
        method,
        redundancy,
    })
}
