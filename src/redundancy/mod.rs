//! Redundancy encoders.
//!
//! Every encoder is a pure function from payload bytes to redundancy bytes.
//! [`compute`] dispatches on [`Method`]; [`encode_hex`] renders the result for
//! the wire.

pub mod checksum;
pub mod crc16;
pub mod hamming;
pub mod parity;
pub mod two_d;

pub use checksum::*;
pub use crc16::*;
pub use hamming::*;
pub use parity::*;
pub use two_d::*;

use crate::hex_codec::to_hex;
use crate::method::Method;

/// Compute the redundancy bytes for `payload` under `method`
pub fn compute(method: Method, payload: &[u8]) -> Vec<u8> {
    match method {
        Method::Parity => parity_bytes(payload),
        Method::TwoDParity => two_d_parity(payload),
        Method::Crc16 => crc16_ccitt(payload).to_be_bytes().to_vec(),
        Method::Hamming => hamming_encode(payload),
        Method::Checksum => internet_checksum(payload).to_be_bytes().to_vec(),
    }
}

/// Compute the redundancy code and render it as uppercase hex
pub fn encode_hex(method: Method, payload: &[u8]) -> String {
    to_hex(&compute(method, payload))
}
