//! Noisewire - redundancy codes over a deliberately noisy channel
//!
//! A sender protects one line of text with a redundancy code, a relay corrupts
//! the text in transit while leaving the code attached, and a receiver can then
//! check how well each scheme notices (or repairs) the damage.
//!
//! ## Packet Path
//!
//! ```text
//! Text → Encode → Frame → [transport] → Unframe → Corrupt → Frame → [transport] → Receiver
//! ```
//!
//! - **Encode**: PARITY, 2DPAR, CRC16, HAMMING or CHECKSUM over the payload bytes
//! - **Frame**: `payload|METHOD|HEXCODE`, hex in uppercase
//! - **Corrupt**: 1-3 of seven noise operators, payload only; the code is never
//!   recomputed
//!
//! ## Example
//!
//! ```
//! use noisewire::corrupt::{ChannelBuffer, Corruptor};
//! use noisewire::frame::{decode, Packet};
//! use noisewire::method::Method;
//!
//! let packet = Packet::build(b"HELLO", Method::Crc16).unwrap();
//! assert_eq!(packet.to_wire().unwrap(), b"HELLO|CRC16|49D6");
//!
//! let received = decode(&packet.to_wire().unwrap()).unwrap();
//! let mut buffer = ChannelBuffer::with_default_capacity(received.payload.clone()).unwrap();
//! Corruptor::seeded(7).corrupt(&mut buffer);
//! let forwarded = received.with_payload(buffer.into_bytes());
//! assert_eq!(forwarded.redundancy, "49D6");
//! ```

pub mod cli;
pub mod corrupt;
pub mod error;
pub mod frame;
pub mod hex_codec;
pub mod method;
pub mod redundancy;

pub use error::{NoisewireError, Result};
pub use frame::Packet;
pub use method::Method;
