use crate::cli::corrupt::{forward_packet, Forwarded};
use crate::corrupt::{Corruptor, DEFAULT_CAPACITY};
use crate::error::{NoisewireError, Result};
use crate::frame::max_wire_len;
use rand::Rng;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener};

/// Options for the relay command
#[derive(Debug, Clone)]
pub struct RelayOptions {
    pub bind: String,
    pub port: u16,
    pub seed: Option<u64>,
    pub capacity: usize,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 5000,
            seed: None,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Listen, relay exactly one packet from a sender to a receiver, and return
pub fn run_relay(options: &RelayOptions) -> Result<Forwarded> {
    let listener = TcpListener::bind((options.bind.as_str(), options.port))?;
    tracing::info!(addr = %listener.local_addr()?, "relay listening");
    let mut corruptor = Corruptor::from_seed_option(options.seed);
    serve_once(&listener, &mut corruptor, options.capacity)
}

/// One relay session on an already bound listener.
///
/// The first connection is the sender: its stream is read to end of file and
/// decoded. The read stops once the stream outgrows the longest packet whose
/// payload fits `capacity`. The second connection is the receiver: it gets the
/// corrupted packet and the connection is closed.
pub fn serve_once<R: Rng>(
    listener: &TcpListener,
    corruptor: &mut Corruptor<R>,
    capacity: usize,
) -> Result<Forwarded> {
    tracing::info!("waiting for sender");
    let (mut sender, sender_addr) = listener.accept()?;
    let limit = max_wire_len(capacity);
    let mut wire = Vec::new();
    (&mut sender).take(limit as u64 + 1).read_to_end(&mut wire)?;
    if wire.len() > limit {
        tracing::warn!(peer = %sender_addr, limit, "oversize packet dropped");
        return Err(NoisewireError::CapacityExceeded {
            len: wire.len(),
            capacity: limit,
        });
    }
    tracing::info!(peer = %sender_addr, bytes = wire.len(), "packet received");

    let forwarded = forward_packet(&wire, corruptor, capacity, None)?;

    tracing::info!("waiting for receiver");
    let (mut receiver, receiver_addr) = listener.accept()?;
    let out = forwarded.wire();
    receiver.write_all(&out)?;
    receiver.flush()?;
    receiver.shutdown(Shutdown::Write)?;
    tracing::info!(peer = %receiver_addr, bytes = out.len(), "packet forwarded");

    Ok(forwarded)
}
