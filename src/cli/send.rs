use crate::error::{NoisewireError, Result};
use crate::frame::Packet;
use crate::method::Method;
use std::io::Write;
use std::net::{Shutdown, TcpStream};

/// Options for the send command
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub method: Method,
    /// Relay address (`host:port`); the packet is only built when absent
    pub to: Option<String>,
}

/// Result of a send
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub packet: Packet,
    pub wire: Vec<u8>,
    pub transmitted: bool,
}

/// Build the packet for one line of text
/// A trailing newline (as read from a terminal) is not part of the payload;
/// any other line break is rejected
pub fn build_packet(line: &str, method: Method) -> Result<Packet> {
    let text = line
        .strip_suffix('\n')
        .map(|t| t.strip_suffix('\r').unwrap_or(t))
        .unwrap_or(line);
    if let Some(pos) = text.find(['\n', '\r']) {
        return Err(NoisewireError::EmbeddedNewline(pos));
    }
    Packet::build(text.as_bytes(), method)
}

/// Encode a line and, when an address is configured, deliver it to the relay
pub fn send_line(line: &str, options: &SendOptions) -> Result<SendOutcome> {
    let packet = build_packet(line, options.method)?;
    let wire = packet.to_wire()?;
    tracing::debug!(method = %packet.method, code = %packet.redundancy, "packet built");

    let transmitted = match &options.to {
        Some(addr) => {
            transmit(addr, &wire)?;
            true
        }
        None => false,
    };

    Ok(SendOutcome {
        packet,
        wire,
        transmitted,
    })
}

/// Deliver one packet on its own connection and close the write side
pub fn transmit(addr: &str, wire: &[u8]) -> Result<()> {
    let mut stream = TcpStream::connect(addr)?;
    stream.write_all(wire)?;
    stream.flush()?;
    stream.shutdown(Shutdown::Write)?;
    tracing::info!(%addr, bytes = wire.len(), "packet transmitted");
    Ok(())
}
