use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoisewireError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("Malformed packet: {0}")]
    MalformedPacket(String),

    #[error("Unknown method: {0}. Expected PARITY, 2DPAR, CRC16, HAMMING or CHECKSUM")]
    UnknownMethod(String),

    #[error("Unknown corruption operator: {0}")]
    InvalidOperator(String),

    #[error("Buffer capacity exceeded: length {len} cannot grow past {capacity} bytes")]
    CapacityExceeded { len: usize, capacity: usize },

    #[error("Payload contains the '|' field delimiter at byte {0}")]
    DelimiterConflict(usize),

    #[error("Text must be a single line (line break at byte {0})")]
    EmbeddedNewline(usize),
}

pub type Result<T> = std::result::Result<T, NoisewireError>;
