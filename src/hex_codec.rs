use crate::error::Result;

/// Render bytes as uppercase hex, two digits per byte, no separators
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Parse a hex string (either case) back into bytes
pub fn from_hex(text: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(text)?)
}
