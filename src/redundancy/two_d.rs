/// Bytes per row of the parity grid
pub const ROW_WIDTH: usize = 8;

/// Two-dimensional parity.
///
/// The payload is laid out in rows of [`ROW_WIDTH`] bytes. Each row yields the
/// XOR of its bytes (a short final row XORs only what is present), followed by
/// one overall byte: the XOR of every row byte.
pub fn two_d_parity(data: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = data
        .chunks(ROW_WIDTH)
        .map(|row| row.iter().fold(0u8, |acc, &b| acc ^ b))
        .collect();
    let overall = out.iter().fold(0u8, |acc, &b| acc ^ b);
    out.push(overall);
    out
}
