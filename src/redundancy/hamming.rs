/// Encode one 4-bit nibble as a Hamming(7,4) codeword.
///
/// Bit layout (LSB first): p1 p2 d0 p4 d1 d2 d3, bit 7 unused.
pub fn hamming74_encode_nibble(nibble: u8) -> u8 {
    let d0 = nibble & 1;
    let d1 = (nibble >> 1) & 1;
    let d2 = (nibble >> 2) & 1;
    let d3 = (nibble >> 3) & 1;
    let p1 = d0 ^ d1 ^ d3;
    let p2 = d0 ^ d2 ^ d3;
    let p4 = d1 ^ d2 ^ d3;
    p1 | (p2 << 1) | (d0 << 2) | (p4 << 3) | (d1 << 4) | (d2 << 5) | (d3 << 6)
}

/// Hamming(7,4) over every nibble, high nibble first, one codeword per byte
pub fn hamming_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() * 2);
    for &b in data {
        out.push(hamming74_encode_nibble(b >> 4));
        out.push(hamming74_encode_nibble(b & 0x0F));
    }
    out
}
