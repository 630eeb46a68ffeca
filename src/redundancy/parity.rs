/// Even parity per byte: 0x01 when the byte has an odd number of set bits,
/// 0x00 otherwise
pub fn parity_bytes(data: &[u8]) -> Vec<u8> {
    data.iter().map(|&b| (b.count_ones() % 2) as u8).collect()
}
