/// Initial register value
pub const CRC16_INIT: u16 = 0xFFFF;
/// Generator polynomial x^16 + x^12 + x^5 + 1
pub const CRC16_POLY: u16 = 0x1021;

/// CRC-16/CCITT-FALSE: MSB-first, no reflection, no final XOR
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc = CRC16_INIT;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ CRC16_POLY;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}
