/// RFC 1071 Internet checksum.
///
/// Big-endian 16-bit words are summed with end-around carry. An odd trailing
/// byte is the high half of a zero-padded word. The result is the one's
/// complement of the folded sum.
pub fn internet_checksum(data: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    let mut words = data.chunks_exact(2);
    for word in &mut words {
        sum += u32::from(u16::from_be_bytes([word[0], word[1]]));
        sum = fold_carry(sum);
    }
    if let [last] = words.remainder() {
        sum += u32::from(*last) << 8;
        sum = fold_carry(sum);
    }
    !(sum as u16)
}

fn fold_carry(sum: u32) -> u32 {
    if sum & 0x1_0000 != 0 {
        (sum & 0xFFFF) + 1
    } else {
        sum
    }
}
