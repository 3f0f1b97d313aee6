// Licensed under the Apache-2.0 license

//! Legacy integrity algorithms used by the NVRAM image.

/// Two's-complement negation of the byte sum.
///
/// Adding the result to the sum of `data` yields zero modulo 256.
pub fn checksum8(data: &[u8]) -> u8 {
    let sum = data.iter().fold(0u8, |acc, &byte| acc.wrapping_add(byte));
    (sum ^ 0xff).wrapping_add(1)
}

/// CRC-32/ISO-HDLC (reflected polynomial 0xEDB88320, init and final XOR
/// 0xFFFFFFFF).
pub fn crc32(data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Swaps the four bytes of `value`.
///
/// The image stores CRC-32 results in the opposite byte order from the rest
/// of its big-endian fields.
pub fn reverse_bytes32(value: u32) -> u32 {
    value.swap_bytes()
}
