//! Helper for computing cyclic redundancy checks.
//!
//! Packets are protected by CRC-16/ARC: polynomial `0x8005` applied to each
//! byte least significant bit first (the reflected form `0xA001`), with the
//! register starting at zero and no final XOR.

/// Reflected form of the `0x8005` generator polynomial.
const POLYNOMIAL: u16 = 0xA001;

const CRC_TABLE: [u16; 256] = build_table();

const fn build_table() -> [u16; 256] {
    let mut table = [0; 256];
    let mut i = 0;

    while i < 256 {
        let mut crc = i as u16;
        let mut bit = 0;

        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ POLYNOMIAL
            } else {
                crc >> 1
            };
            bit += 1;
        }

        table[i] = crc;
        i += 1;
    }

    table
}

/// Compute the cyclic redundancy check value of a slice of bytes.
pub fn compute_crc(r: &[u8]) -> u16 {
    r.iter().fold(0, |acc, b| crc_byte(acc, *b))
}

/// Accumulate a single byte into a cyclic redundancy check value.
fn crc_byte(crc: u16, b: u8) -> u16 {
    (crc >> 8) ^ CRC_TABLE[((crc ^ b as u16) & 0xFF) as usize]
}
