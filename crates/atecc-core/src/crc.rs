//! Frame checksum used on both command and response packets.

/// Number of checksum bytes trailing every frame.
pub const CRC_BYTES: usize = 2;

/// Computes the chip's 16-bit frame checksum over `data`.
///
/// This is the chip's own shift/xor recurrence, seeded with zero. It is not
/// interchangeable with the common named CRC-16 variants.
#[must_use]
pub const fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    let mut index = 0;
    while index < data.len() {
        let mut reg = crc.swap_bytes();
        reg ^= data[index] as u16;
        reg ^= (reg & 0xFF) >> 4;
        reg ^= reg << 12;
        reg ^= (reg & 0xFF) << 5;
        crc = reg;
        index += 1;
    }
    crc
}

/// Returns the checksum of `data` in wire order (`[lo, hi]`).
#[must_use]
pub const fn crc16_le_bytes(data: &[u8]) -> [u8; CRC_BYTES] {
    crc16(data).to_le_bytes()
}

/// Returns `true` when the trailing two bytes of `frame` carry the checksum
/// of everything before them.
#[must_use]
pub fn frame_crc_matches(frame: &[u8]) -> bool {
    let Some(body_len) = frame.len().checked_sub(CRC_BYTES) else {
        return false;
    };
    let (body, stamp) = frame.split_at(body_len);
    crc16_le_bytes(body).as_slice() == stamp
}
