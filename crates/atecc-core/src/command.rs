//! Command opcodes and the buffered command-frame view.
//!
//! A buffered frame has the word-address marker already stripped:
//!
//! ```text
//! [count, opcode, param1, param2_lo, param2_hi, payload..., crc_lo, crc_hi]
//! ```
//!
//! `count` covers every byte of the frame, and the CRC covers `count`
//! through the end of the payload.

use crate::{
    crc16_le_bytes, frame_crc_matches, ErrorCode, WordAddress, CRC_BYTES, MAX_PACKET_BYTES,
};

/// Bytes preceding the payload: count, opcode, param1 and the two param2 bytes.
pub const FRAME_HEADER_BYTES: usize = 5;
/// Smallest well-formed frame: header plus checksum.
pub const MIN_FRAME_BYTES: usize = FRAME_HEADER_BYTES + CRC_BYTES;
/// Largest payload that still fits in the inbound buffer.
pub const MAX_PAYLOAD_BYTES: usize = MAX_PACKET_BYTES - MIN_FRAME_BYTES;

/// Command opcodes understood by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Opcode {
    Read = 0x02,
    Write = 0x12,
    Nonce = 0x16,
    Lock = 0x17,
    Random = 0x1B,
    Info = 0x30,
    GenKey = 0x40,
    Sign = 0x41,
    Verify = 0x45,
}

impl Opcode {
    /// Every opcode in wire-value order.
    pub const ALL: [Self; 9] = [
        Self::Read,
        Self::Write,
        Self::Nonce,
        Self::Lock,
        Self::Random,
        Self::Info,
        Self::GenKey,
        Self::Sign,
        Self::Verify,
    ];

    /// Decodes an opcode byte.
    #[must_use]
    pub const fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x02 => Some(Self::Read),
            0x12 => Some(Self::Write),
            0x16 => Some(Self::Nonce),
            0x17 => Some(Self::Lock),
            0x1B => Some(Self::Random),
            0x30 => Some(Self::Info),
            0x40 => Some(Self::GenKey),
            0x41 => Some(Self::Sign),
            0x45 => Some(Self::Verify),
            _ => None,
        }
    }

    /// Returns the wire value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Read-only view over a buffered command frame.
///
/// Fields past the end of a short frame read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame<'a> {
    bytes: &'a [u8],
}

impl<'a> CommandFrame<'a> {
    /// Wraps buffered frame bytes.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    const fn byte(&self, index: usize) -> u8 {
        if index < self.bytes.len() {
            self.bytes[index]
        } else {
            0
        }
    }

    /// Raw frame bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Declared frame length.
    #[must_use]
    pub const fn count(&self) -> u8 {
        self.byte(0)
    }

    /// Raw opcode byte.
    #[must_use]
    pub const fn opcode_byte(&self) -> u8 {
        self.byte(1)
    }

    /// Decoded opcode, if it is in the command table.
    #[must_use]
    pub const fn opcode(&self) -> Option<Opcode> {
        Opcode::from_u8(self.opcode_byte())
    }

    /// First command parameter.
    #[must_use]
    pub const fn param1(&self) -> u8 {
        self.byte(2)
    }

    /// Second command parameter, little-endian on the wire.
    #[must_use]
    pub const fn param2(&self) -> u16 {
        u16::from_le_bytes([self.byte(3), self.byte(4)])
    }

    /// Bytes between the header and the checksum.
    #[must_use]
    pub fn payload(&self) -> &'a [u8] {
        let end = self.bytes.len().saturating_sub(CRC_BYTES);
        self.bytes.get(FRAME_HEADER_BYTES..end).unwrap_or(&[])
    }

    /// Returns `true` when the trailing checksum matches the frame body.
    #[must_use]
    pub fn crc_matches(&self) -> bool {
        frame_crc_matches(self.bytes)
    }
}

/// Builds a buffered frame (no marker) with a stamped checksum.
///
/// # Errors
///
/// Returns [`ErrorCode::LengthError`] when `payload` exceeds
/// [`MAX_PAYLOAD_BYTES`].
pub fn build_frame(
    opcode: u8,
    param1: u8,
    param2: u16,
    payload: &[u8],
) -> Result<Vec<u8>, ErrorCode> {
    if payload.len() > MAX_PAYLOAD_BYTES {
        return Err(ErrorCode::LengthError);
    }
    let count =
        u8::try_from(MIN_FRAME_BYTES + payload.len()).map_err(|_| ErrorCode::LengthError)?;
    let [p2_lo, p2_hi] = param2.to_le_bytes();

    let mut frame = Vec::with_capacity(usize::from(count));
    frame.extend_from_slice(&[count, opcode, param1, p2_lo, p2_hi]);
    frame.extend_from_slice(payload);
    let stamp = crc16_le_bytes(&frame);
    frame.extend_from_slice(&stamp);
    Ok(frame)
}

/// Builds the full bus write for a command: the command word address
/// followed by a stamped frame.
///
/// # Errors
///
/// Returns [`ErrorCode::LengthError`] when `payload` exceeds
/// [`MAX_PAYLOAD_BYTES`].
pub fn encode_command(
    opcode: u8,
    param1: u8,
    param2: u16,
    payload: &[u8],
) -> Result<Vec<u8>, ErrorCode> {
    let frame = build_frame(opcode, param1, param2, payload)?;
    let mut wire = Vec::with_capacity(frame.len() + 1);
    wire.push(WordAddress::Command.as_u8());
    wire.extend_from_slice(&frame);
    Ok(wire)
}
