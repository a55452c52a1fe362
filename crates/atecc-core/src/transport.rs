//! Byte-at-a-time transport: inbound frame accumulation and outbound
//! response draining.
//!
//! Both buffers have fixed hardware capacity. Overflowing the inbound buffer
//! drops bytes silently and reading past the response buffer yields zeros;
//! neither is reported as an error.

use crate::WordAddress;

/// Capacity of the inbound frame buffer and the response buffer.
pub const MAX_PACKET_BYTES: usize = 128;

/// Framer phase between bus bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FramerPhase {
    /// Next byte is a word address.
    #[default]
    AwaitingMarker,
    /// Bytes are appended to the current frame.
    Accumulating,
}

/// What a single inbound byte did to the framer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedOutcome {
    /// Command word address seen; a new frame starts empty.
    FrameStarted,
    /// A non-command word address was consumed.
    ControlWord(WordAddress),
    /// Byte was not a word address and no frame was open.
    Ignored,
    /// Byte appended; the frame is still short of its declared count.
    Buffered,
    /// Buffer full; byte discarded.
    Dropped,
    /// Byte appended and the frame reached its declared count.
    FrameComplete,
}

/// Inbound frame accumulator. The word-address marker is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundFramer {
    buffer: [u8; MAX_PACKET_BYTES],
    len: usize,
    phase: FramerPhase,
}

impl Default for InboundFramer {
    fn default() -> Self {
        Self {
            buffer: [0; MAX_PACKET_BYTES],
            len: 0,
            phase: FramerPhase::AwaitingMarker,
        }
    }
}

impl InboundFramer {
    /// Feeds one bus byte.
    pub fn feed(&mut self, byte: u8) -> FeedOutcome {
        match self.phase {
            FramerPhase::AwaitingMarker => match WordAddress::from_u8(byte) {
                Some(WordAddress::Command) => {
                    self.len = 0;
                    self.phase = FramerPhase::Accumulating;
                    FeedOutcome::FrameStarted
                }
                Some(word) => FeedOutcome::ControlWord(word),
                None => FeedOutcome::Ignored,
            },
            FramerPhase::Accumulating => {
                if self.len == MAX_PACKET_BYTES {
                    return FeedOutcome::Dropped;
                }
                self.buffer[self.len] = byte;
                self.len += 1;
                if self.len == usize::from(self.buffer[0]) {
                    FeedOutcome::FrameComplete
                } else {
                    FeedOutcome::Buffered
                }
            }
        }
    }

    /// Bytes buffered for the current frame.
    #[must_use]
    pub fn frame(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    /// Number of buffered bytes (the write cursor).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when no frame bytes are buffered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> FramerPhase {
        self.phase
    }

    /// Rewinds the cursor after a frame has been handled and waits for the
    /// next word address.
    pub fn finish_frame(&mut self) {
        self.len = 0;
        self.phase = FramerPhase::AwaitingMarker;
    }

    /// Clears buffered bytes and returns to the reset phase.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Outbound response buffer drained one byte per bus read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBuffer {
    buffer: [u8; MAX_PACKET_BYTES],
    cursor: usize,
}

impl Default for ResponseBuffer {
    fn default() -> Self {
        Self {
            buffer: [0; MAX_PACKET_BYTES],
            cursor: 0,
        }
    }
}

impl ResponseBuffer {
    /// Copies `bytes` to the start of the buffer and rewinds the cursor.
    ///
    /// Bytes past `bytes.len()` keep their previous contents; anything past
    /// capacity is discarded.
    pub fn load(&mut self, bytes: &[u8]) {
        let len = bytes.len().min(MAX_PACKET_BYTES);
        self.buffer[..len].copy_from_slice(&bytes[..len]);
        self.cursor = 0;
    }

    /// Returns the next byte and advances, or `0` once the buffer is drained.
    pub fn take_byte(&mut self) -> u8 {
        match self.buffer.get(self.cursor) {
            Some(byte) => {
                self.cursor += 1;
                *byte
            }
            None => 0,
        }
    }

    /// Read cursor.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whole buffer contents, including bytes already read.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; MAX_PACKET_BYTES] {
        &self.buffer
    }

    /// Zeroes the buffer and rewinds the cursor.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
