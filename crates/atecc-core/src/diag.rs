//! Saturating diagnostics counters maintained alongside `last_error`.

use crate::{ErrorClass, ErrorCode};

/// Host-visible diagnostic counters. All counters saturate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Diagnostics {
    /// Command word addresses seen.
    pub frames_started: u32,
    /// Frames that reached the dispatcher.
    pub frames_dispatched: u32,
    /// Frames discarded by the CRC policy.
    pub frames_rejected: u32,
    /// Inbound bytes dropped because the frame buffer was full.
    pub bytes_dropped: u32,
    /// Non-command word addresses seen.
    pub control_words: u32,
    /// Bytes that were neither a word address nor part of a frame.
    pub stray_bytes: u32,
    /// Memory-class errors.
    pub error_count_memory: u32,
    /// Key-class errors.
    pub error_count_key: u32,
    /// Command-class errors.
    pub error_count_command: u32,
    /// Transport-class errors.
    pub error_count_transport: u32,
    /// Most recent error recorded here.
    pub last_error: Option<ErrorCode>,
}

impl Diagnostics {
    /// Records an error occurrence against its class counter.
    pub fn record_error(&mut self, code: ErrorCode) {
        self.last_error = Some(code);
        let counter = match code.class() {
            ErrorClass::Memory => &mut self.error_count_memory,
            ErrorClass::Key => &mut self.error_count_key,
            ErrorClass::Command => &mut self.error_count_command,
            ErrorClass::Transport => &mut self.error_count_transport,
        };
        *counter = counter.saturating_add(1);
    }

    /// Total errors across every class.
    #[must_use]
    pub const fn total_errors(&self) -> u32 {
        self.error_count_memory
            .saturating_add(self.error_count_key)
            .saturating_add(self.error_count_command)
            .saturating_add(self.error_count_transport)
    }

    /// Resets every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Adds one to a counter without wrapping.
pub(crate) fn bump(counter: &mut u32) {
    *counter = counter.saturating_add(1);
}

#[cfg(test)]
mod tests {
    use super::{bump, Diagnostics};
    use crate::ErrorCode;

    #[test]
    fn errors_land_in_their_class_counter() {
        let mut diag = Diagnostics::default();
        diag.record_error(ErrorCode::BoundsError);
        diag.record_error(ErrorCode::LengthError);
        diag.record_error(ErrorCode::KeyIdError);
        diag.record_error(ErrorCode::UnknownOpcode);
        diag.record_error(ErrorCode::CrcMismatch);

        assert_eq!(diag.error_count_memory, 2);
        assert_eq!(diag.error_count_key, 1);
        assert_eq!(diag.error_count_command, 1);
        assert_eq!(diag.error_count_transport, 1);
        assert_eq!(diag.total_errors(), 5);
        assert_eq!(diag.last_error, Some(ErrorCode::CrcMismatch));
    }

    #[test]
    fn counters_saturate() {
        let mut diag = Diagnostics {
            error_count_key: u32::MAX,
            bytes_dropped: u32::MAX,
            ..Diagnostics::default()
        };
        diag.record_error(ErrorCode::KeyIdError);
        bump(&mut diag.bytes_dropped);
        assert_eq!(diag.error_count_key, u32::MAX);
        assert_eq!(diag.bytes_dropped, u32::MAX);
    }

    #[test]
    fn reset_clears_everything() {
        let mut diag = Diagnostics::default();
        diag.record_error(ErrorCode::ZoneError);
        bump(&mut diag.frames_started);
        diag.reset();
        assert_eq!(diag, Diagnostics::default());
    }
}
