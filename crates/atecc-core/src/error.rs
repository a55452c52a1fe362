use thiserror::Error;

/// Error classes used for diagnostics aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ErrorClass {
    /// Zone transfer validation or lock policy rejected the access.
    Memory,
    /// Key slot addressing was out of range.
    Key,
    /// Dispatcher could not interpret the command.
    Command,
    /// Frame integrity check failed before dispatch.
    Transport,
}

/// Stable register-style error codes latched into `last_error`.
///
/// The numeric values are part of the host-visible contract and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum ErrorCode {
    /// Requested zone transfer is longer than 32 bytes.
    #[error("length exceeds transfer limit")]
    LengthError = 0x01,
    /// Zone selector does not name the config, OTP or data zone.
    #[error("zone id is not config, otp or data")]
    ZoneError = 0x02,
    /// `address + length` runs past the end of the target zone.
    #[error("zone access out of bounds")]
    BoundsError = 0x03,
    /// Dispatcher received an opcode outside the command table.
    #[error("unknown opcode")]
    UnknownOpcode = 0x07,
    /// Key slot id is 16 or above.
    #[error("key slot id out of range")]
    KeyIdError = 0x08,
    /// Write targeted a locked zone while lock enforcement is enabled.
    #[error("zone is locked")]
    ZoneLocked = 0x09,
    /// Frame checksum did not match while CRC rejection is enabled.
    #[error("frame crc mismatch")]
    CrcMismatch = 0xFF,
}

impl ErrorCode {
    /// Converts an error code to the value latched in `last_error`.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a latched `last_error` value back into an error code.
    ///
    /// `0` means "no error" and is not a code.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::LengthError),
            0x02 => Some(Self::ZoneError),
            0x03 => Some(Self::BoundsError),
            0x07 => Some(Self::UnknownOpcode),
            0x08 => Some(Self::KeyIdError),
            0x09 => Some(Self::ZoneLocked),
            0xFF => Some(Self::CrcMismatch),
            _ => None,
        }
    }

    /// Returns the diagnostics class for this error code.
    #[must_use]
    pub const fn class(self) -> ErrorClass {
        match self {
            Self::LengthError | Self::ZoneError | Self::BoundsError | Self::ZoneLocked => {
                ErrorClass::Memory
            }
            Self::KeyIdError => ErrorClass::Key,
            Self::UnknownOpcode => ErrorClass::Command,
            Self::CrcMismatch => ErrorClass::Transport,
        }
    }
}
