//! Operating-state machine and bus word addresses.

/// Chip operating state.
///
/// Only reset moves the device between states today; word addresses and
/// commands are routed through [`DeviceState::on_word_address`], which keeps
/// the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DeviceState {
    /// Powered, awaiting a command.
    #[default]
    Idle,
    /// Low-power sleep.
    Sleep,
    /// Executing a command.
    Active,
}

impl DeviceState {
    /// Computes the state after the host sends `word_address`.
    #[must_use]
    pub const fn on_word_address(self, word_address: WordAddress) -> Self {
        match word_address {
            WordAddress::Reset | WordAddress::Sleep | WordAddress::Idle | WordAddress::Command => {
                self
            }
        }
    }
}

/// First byte of every bus write, selecting what the rest of the write means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum WordAddress {
    /// Reset the address counter of the I/O buffer.
    Reset = 0x00,
    /// Enter sleep.
    Sleep = 0x01,
    /// Enter idle.
    Idle = 0x02,
    /// A command frame follows.
    Command = 0x03,
}

impl WordAddress {
    /// Decodes a word-address byte.
    #[must_use]
    pub const fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::Reset),
            0x01 => Some(Self::Sleep),
            0x02 => Some(Self::Idle),
            0x03 => Some(Self::Command),
            _ => None,
        }
    }

    /// Returns the wire value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}
