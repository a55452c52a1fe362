//! Fixed zone layout of the secure element's persistent memory.

use crate::ErrorCode;

/// Size in bytes of the config zone.
pub const CONFIG_ZONE_SIZE: usize = 128;
/// Size in bytes of the one-time-programmable zone.
pub const OTP_ZONE_SIZE: usize = 64;
/// Size in bytes of the data zone.
pub const DATA_ZONE_SIZE: usize = 1024;
/// Largest transfer accepted by a single zone read or write.
pub const MAX_TRANSFER_BYTES: usize = 32;

/// Config-zone offset of the sentinel that locks OTP and Data together.
pub const DATA_OTP_LOCK_OFFSET: usize = 86;
/// Config-zone offset of the sentinel that locks the config zone.
pub const CONFIG_LOCK_OFFSET: usize = 87;
/// Sentinel value marking a zone as locked.
pub const LOCKED_SENTINEL: u8 = 0x00;

/// Fill value of the config zone after reset.
pub const CONFIG_ERASED_BYTE: u8 = 0xFF;
/// Config bytes seeded on reset, as `(offset, value)` pairs.
pub const DEFAULT_CONFIG_BYTES: [(usize, u8); 2] = [
    // bus address
    (0, 0x01),
    // chip mode
    (1, 0x23),
];

/// Persistent memory zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum Zone {
    /// Device configuration, including the lock sentinels.
    Config = 0x00,
    /// One-time-programmable zone.
    Otp = 0x01,
    /// Data zone holding the key slots.
    Data = 0x02,
}

impl Zone {
    /// All zones in id order.
    pub const ALL: [Self; 3] = [Self::Config, Self::Otp, Self::Data];

    /// Decodes a zone id.
    ///
    /// Command parameters that carry flags next to the zone bits must be
    /// masked by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::ZoneError`] for ids other than 0, 1 and 2.
    pub const fn from_selector(selector: u8) -> Result<Self, ErrorCode> {
        match selector {
            0x00 => Ok(Self::Config),
            0x01 => Ok(Self::Otp),
            0x02 => Ok(Self::Data),
            _ => Err(ErrorCode::ZoneError),
        }
    }

    /// Returns the wire id of this zone.
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Returns the zone capacity in bytes.
    #[must_use]
    pub const fn capacity(self) -> usize {
        match self {
            Self::Config => CONFIG_ZONE_SIZE,
            Self::Otp => OTP_ZONE_SIZE,
            Self::Data => DATA_ZONE_SIZE,
        }
    }

    /// Returns the config offset of the sentinel guarding this zone.
    #[must_use]
    pub const fn lock_sentinel_offset(self) -> usize {
        match self {
            Self::Config => CONFIG_LOCK_OFFSET,
            Self::Otp | Self::Data => DATA_OTP_LOCK_OFFSET,
        }
    }
}

const _: () = assert_zone_layout();

const fn assert_zone_layout() {
    assert!(
        CONFIG_LOCK_OFFSET < CONFIG_ZONE_SIZE && DATA_OTP_LOCK_OFFSET < CONFIG_ZONE_SIZE,
        "lock sentinels must live inside the config zone"
    );
    assert!(
        CONFIG_LOCK_OFFSET != DATA_OTP_LOCK_OFFSET,
        "each lock needs its own sentinel"
    );
    assert!(
        DEFAULT_CONFIG_BYTES[0].0 != CONFIG_LOCK_OFFSET
            && DEFAULT_CONFIG_BYTES[1].0 != CONFIG_LOCK_OFFSET
            && DEFAULT_CONFIG_BYTES[0].0 != DATA_OTP_LOCK_OFFSET
            && DEFAULT_CONFIG_BYTES[1].0 != DATA_OTP_LOCK_OFFSET,
        "default config bytes cannot lock a zone"
    );
    assert!(
        DATA_ZONE_SIZE >= 16 * MAX_TRANSFER_BYTES,
        "data zone must hold sixteen key slots"
    );
}
