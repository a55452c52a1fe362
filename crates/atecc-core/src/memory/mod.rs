//! Zoned persistent memory: config, OTP and data regions plus lock sentinels.

/// Transfer validation and lock policy helpers.
pub mod access;
/// Fixed zone layout and sentinel offsets.
pub mod map;

pub use access::{validate_lock, validate_transfer};
pub use map::{
    Zone, CONFIG_ERASED_BYTE, CONFIG_LOCK_OFFSET, CONFIG_ZONE_SIZE, DATA_OTP_LOCK_OFFSET,
    DATA_ZONE_SIZE, DEFAULT_CONFIG_BYTES, LOCKED_SENTINEL, MAX_TRANSFER_BYTES, OTP_ZONE_SIZE,
};

use crate::ErrorCode;

/// Backing store for the three memory zones.
///
/// Every failing access leaves the store untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ZonedMemory {
    config: Box<[u8]>,
    otp: Box<[u8]>,
    data: Box<[u8]>,
}

impl Default for ZonedMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl ZonedMemory {
    /// Allocates a store in factory state.
    #[must_use]
    pub fn new() -> Self {
        let mut memory = Self {
            config: vec![0; CONFIG_ZONE_SIZE].into_boxed_slice(),
            otp: vec![0; OTP_ZONE_SIZE].into_boxed_slice(),
            data: vec![0; DATA_ZONE_SIZE].into_boxed_slice(),
        };
        memory.reset_factory();
        memory
    }

    /// Restores factory contents: erased config with default bytes, zeroed
    /// OTP and data, both zones unlocked.
    pub fn reset_factory(&mut self) {
        self.config.fill(CONFIG_ERASED_BYTE);
        self.otp.fill(0);
        self.data.fill(0);
        for (offset, value) in DEFAULT_CONFIG_BYTES {
            self.config[offset] = value;
        }
    }

    /// Returns the full contents of a zone.
    #[must_use]
    pub fn zone(&self, zone: Zone) -> &[u8] {
        match zone {
            Zone::Config => &self.config,
            Zone::Otp => &self.otp,
            Zone::Data => &self.data,
        }
    }

    fn zone_mut(&mut self, zone: Zone) -> &mut [u8] {
        match zone {
            Zone::Config => &mut self.config,
            Zone::Otp => &mut self.otp,
            Zone::Data => &mut self.data,
        }
    }

    /// Copies `out.len()` bytes starting at `address` into `out`.
    ///
    /// # Errors
    ///
    /// Propagates the [`validate_transfer`] failure; `out` is not modified.
    pub fn read_into(&self, selector: u8, address: u16, out: &mut [u8]) -> Result<(), ErrorCode> {
        let (zone, range) = validate_transfer(selector, address, out.len())?;
        out.copy_from_slice(&self.zone(zone)[range]);
        Ok(())
    }

    /// Reads `len` bytes starting at `address`.
    ///
    /// # Errors
    ///
    /// Propagates the [`validate_transfer`] failure.
    pub fn read(&self, selector: u8, address: u16, len: usize) -> Result<Vec<u8>, ErrorCode> {
        let (zone, range) = validate_transfer(selector, address, len)?;
        Ok(self.zone(zone)[range].to_vec())
    }

    /// Overwrites zone bytes starting at `address` with `data`.
    ///
    /// Lock sentinels are not consulted; callers apply their lock policy first.
    ///
    /// # Errors
    ///
    /// Propagates the [`validate_transfer`] failure; the zone is not modified.
    pub fn write(&mut self, selector: u8, address: u16, data: &[u8]) -> Result<(), ErrorCode> {
        let (zone, range) = validate_transfer(selector, address, data.len())?;
        self.zone_mut(zone)[range].copy_from_slice(data);
        Ok(())
    }

    /// Locks the config zone.
    pub fn lock_config_zone(&mut self) {
        self.config[CONFIG_LOCK_OFFSET] = LOCKED_SENTINEL;
    }

    /// Locks the OTP and data zones together.
    pub fn lock_data_and_otp_zones(&mut self) {
        self.config[DATA_OTP_LOCK_OFFSET] = LOCKED_SENTINEL;
    }

    /// Returns `true` once the config zone is locked.
    #[must_use]
    pub fn is_config_locked(&self) -> bool {
        self.config[CONFIG_LOCK_OFFSET] == LOCKED_SENTINEL
    }

    /// Returns `true` once the OTP and data zones are locked.
    #[must_use]
    pub fn is_data_and_otp_locked(&self) -> bool {
        self.config[DATA_OTP_LOCK_OFFSET] == LOCKED_SENTINEL
    }

    /// Returns `true` when the sentinel guarding `zone` is set.
    #[must_use]
    pub fn is_zone_locked(&self, zone: Zone) -> bool {
        self.config[zone.lock_sentinel_offset()] == LOCKED_SENTINEL
    }
}
