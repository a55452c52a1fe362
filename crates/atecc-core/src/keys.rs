//! Key slots carved out of the data zone.

use crate::{derive_child_key, mix_hmac, ErrorCode, Zone, ZonedMemory};

/// Number of addressable key slots.
pub const KEY_SLOT_COUNT: u8 = 16;
/// Size of one key slot.
pub const KEY_SLOT_BYTES: usize = 32;

/// Key type tag for NIST P-256 private keys.
pub const KEY_TYPE_P256: u8 = 0x04;
/// Key type tag for AES keys.
pub const KEY_TYPE_AES: u8 = 0x06;

/// Data-zone address of the 32-byte window for `key_id`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
pub const fn slot_address(key_id: u8) -> u16 {
    // KEY_SLOT_BYTES is 32, so the widest id (255) still fits in u16.
    key_id as u16 * KEY_SLOT_BYTES as u16
}

/// Rejects slot ids outside `0..KEY_SLOT_COUNT`.
///
/// # Errors
///
/// Returns [`ErrorCode::KeyIdError`] for ids of 16 and above.
pub const fn validate_key_id(key_id: u8) -> Result<(), ErrorCode> {
    if key_id < KEY_SLOT_COUNT {
        Ok(())
    } else {
        Err(ErrorCode::KeyIdError)
    }
}

impl ZonedMemory {
    /// Stores a 32-byte key into slot `key_id`.
    ///
    /// `key_type` is accepted for interface parity and not recorded.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::KeyIdError`] when `key_id` is 16 or above.
    pub fn store_key(
        &mut self,
        key_id: u8,
        key: &[u8; KEY_SLOT_BYTES],
        _key_type: u8,
    ) -> Result<(), ErrorCode> {
        validate_key_id(key_id)?;
        self.write(Zone::Data.id(), slot_address(key_id), key)
    }

    /// Reads the 32-byte window at `32 * key_id`.
    ///
    /// The id is not range-checked; the data zone bounds are. Ids 16–31 land
    /// in the upper half of the zone and larger ids fail.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::BoundsError`] when the window passes the end of
    /// the data zone.
    pub fn read_key_window(&self, key_id: u8) -> Result<[u8; KEY_SLOT_BYTES], ErrorCode> {
        let mut key = [0; KEY_SLOT_BYTES];
        self.read_into(Zone::Data.id(), slot_address(key_id), &mut key)?;
        Ok(key)
    }

    /// Mixes the key at `key_id` with `message` (see [`mix_hmac`]).
    ///
    /// # Errors
    ///
    /// Propagates [`ZonedMemory::read_key_window`] failures.
    pub fn compute_hmac(
        &self,
        key_id: u8,
        message: &[u8],
    ) -> Result<[u8; KEY_SLOT_BYTES], ErrorCode> {
        let key = self.read_key_window(key_id)?;
        Ok(mix_hmac(&key, message))
    }

    /// Derives a child of the key at `parent_key_id` (see [`derive_child_key`]).
    ///
    /// # Errors
    ///
    /// Propagates [`ZonedMemory::read_key_window`] failures.
    pub fn derive_key(&self, parent_key_id: u8) -> Result<[u8; KEY_SLOT_BYTES], ErrorCode> {
        let parent = self.read_key_window(parent_key_id)?;
        Ok(derive_child_key(&parent))
    }
}

#[cfg(test)]
mod tests {
    use super::{slot_address, validate_key_id, KEY_SLOT_COUNT, KEY_TYPE_AES, KEY_TYPE_P256};
    use crate::{ErrorCode, Zone, ZonedMemory};

    #[test]
    fn slot_addresses_step_by_32() {
        assert_eq!(slot_address(0), 0);
        assert_eq!(slot_address(1), 32);
        assert_eq!(slot_address(15), 480);
        assert_eq!(slot_address(255), 8160);
    }

    #[test]
    fn key_ids_past_last_slot_are_rejected() {
        assert_eq!(validate_key_id(KEY_SLOT_COUNT - 1), Ok(()));
        assert_eq!(validate_key_id(KEY_SLOT_COUNT), Err(ErrorCode::KeyIdError));
    }

    #[test]
    fn stored_key_lands_at_slot_offset() {
        let mut memory = ZonedMemory::new();
        let key: [u8; 32] = core::array::from_fn(|i| u8::try_from(i).expect("small") + 1);
        memory.store_key(3, &key, KEY_TYPE_P256).expect("valid slot");
        assert_eq!(&memory.zone(Zone::Data)[96..128], &key);
        assert!(memory.zone(Zone::Data)[..96].iter().all(|byte| *byte == 0));
    }

    #[test]
    fn store_key_rejects_out_of_range_slot_without_writing() {
        let mut memory = ZonedMemory::new();
        assert_eq!(
            memory.store_key(16, &[0xEE; 32], KEY_TYPE_AES),
            Err(ErrorCode::KeyIdError)
        );
        assert_eq!(memory, ZonedMemory::new());
    }

    #[test]
    fn hmac_reads_upper_windows_and_fails_past_zone() {
        let memory = ZonedMemory::new();
        assert_eq!(memory.compute_hmac(31, &[0xAB; 32]), Ok([0xAB; 32]));
        assert_eq!(
            memory.compute_hmac(32, &[0xAB; 32]),
            Err(ErrorCode::BoundsError)
        );
    }

    #[test]
    fn derive_key_xors_index_into_parent() {
        let mut memory = ZonedMemory::new();
        memory.store_key(0, &[0xFF; 32], KEY_TYPE_AES).expect("valid slot");
        let derived = memory.derive_key(0).expect("in bounds");
        for (index, byte) in derived.iter().enumerate() {
            let salt = u8::try_from(index + 1).expect("small");
            assert_eq!(*byte, 0xFF ^ salt);
        }
    }
}
