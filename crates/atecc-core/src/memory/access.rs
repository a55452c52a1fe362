//! Transfer validation and lock policy checks for zone accesses.

use std::ops::Range;

use crate::{ErrorCode, LockPolicy, Zone, MAX_TRANSFER_BYTES};

/// Validates a zone transfer and resolves it to a byte range within the zone.
///
/// Checks run in a fixed order: transfer length, zone selector, then bounds.
///
/// # Errors
///
/// - [`ErrorCode::LengthError`] when `len` exceeds [`MAX_TRANSFER_BYTES`].
/// - [`ErrorCode::ZoneError`] when `selector` names no zone.
/// - [`ErrorCode::BoundsError`] when `address + len` exceeds the zone capacity.
pub fn validate_transfer(
    selector: u8,
    address: u16,
    len: usize,
) -> Result<(Zone, Range<usize>), ErrorCode> {
    if len > MAX_TRANSFER_BYTES {
        return Err(ErrorCode::LengthError);
    }
    let zone = Zone::from_selector(selector)?;
    let start = usize::from(address);
    let end = start + len;
    if end > zone.capacity() {
        return Err(ErrorCode::BoundsError);
    }
    Ok((zone, start..end))
}

/// Applies the configured lock policy to a write into `zone`.
///
/// # Errors
///
/// Returns [`ErrorCode::ZoneLocked`] when the policy is enforced and the zone
/// is locked.
pub const fn validate_lock(zone_locked: bool, policy: LockPolicy) -> Result<(), ErrorCode> {
    match policy {
        LockPolicy::Enforced if zone_locked => Err(ErrorCode::ZoneLocked),
        LockPolicy::Enforced | LockPolicy::Advisory => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_lock, validate_transfer};
    use crate::{ErrorCode, LockPolicy, Zone, DATA_ZONE_SIZE, OTP_ZONE_SIZE};

    #[test]
    fn length_is_checked_before_zone() {
        assert_eq!(
            validate_transfer(0x03, 0, 33),
            Err(ErrorCode::LengthError)
        );
    }

    #[test]
    fn zone_is_checked_before_bounds() {
        assert_eq!(
            validate_transfer(0x03, u16::MAX, 32),
            Err(ErrorCode::ZoneError)
        );
    }

    #[test]
    fn transfer_may_end_exactly_at_capacity() {
        let end = u16::try_from(OTP_ZONE_SIZE - 32).expect("fits");
        assert_eq!(
            validate_transfer(Zone::Otp.id(), end, 32),
            Ok((Zone::Otp, OTP_ZONE_SIZE - 32..OTP_ZONE_SIZE))
        );
        assert_eq!(
            validate_transfer(Zone::Otp.id(), end + 1, 32),
            Err(ErrorCode::BoundsError)
        );
    }

    #[test]
    fn max_address_never_wraps() {
        assert_eq!(
            validate_transfer(Zone::Data.id(), u16::MAX, 1),
            Err(ErrorCode::BoundsError)
        );
        let last = u16::try_from(DATA_ZONE_SIZE - 1).expect("fits");
        assert!(validate_transfer(Zone::Data.id(), last, 1).is_ok());
    }

    #[test]
    fn zero_length_transfer_is_legal_inside_zone() {
        assert_eq!(
            validate_transfer(Zone::Config.id(), 128, 0),
            Ok((Zone::Config, 128..128))
        );
    }

    #[test]
    fn lock_policy_only_rejects_when_enforced_and_locked() {
        assert_eq!(validate_lock(true, LockPolicy::Advisory), Ok(()));
        assert_eq!(validate_lock(false, LockPolicy::Enforced), Ok(()));
        assert_eq!(
            validate_lock(true, LockPolicy::Enforced),
            Err(ErrorCode::ZoneLocked)
        );
    }
}
