//! Core model of an ATECC608-class secure element.
//!
//! The device is driven one bus byte at a time: [`Device::feed_byte`]
//! accumulates command frames and dispatches them synchronously, and
//! [`Device::take_byte`] drains the response buffer. Zone storage, key slots
//! and the crypto stubs are also reachable directly for host-side tests.

/// Register-style error codes and their diagnostic classes.
pub mod error;
pub use error::{ErrorClass, ErrorCode};

/// Zoned memory store, fixed layout and transfer validation.
pub mod memory;
pub use memory::{
    validate_lock, validate_transfer, Zone, ZonedMemory, CONFIG_ERASED_BYTE, CONFIG_LOCK_OFFSET,
    CONFIG_ZONE_SIZE, DATA_OTP_LOCK_OFFSET, DATA_ZONE_SIZE, DEFAULT_CONFIG_BYTES, LOCKED_SENTINEL,
    MAX_TRANSFER_BYTES, OTP_ZONE_SIZE,
};

/// Frame checksum.
pub mod crc;
pub use crc::{crc16, crc16_le_bytes, frame_crc_matches, CRC_BYTES};

/// Operating state and bus word addresses.
pub mod state;
pub use state::{DeviceState, WordAddress};

/// Opcode table and command frame layout.
pub mod command;
pub use command::{
    build_frame, encode_command, CommandFrame, Opcode, FRAME_HEADER_BYTES, MAX_PAYLOAD_BYTES,
    MIN_FRAME_BYTES,
};

/// Nominal command execution times.
pub mod timing;
pub use timing::{execution_time_ms, EXECUTION_TIME_TABLE, UNKNOWN_OPCODE_EXECUTION_MS};

/// Seeded random source and crypto stubs.
pub mod crypto;
pub use crypto::{derive_child_key, mix_hmac, time_seed, CryptoEngine, SIGNATURE_BYTES};

/// Key slot addressing on top of the data zone.
pub mod keys;
pub use keys::{
    slot_address, validate_key_id, KEY_SLOT_BYTES, KEY_SLOT_COUNT, KEY_TYPE_AES, KEY_TYPE_P256,
};

/// Device configuration and opt-in strict modes.
pub mod config;
pub use config::{CommandSet, CrcPolicy, DeviceConfig, LockPolicy, ResponseFraming};

/// Diagnostic counters.
pub mod diag;
pub use diag::Diagnostics;

/// Inbound framer and outbound response buffer.
pub mod transport;
pub use transport::{FeedOutcome, FramerPhase, InboundFramer, ResponseBuffer, MAX_PACKET_BYTES};

/// The device context object.
pub mod device;
pub use device::{Device, STATUS_SUCCESS};

/// Command dispatcher.
pub mod dispatch;
pub use dispatch::{
    execute_frame, DispatchOutcome, DEVICE_REVISION, NONCE_MODE_PASSTHROUGH, READ_BLOCK_FLAG,
    READ_WORD_BYTES, VERIFY_PAYLOAD_BYTES,
};

/// Host bus contract.
pub mod api;
pub use api::{I2cTarget, I2C_ADDRESS};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
