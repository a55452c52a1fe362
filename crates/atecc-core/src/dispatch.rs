//! Per-frame command dispatch.
//!
//! Runs synchronously once the framer has a complete frame. Execution time is
//! recorded before any handler runs; handler failures latch into the
//! device's last error and leave the response buffer untouched.

use tracing::{debug, warn};

use crate::{
    execution_time_ms, validate_key_id, CommandFrame, CommandSet, CrcPolicy, Device, ErrorCode,
    Opcode, KEY_SLOT_BYTES, KEY_TYPE_P256, MAX_TRANSFER_BYTES, SIGNATURE_BYTES,
    UNKNOWN_OPCODE_EXECUTION_MS,
};

/// Nonce mode that loads TempKey from the command payload.
pub const NONCE_MODE_PASSTHROUGH: u8 = 0x03;
/// Revision reported by `Info`.
pub const DEVICE_REVISION: [u8; 4] = [0x00, 0x00, 0x60, 0x02];
/// `Read` param1 bit selecting a 32-byte transfer instead of 4 bytes.
pub const READ_BLOCK_FLAG: u8 = 0x80;
/// Transfer size of a `Read` without [`READ_BLOCK_FLAG`].
pub const READ_WORD_BYTES: usize = 4;
/// Payload bytes `Verify` expects: message followed by signature.
pub const VERIFY_PAYLOAD_BYTES: usize = KEY_SLOT_BYTES + SIGNATURE_BYTES;

/// What happened to one dispatched frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Checksum mismatch under [`CrcPolicy::Reject`]; nothing ran.
    Rejected,
    /// Opcode not in the command table.
    UnknownOpcode(u8),
    /// Known opcode with no handler under the active command set.
    Passthrough(Opcode),
    /// Handler ran and loaded a response.
    Completed(Opcode),
    /// Handler failed with the given error.
    Failed(Opcode, ErrorCode),
}

/// Dispatches one marker-stripped frame against `device`.
pub fn execute_frame(device: &mut Device, bytes: &[u8]) -> DispatchOutcome {
    let frame = CommandFrame::new(bytes);

    if device.config().crc_policy == CrcPolicy::Reject && !frame.crc_matches() {
        device.note_frame_rejected();
        device.record_error(ErrorCode::CrcMismatch);
        warn!(len = bytes.len(), "frame rejected: checksum mismatch");
        return DispatchOutcome::Rejected;
    }
    device.note_frame_dispatched();

    let Some(opcode) = frame.opcode() else {
        let byte = frame.opcode_byte();
        device.set_execution_time(UNKNOWN_OPCODE_EXECUTION_MS);
        device.record_error(ErrorCode::UnknownOpcode);
        warn!(opcode = byte, "unknown opcode");
        return DispatchOutcome::UnknownOpcode(byte);
    };

    device.set_execution_time(execution_time_ms(opcode).unwrap_or(UNKNOWN_OPCODE_EXECUTION_MS));

    // Random is live under every command set.
    let passthrough = device.config().command_set == CommandSet::Reference;
    let outcome = if passthrough && opcode != Opcode::Random {
        DispatchOutcome::Passthrough(opcode)
    } else {
        complete(opcode, run_handler(device, opcode, &frame))
    };
    debug!(
        ?opcode,
        param1 = frame.param1(),
        param2 = frame.param2(),
        payload_len = frame.payload().len(),
        ?outcome,
        execution_time_ms = device.execution_time_ms(),
        "frame dispatched"
    );
    outcome
}

const fn complete(opcode: Opcode, result: Result<(), ErrorCode>) -> DispatchOutcome {
    match result {
        Ok(()) => DispatchOutcome::Completed(opcode),
        Err(code) => DispatchOutcome::Failed(opcode, code),
    }
}

fn run_handler(
    device: &mut Device,
    opcode: Opcode,
    frame: &CommandFrame<'_>,
) -> Result<(), ErrorCode> {
    match opcode {
        Opcode::Random => {
            random(device);
            Ok(())
        }
        Opcode::Nonce => nonce(device, frame.param1(), frame.payload()),
        Opcode::GenKey => gen_key(device, frame.param2()),
        Opcode::Sign => sign(device, frame.param2(), frame.payload()),
        Opcode::Verify => verify(device, frame.payload()),
        Opcode::Read => read(device, frame.param1(), frame.param2()),
        Opcode::Write => write(device, frame.param1(), frame.param2(), frame.payload()),
        Opcode::Lock => {
            lock(device, frame.param1());
            Ok(())
        }
        Opcode::Info => {
            device.respond(&DEVICE_REVISION);
            Ok(())
        }
    }
}

fn random(device: &mut Device) {
    let mut bytes = [0; KEY_SLOT_BYTES];
    device.fill_random(&mut bytes);
    device.respond(&bytes);
}

fn nonce(device: &mut Device, mode: u8, payload: &[u8]) -> Result<(), ErrorCode> {
    if mode == NONCE_MODE_PASSTHROUGH {
        let Ok(seed) = <[u8; KEY_SLOT_BYTES]>::try_from(payload) else {
            return device.fail(ErrorCode::LengthError);
        };
        device.set_temp_key(seed);
        device.respond(&[]);
    } else {
        let mut nonce = [0; KEY_SLOT_BYTES];
        device.fill_random(&mut nonce);
        device.set_temp_key(nonce);
        device.respond(&nonce);
    }
    Ok(())
}

fn slot_id(device: &mut Device, param2: u16) -> Result<u8, ErrorCode> {
    let checked = u8::try_from(param2)
        .map_err(|_| ErrorCode::KeyIdError)
        .and_then(|key_id| validate_key_id(key_id).map(|()| key_id));
    match checked {
        Ok(key_id) => Ok(key_id),
        Err(code) => device.fail(code),
    }
}

fn gen_key(device: &mut Device, param2: u16) -> Result<(), ErrorCode> {
    let key_id = slot_id(device, param2)?;
    device.generate_private_key(key_id, KEY_TYPE_P256)?;
    device.respond(&[]);
    Ok(())
}

fn sign(device: &mut Device, param2: u16, payload: &[u8]) -> Result<(), ErrorCode> {
    slot_id(device, param2)?;
    let message = device.temp_key().copied().unwrap_or_else(|| {
        let mut padded = [0; KEY_SLOT_BYTES];
        let len = payload.len().min(KEY_SLOT_BYTES);
        padded[..len].copy_from_slice(&payload[..len]);
        padded
    });
    let signature = device.sign(&message);
    device.respond(&signature);
    Ok(())
}

fn verify(device: &mut Device, payload: &[u8]) -> Result<(), ErrorCode> {
    if payload.len() < VERIFY_PAYLOAD_BYTES {
        return device.fail(ErrorCode::LengthError);
    }
    let (message, rest) = payload.split_at(KEY_SLOT_BYTES);
    let valid = device.verify(message, &rest[..SIGNATURE_BYTES]);
    debug!(valid, "signature verified");
    device.respond(&[]);
    Ok(())
}

fn read(device: &mut Device, param1: u8, address: u16) -> Result<(), ErrorCode> {
    let len = if param1 & READ_BLOCK_FLAG == 0 {
        READ_WORD_BYTES
    } else {
        MAX_TRANSFER_BYTES
    };
    let bytes = device.read_zone(param1 & 0x03, address, len)?;
    device.respond(&bytes);
    Ok(())
}

fn write(device: &mut Device, param1: u8, address: u16, data: &[u8]) -> Result<(), ErrorCode> {
    device.write_zone(param1 & 0x03, address, data)?;
    device.respond(&[]);
    Ok(())
}

fn lock(device: &mut Device, param1: u8) {
    if param1 & 0x03 == 0 {
        device.lock_config_zone();
    } else {
        device.lock_data_and_otp_zones();
    }
    device.respond(&[]);
}
