//! Fingerprint of a fixed-seed bus session, for comparing builds across hosts.

use atecc_core::{encode_command, Device, DeviceConfig, I2cTarget, Opcode, Zone};
use proptest as _;
use rand as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use tracing as _;

fn hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(0x0100_0000_01B3);
    }
}

fn transact(
    device: &mut Device,
    opcode: Opcode,
    param1: u8,
    param2: u16,
    payload: &[u8],
) -> Vec<u8> {
    match encode_command(opcode.as_u8(), param1, param2, payload) {
        Ok(wire) => device.write_bytes(&wire),
        Err(err) => eprintln!("skipping {opcode:?}: {err}"),
    }
    device.read_bytes(65)
}

fn fingerprint() -> String {
    let mut device = Device::new(DeviceConfig::strict().with_seed(0x5EED));
    let mut hash = 0xCBF2_9CE4_8422_2325_u64;

    hash_bytes(&mut hash, &transact(&mut device, Opcode::Random, 0, 0, &[]));
    hash_bytes(&mut hash, &transact(&mut device, Opcode::Nonce, 0, 0, &[]));
    hash_bytes(&mut hash, &transact(&mut device, Opcode::GenKey, 0, 3, &[]));
    hash_bytes(&mut hash, &transact(&mut device, Opcode::Sign, 0, 3, &[]));
    hash_bytes(&mut hash, &transact(&mut device, Opcode::Write, 0x01, 0, &[0xA5; 32]));
    hash_bytes(&mut hash, &transact(&mut device, Opcode::Lock, 0x00, 0, &[]));
    hash_bytes(&mut hash, &transact(&mut device, Opcode::Info, 0, 0, &[]));
    for zone in Zone::ALL {
        hash_bytes(&mut hash, device.memory().zone(zone));
    }
    hash_bytes(&mut hash, &[device.last_error()]);

    format!("{hash:016x}")
}

fn main() {
    println!("session fingerprint: {}", fingerprint());
}
