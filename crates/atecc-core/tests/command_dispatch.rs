//! Dispatcher behavior over complete bus transactions.

use atecc_core::{
    encode_command, frame_crc_matches, CommandSet, CrcPolicy, Device, DeviceConfig,
    DispatchOutcome, ErrorClass, ErrorCode, I2cTarget, Opcode, ResponseFraming, Zone,
    DEVICE_REVISION,
};
use proptest as _;
use rand as _;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use tracing as _;

fn wired(seed: u64) -> Device {
    Device::new(DeviceConfig {
        command_set: CommandSet::Wired,
        ..DeviceConfig::default().with_seed(seed)
    })
}

#[rstest]
#[case(Opcode::Random, 23)]
#[case(Opcode::Nonce, 7)]
#[case(Opcode::GenKey, 115)]
#[case(Opcode::Sign, 60)]
#[case(Opcode::Verify, 72)]
#[case(Opcode::Read, 1)]
#[case(Opcode::Write, 26)]
#[case(Opcode::Lock, 32)]
#[case(Opcode::Info, 1)]
fn reference_opcodes_record_execution_time(#[case] opcode: Opcode, #[case] expected_ms: u32) {
    let mut device = Device::new(DeviceConfig::default().with_seed(1));
    device.write_bytes(&encode_command(opcode.as_u8(), 0, 0, &[]).expect("frame"));
    assert_eq!(device.execution_time_ms(), expected_ms);
    assert_eq!(device.last_error(), 0);

    let produced_response = device.response().as_bytes().iter().any(|byte| *byte != 0);
    assert_eq!(produced_response, opcode == Opcode::Random);
}

#[rstest]
#[case(0x00)]
#[case(0x01)]
#[case(0x47)]
#[case(0x99)]
#[case(0xFF)]
fn unknown_opcode_latches_error_and_keeps_response(#[case] opcode: u8) {
    let mut device = Device::new(DeviceConfig::default().with_seed(1));
    device.write_bytes(&encode_command(Opcode::Random.as_u8(), 0, 0, &[]).expect("frame"));
    let before = *device.response().as_bytes();

    device.write_bytes(&encode_command(opcode, 0, 0, &[]).expect("frame"));
    assert_eq!(device.last_error(), 7);
    assert_eq!(device.execution_time_ms(), 0);
    assert_eq!(device.response().as_bytes(), &before);
    assert_eq!(device.diagnostics().error_count_command, 1);
}

#[rstest]
#[case(0x00, 0, 4)]
#[case(0x80, 0, 32)]
#[case(0x01, 32, 4)]
#[case(0x82, 992, 32)]
fn wired_read_sizes_follow_param1(#[case] param1: u8, #[case] address: u16, #[case] len: usize) {
    let mut device = wired(2);
    let zone = param1 & 0x03;
    let pattern: Vec<u8> = (0..len)
        .map(|index| u8::try_from(index).expect("block index fits") ^ 0x5A)
        .collect();
    device.write_zone(zone, address, &pattern).expect("seed zone");

    let wire = encode_command(Opcode::Read.as_u8(), param1, address, &[]).expect("frame");
    device.write_bytes(&wire);
    let response = device.read_bytes(len + 1);
    assert_eq!(response[0], 0x00);
    assert_eq!(&response[1..], pattern.as_slice());
}

#[rstest]
#[case(0x03, 0, ErrorCode::ZoneError, ErrorClass::Memory)]
#[case(0x81, 48, ErrorCode::BoundsError, ErrorClass::Memory)]
fn wired_read_failures_record_error(
    #[case] param1: u8,
    #[case] address: u16,
    #[case] expected: ErrorCode,
    #[case] class: ErrorClass,
) {
    let mut device = wired(2);
    let outcome = device
        .execute_command(Opcode::Read.as_u8(), param1, address, &[])
        .expect("frame fits");
    assert_eq!(outcome, DispatchOutcome::Failed(Opcode::Read, expected));
    assert_eq!(device.last_error_code(), Some(expected));
    assert_eq!(expected.class(), class);
}

#[test]
fn wired_write_then_lock_then_read_back() {
    let mut device = wired(3);
    let data = [0xC3; 32];
    device.write_bytes(&encode_command(Opcode::Write.as_u8(), 0x02, 128, &data).expect("frame"));
    assert_eq!(device.read_bytes(1), vec![0x00]);

    device.write_bytes(&encode_command(Opcode::Lock.as_u8(), 0x02, 0, &[]).expect("frame"));
    assert!(device.is_data_and_otp_locked());
    assert!(!device.is_config_locked());

    assert_eq!(device.read_zone(Zone::Data.id(), 128, 32), Ok(data.to_vec()));
}

#[test]
fn wired_info_reports_revision() {
    let mut device = wired(3);
    device.write_bytes(&encode_command(Opcode::Info.as_u8(), 0, 0, &[]).expect("frame"));
    let response = device.read_bytes(5);
    assert_eq!(response[0], 0x00);
    assert_eq!(&response[1..], &DEVICE_REVISION);
}

#[test]
fn wired_sign_without_temp_key_uses_payload() {
    let mut device = wired(6);
    let mut twin = wired(6);
    let mut message = [0_u8; 32];
    message[..3].copy_from_slice(&[1, 2, 3]);

    device.write_bytes(&encode_command(Opcode::Sign.as_u8(), 0, 0, &[1, 2, 3]).expect("frame"));
    let response = device.read_bytes(65);
    assert_eq!(response[0], 0x00);
    assert_eq!(&response[1..], &twin.sign(&message)[..]);
}

#[test]
fn strict_crc_rejects_corrupted_frame() {
    let mut device = Device::new(DeviceConfig {
        crc_policy: CrcPolicy::Reject,
        ..DeviceConfig::default().with_seed(1)
    });
    let mut wire = encode_command(Opcode::Random.as_u8(), 0, 0, &[]).expect("frame");
    wire[6] ^= 0x01;
    device.write_bytes(&wire);

    assert_eq!(device.last_error(), 0xFF);
    assert_eq!(device.execution_time_ms(), 0);
    assert_eq!(device.diagnostics().frames_rejected, 1);
    assert_eq!(device.diagnostics().frames_dispatched, 0);
    assert!(device.response().as_bytes().iter().all(|byte| *byte == 0));

    wire[6] ^= 0x01;
    device.write_bytes(&wire);
    assert_eq!(device.diagnostics().frames_dispatched, 1);
    assert_eq!(device.execution_time_ms(), 23);
}

#[test]
fn counted_framing_stamps_valid_checksum() {
    let mut device = Device::new(DeviceConfig {
        response_framing: ResponseFraming::Counted,
        ..DeviceConfig::default().with_seed(1)
    });
    device.write_bytes(&encode_command(Opcode::Random.as_u8(), 0, 0, &[]).expect("frame"));
    let response = device.read_bytes(35);
    assert_eq!(response[0], 35);
    assert!(frame_crc_matches(&response));
}

#[test]
fn strict_device_runs_full_transaction() {
    let mut device = Device::new(DeviceConfig::strict().with_seed(12));
    device.write_bytes(&encode_command(Opcode::GenKey.as_u8(), 0, 1, &[]).expect("frame"));
    let status = device.read_bytes(4);
    assert_eq!(status[0], 4);
    assert_eq!(status[1], 0x00);
    assert!(frame_crc_matches(&status));
    assert!(device.memory().zone(Zone::Data)[32..64]
        .iter()
        .any(|byte| *byte != 0));

    device.write_bytes(&encode_command(Opcode::Lock.as_u8(), 0x01, 0, &[]).expect("frame"));
    device.write_bytes(&encode_command(Opcode::GenKey.as_u8(), 0, 1, &[]).expect("frame"));
    assert_eq!(device.last_error_code(), Some(ErrorCode::ZoneLocked));
}
