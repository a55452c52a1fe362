#![no_main]

use atecc_core::{
    CommandSet, CrcPolicy, Device, DeviceConfig, I2cTarget, LockPolicy, ResponseFraming,
    MAX_PACKET_BYTES,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&mode, stream)) = data.split_first() else {
        return;
    };

    let config = DeviceConfig {
        command_set: if mode & 0x01 == 0 {
            CommandSet::Reference
        } else {
            CommandSet::Wired
        },
        crc_policy: if mode & 0x02 == 0 {
            CrcPolicy::Ignore
        } else {
            CrcPolicy::Reject
        },
        lock_policy: if mode & 0x04 == 0 {
            LockPolicy::Advisory
        } else {
            LockPolicy::Enforced
        },
        response_framing: if mode & 0x08 == 0 {
            ResponseFraming::Bare
        } else {
            ResponseFraming::Counted
        },
        rng_seed: Some(u64::from(mode)),
    };
    let mut device = Device::new(config);

    // Interleave reads so response draining is exercised mid-stream.
    for chunk in stream.chunks(MAX_PACKET_BYTES / 2) {
        device.write_bytes(chunk);
        let _ = device.read_bytes(chunk.len() % 8);
    }

    assert!(device.inbound().len() <= MAX_PACKET_BYTES);
    assert!(device.response().cursor() <= MAX_PACKET_BYTES);
});
