//! Host-facing bus contract.
//!
//! A host bus model registers a target at a 7-bit address and forwards each
//! transferred byte to it. [`Device`] is the only implementation in this
//! crate; replay tools and tests stay generic over the trait.

use crate::Device;

/// Default 7-bit bus address of the secure element.
pub const I2C_ADDRESS: u8 = 0x60;

/// Byte-oriented bus target callbacks.
pub trait I2cTarget {
    /// 7-bit bus address the target answers on.
    fn address(&self) -> u8;

    /// Delivers one byte written by the host.
    fn write_byte(&mut self, byte: u8);

    /// Supplies one byte for a host read.
    fn read_byte(&mut self) -> u8;

    /// Returns the target to its power-on state.
    fn reset(&mut self);

    /// Delivers every byte of `bytes` in order.
    fn write_bytes(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.write_byte(*byte);
        }
    }

    /// Performs `len` consecutive single-byte reads.
    fn read_bytes(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| self.read_byte()).collect()
    }
}

impl I2cTarget for Device {
    fn address(&self) -> u8 {
        I2C_ADDRESS
    }

    fn write_byte(&mut self, byte: u8) {
        self.feed_byte(byte);
    }

    fn read_byte(&mut self) -> u8 {
        self.take_byte()
    }

    fn reset(&mut self) {
        Self::reset(self);
    }
}

#[cfg(test)]
mod tests {
    use super::{I2cTarget, I2C_ADDRESS};
    use crate::{encode_command, Device, DeviceConfig, Opcode};

    fn roundtrip_random(target: &mut impl I2cTarget) -> Vec<u8> {
        let wire = encode_command(Opcode::Random.as_u8(), 0, 0, &[]).expect("frame");
        target.write_bytes(&wire);
        target.read_bytes(33)
    }

    #[test]
    fn device_answers_on_default_address() {
        assert_eq!(Device::default().address(), I2C_ADDRESS);
    }

    #[test]
    fn random_command_through_bus_callbacks() {
        let mut device = Device::new(DeviceConfig::default().with_seed(5));
        let response = roundtrip_random(&mut device);
        assert_eq!(response[0], 0x00);
        assert_eq!(device.response().cursor(), 33);

        let mut twin = Device::new(DeviceConfig::default().with_seed(5));
        assert_eq!(roundtrip_random(&mut twin), response);
    }

    #[test]
    fn bus_reset_restores_seeded_stream() {
        let mut device = Device::new(DeviceConfig::default().with_seed(5));
        let first = roundtrip_random(&mut device);
        I2cTarget::reset(&mut device);
        assert_eq!(device.response().cursor(), 0);
        assert_eq!(roundtrip_random(&mut device), first);
    }
}
