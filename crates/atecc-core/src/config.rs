//! Device configuration.
//!
//! Defaults reproduce the permissive reference chip model exactly. Every
//! stricter or more complete behavior is opt-in.

/// Which opcodes do real work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CommandSet {
    /// Only `Random` produces a response; the other table opcodes record
    /// their execution time and leave the response buffer untouched.
    #[default]
    Reference,
    /// Every table opcode is wired to the memory store and crypto stubs.
    Wired,
}

/// Handling of inbound frame checksums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CrcPolicy {
    /// Checksums are not inspected.
    #[default]
    Ignore,
    /// Frames with a bad checksum are rejected before dispatch.
    Reject,
}

/// Handling of writes into locked zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LockPolicy {
    /// Lock sentinels are informational only.
    #[default]
    Advisory,
    /// Writes into a locked zone fail with `ZoneLocked`.
    Enforced,
}

/// Layout of bytes placed in the response buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ResponseFraming {
    /// `[status, payload...]`.
    #[default]
    Bare,
    /// `[count, body..., crc_lo, crc_hi]`, where body is the payload or the
    /// status byte when there is no payload.
    Counted,
}

/// Top-level configuration for a device instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeviceConfig {
    /// Opcode wiring.
    pub command_set: CommandSet,
    /// Inbound checksum handling.
    pub crc_policy: CrcPolicy,
    /// Locked-zone write handling.
    pub lock_policy: LockPolicy,
    /// Response buffer layout.
    pub response_framing: ResponseFraming,
    /// Fixed RNG seed applied on every reset; the wall clock seeds the
    /// stream when unset.
    pub rng_seed: Option<u64>,
}

impl DeviceConfig {
    /// Enables every strict mode and wires the full command set.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            command_set: CommandSet::Wired,
            crc_policy: CrcPolicy::Reject,
            lock_policy: LockPolicy::Enforced,
            response_framing: ResponseFraming::Counted,
            rng_seed: None,
        }
    }

    /// Returns this configuration with a fixed RNG seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{CommandSet, CrcPolicy, DeviceConfig, LockPolicy, ResponseFraming};

    #[test]
    fn default_config_is_permissive_reference_model() {
        let config = DeviceConfig::default();
        assert_eq!(config.command_set, CommandSet::Reference);
        assert_eq!(config.crc_policy, CrcPolicy::Ignore);
        assert_eq!(config.lock_policy, LockPolicy::Advisory);
        assert_eq!(config.response_framing, ResponseFraming::Bare);
        assert_eq!(config.rng_seed, None);
    }

    #[test]
    fn strict_config_enables_every_check() {
        let config = DeviceConfig::strict().with_seed(9);
        assert_eq!(config.command_set, CommandSet::Wired);
        assert_eq!(config.crc_policy, CrcPolicy::Reject);
        assert_eq!(config.lock_policy, LockPolicy::Enforced);
        assert_eq!(config.response_framing, ResponseFraming::Counted);
        assert_eq!(config.rng_seed, Some(9));
    }
}
