//! Device configuration loading.

use std::fs;
use std::path::Path;

use atecc_core::DeviceConfig;

use crate::CliError;

/// Reads a JSON device config. Missing fields take their defaults.
///
/// # Errors
///
/// Returns [`CliError::Read`] when the file cannot be read and
/// [`CliError::Config`] when it is not a valid config.
pub fn load_config(path: &Path) -> Result<DeviceConfig, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a JSON device config.
///
/// # Errors
///
/// Returns the JSON error for malformed or mistyped input.
pub fn parse_config(text: &str) -> Result<DeviceConfig, serde_json::Error> {
    serde_json::from_str(text)
}

/// Resolves the effective config: file (or defaults), then a CLI seed on top.
///
/// # Errors
///
/// Propagates [`load_config`] failures.
pub fn resolve_config(path: Option<&Path>, seed: Option<u64>) -> Result<DeviceConfig, CliError> {
    let config = path.map_or_else(|| Ok(DeviceConfig::default()), load_config)?;
    Ok(match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use atecc_core::{CommandSet, CrcPolicy, DeviceConfig, LockPolicy, ResponseFraming};

    use super::{load_config, parse_config, resolve_config};
    use crate::CliError;

    #[test]
    fn empty_object_is_default_config() {
        assert_eq!(parse_config("{}").expect("json"), DeviceConfig::default());
    }

    #[test]
    fn snake_case_fields_select_strict_modes() {
        let config = parse_config(
            r#"{
                "command_set": "wired",
                "crc_policy": "reject",
                "lock_policy": "enforced",
                "response_framing": "counted",
                "rng_seed": 5
            }"#,
        )
        .expect("json");
        assert_eq!(config, DeviceConfig::strict().with_seed(5));
        assert_eq!(config.command_set, CommandSet::Wired);
        assert_eq!(config.crc_policy, CrcPolicy::Reject);
        assert_eq!(config.lock_policy, LockPolicy::Enforced);
        assert_eq!(config.response_framing, ResponseFraming::Counted);
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert!(parse_config(r#"{"crc_policy": "sometimes"}"#).is_err());
    }

    #[test]
    fn cli_seed_overrides_file_seed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("device.json");
        fs::write(&path, r#"{"rng_seed": 1, "command_set": "wired"}"#).expect("write");

        let config = resolve_config(Some(&path), Some(9)).expect("config");
        assert_eq!(config.rng_seed, Some(9));
        assert_eq!(config.command_set, CommandSet::Wired);

        let config = resolve_config(Some(&path), None).expect("config");
        assert_eq!(config.rng_seed, Some(1));
        assert_eq!(resolve_config(None, None).expect("default"), DeviceConfig::default());
    }

    #[test]
    fn missing_and_malformed_files_are_distinguished() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent.json");
        assert!(matches!(load_config(&missing), Err(CliError::Read { .. })));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{").expect("write");
        assert!(matches!(load_config(&broken), Err(CliError::Config { .. })));
    }
}
