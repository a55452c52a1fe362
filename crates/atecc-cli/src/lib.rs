//! Transcript replay host for the secure element model.

/// Error type for replay runs.
pub mod error;
/// Log subscriber setup.
pub mod logging;
/// Transcript execution against a bus target.
pub mod replay;
/// JSON device configuration loading.
pub mod settings;
/// Transcript syntax and hex helpers.
pub mod transcript;

pub use error::CliError;
pub use logging::init_logging;
pub use replay::{replay, ReplaySummary};
pub use settings::{load_config, parse_config, resolve_config};
pub use transcript::{
    format_hex, parse_hex_args, parse_hex_tokens, parse_number, parse_transcript, Step,
    TranscriptLine,
};
