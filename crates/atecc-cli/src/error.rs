//! Error type shared by transcript parsing, config loading and replay.

use std::io;
use std::path::PathBuf;

use atecc_core::ErrorCode;
use thiserror::Error;

/// Everything that can stop a replay run.
#[derive(Debug, Error)]
pub enum CliError {
    /// A file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Replay output could not be written.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    /// A transcript line is malformed.
    #[error("line {line}: {message}")]
    Transcript {
        /// 1-indexed transcript line.
        line: usize,
        /// What was wrong with it.
        message: String,
    },
    /// A hex byte argument is malformed.
    #[error("invalid hex byte '{0}'")]
    Hex(String),
    /// The device config file is not valid JSON for a device config.
    #[error("invalid config {}: {source}", path.display())]
    Config {
        /// Config file path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// A command frame could not be built.
    #[error("cannot build frame: {0}")]
    Frame(#[from] ErrorCode),
}

impl CliError {
    /// Attaches a transcript line number to a message.
    #[must_use]
    pub fn transcript(line: usize, message: impl Into<String>) -> Self {
        Self::Transcript {
            line,
            message: message.into(),
        }
    }
}
