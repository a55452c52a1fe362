//! Transcript execution against a bus target.

use std::io::Write;

use atecc_core::{encode_command, I2cTarget};
use tracing::{debug, info};

use crate::transcript::{format_hex, Step, TranscriptLine};
use crate::CliError;

/// Totals for one replay run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaySummary {
    /// Bytes delivered to the target.
    pub bytes_written: usize,
    /// Bytes read back from the target.
    pub bytes_read: usize,
    /// Command frames encoded from `frame` lines.
    pub frames: usize,
    /// Resets issued.
    pub resets: usize,
}

/// Runs `steps` against `target`, printing each read as `< XX XX ...`.
///
/// # Errors
///
/// Returns [`CliError::Frame`] when a `frame` line cannot be encoded and
/// [`CliError::Output`] when `out` fails.
pub fn replay<T, W>(
    target: &mut T,
    steps: &[TranscriptLine],
    out: &mut W,
) -> Result<ReplaySummary, CliError>
where
    T: I2cTarget,
    W: Write,
{
    let mut summary = ReplaySummary::default();
    for TranscriptLine { line, step } in steps {
        match step {
            Step::Write(bytes) => {
                target.write_bytes(bytes);
                summary.bytes_written += bytes.len();
                debug!(line, len = bytes.len(), "write");
            }
            Step::Read(len) => {
                let bytes = target.read_bytes(*len);
                summary.bytes_read += bytes.len();
                writeln!(out, "< {}", format_hex(&bytes))?;
            }
            Step::Frame {
                opcode,
                param1,
                param2,
                payload,
            } => {
                let wire = encode_command(*opcode, *param1, *param2, payload)?;
                target.write_bytes(&wire);
                summary.bytes_written += wire.len();
                summary.frames += 1;
                debug!(line, opcode, param1, param2, "frame");
            }
            Step::Reset => {
                target.reset();
                summary.resets += 1;
                debug!(line, "reset");
            }
        }
    }
    info!(
        bytes_written = summary.bytes_written,
        bytes_read = summary.bytes_read,
        frames = summary.frames,
        "replay finished"
    );
    Ok(summary)
}
