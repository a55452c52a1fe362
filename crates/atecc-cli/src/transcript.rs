//! Parsing for bus transcripts.
//!
//! ## Syntax
//!
//! - `> 03 07 1B 00 00 00 6C 62` writes raw bytes
//! - `< 33` reads that many bytes (at most 128) and prints them
//! - `frame 0x1B 0 0` writes a marker-prefixed, checksummed command frame;
//!   payload bytes may follow the three header values
//! - `reset` resets the device
//! - `#` starts a comment
//!
//! Byte arguments are hex with an optional `0x` prefix and may be run
//! together (`071B00`). Numeric arguments are decimal or `0x` hex.

use atecc_core::MAX_PACKET_BYTES;

use crate::CliError;

/// One transcript step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Raw bus write.
    Write(Vec<u8>),
    /// Bus read of this many bytes.
    Read(usize),
    /// Command frame to encode and write.
    Frame {
        /// Opcode byte.
        opcode: u8,
        /// First parameter.
        param1: u8,
        /// Second parameter.
        param2: u16,
        /// Data bytes between header and checksum.
        payload: Vec<u8>,
    },
    /// Device reset.
    Reset,
}

/// A step and the transcript line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    /// 1-indexed source line.
    pub line: usize,
    /// Parsed step.
    pub step: Step,
}

/// Parses a whole transcript. Blank and comment-only lines are skipped.
///
/// # Errors
///
/// Returns [`CliError::Transcript`] for the first malformed line.
pub fn parse_transcript(source: &str) -> Result<Vec<TranscriptLine>, CliError> {
    let mut steps = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = raw.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }
        let step = parse_step(text).map_err(|message| CliError::transcript(line, message))?;
        steps.push(TranscriptLine { line, step });
    }
    Ok(steps)
}

fn parse_step(text: &str) -> Result<Step, String> {
    if let Some(rest) = text.strip_prefix('>') {
        let bytes = parse_hex_tokens(rest.split_whitespace())?;
        if bytes.is_empty() {
            return Err("write needs at least one byte".to_string());
        }
        return Ok(Step::Write(bytes));
    }
    if let Some(rest) = text.strip_prefix('<') {
        let count = rest.trim();
        if count.is_empty() {
            return Err("read needs a byte count".to_string());
        }
        let count = parse_number(count)?;
        if count > MAX_PACKET_BYTES {
            return Err(format!("read count {count} exceeds {MAX_PACKET_BYTES}"));
        }
        return Ok(Step::Read(count));
    }

    let mut tokens = text.split_whitespace();
    match tokens.next() {
        Some("reset") => match tokens.next() {
            None => Ok(Step::Reset),
            Some(extra) => Err(format!("unexpected argument '{extra}' after reset")),
        },
        Some("frame") => {
            let opcode = next_number(&mut tokens, "opcode")?;
            let param1 = next_number(&mut tokens, "param1")?;
            let param2 = next_number(&mut tokens, "param2")?;
            Ok(Step::Frame {
                opcode: narrow(opcode, "opcode")?,
                param1: narrow(param1, "param1")?,
                param2: narrow(param2, "param2")?,
                payload: parse_hex_tokens(tokens)?,
            })
        }
        Some(other) => Err(format!("unknown directive '{other}'")),
        None => Err("empty line".to_string()),
    }
}

fn next_number<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    field: &str,
) -> Result<usize, String> {
    let token = tokens
        .next()
        .ok_or_else(|| format!("frame is missing {field}"))?;
    parse_number(token)
}

fn narrow<T: TryFrom<usize>>(value: usize, field: &str) -> Result<T, String> {
    T::try_from(value).map_err(|_| format!("{field} value {value} is out of range"))
}

/// Parses a decimal or `0x`-prefixed hex number.
///
/// # Errors
///
/// Returns a message naming the offending text.
pub fn parse_number(text: &str) -> Result<usize, String> {
    let parsed = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|_| format!("invalid number '{text}'"))
}

/// Parses hex byte tokens into bytes.
///
/// # Errors
///
/// Returns a message naming the first token that is not whole hex bytes.
pub fn parse_hex_tokens<'a>(
    tokens: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<u8>, String> {
    let mut bytes = Vec::new();
    for token in tokens {
        let invalid = || format!("invalid hex byte '{token}'");
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        if digits.is_empty() || digits.len() % 2 != 0 || !digits.is_ascii() {
            return Err(invalid());
        }
        for start in (0..digits.len()).step_by(2) {
            let byte = u8::from_str_radix(&digits[start..start + 2], 16).map_err(|_| invalid())?;
            bytes.push(byte);
        }
    }
    Ok(bytes)
}

/// Parses hex byte arguments given on the command line.
///
/// # Errors
///
/// Returns [`CliError::Hex`] for the first malformed argument.
pub fn parse_hex_args<'a>(
    args: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<u8>, CliError> {
    let mut bytes = Vec::new();
    for arg in args {
        let parsed = parse_hex_tokens([arg]).map_err(|_| CliError::Hex(arg.to_string()))?;
        bytes.extend(parsed);
    }
    Ok(bytes)
}

/// Formats bytes as space-separated upper-case hex.
#[must_use]
pub fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
