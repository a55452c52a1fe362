//! CLI entry point for the `atecc-replay` binary.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use atecc_cli::{init_logging, parse_hex_args, parse_transcript, replay, resolve_config, CliError};
use atecc_core::{crc16, crc16_le_bytes, Device};
#[cfg(test)]
use tempfile as _;
use thiserror as _;
use tracing as _;
use tracing_subscriber as _;

const USAGE_TEXT: &str = "\
Usage: atecc-replay <command> [options]

Commands:
  replay <transcript> [options]  Run a bus transcript against a fresh device
  crc <hex bytes...>             Print the frame checksum of the given bytes

Options:
  --seed <n>           Fixed RNG seed (overrides the config file)
  --config <file>      JSON device configuration
  -v, --verbose        Debug logging and a diagnostics dump on stderr
  -h, --help           Show this help message

Examples:
  atecc-replay replay random.txt --seed 7
  atecc-replay crc 07 1B 00 00 00
";

/// Exit status for I/O, parse and replay failures.
const EXIT_FAILURE: i32 = 1;
/// Exit status for malformed command lines.
const EXIT_USAGE: i32 = 2;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Replay(ReplayArgs),
    Crc(Vec<String>),
}

impl Command {
    const fn verbose(&self) -> bool {
        match self {
            Self::Replay(args) => args.verbose,
            Self::Crc(_) => false,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Default)]
struct ReplayArgs {
    transcript: PathBuf,
    seed: Option<u64>,
    config: Option<PathBuf>,
    verbose: bool,
}

#[derive(Debug)]
enum ParseResult {
    Command(Command),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let first = args.next().ok_or_else(|| "missing command".to_string())?;

    if first == "--help" || first == "-h" {
        return Ok(ParseResult::Help);
    }

    let command_str = first.to_string_lossy().to_string();

    match command_str.as_str() {
        "replay" => parse_replay_args(args)
            .map(Command::Replay)
            .map(ParseResult::Command),
        "crc" => Ok(ParseResult::Command(Command::Crc(
            args.map(|arg| arg.to_string_lossy().into_owned()).collect(),
        ))),
        other => Err(format!("unknown command: {other}")),
    }
}

#[allow(clippy::while_let_on_iterator)]
fn parse_replay_args(mut args: impl Iterator<Item = OsString>) -> Result<ReplayArgs, String> {
    let mut transcript: Option<PathBuf> = None;
    let mut parsed = ReplayArgs::default();

    while let Some(arg) = args.next() {
        if arg == "--verbose" || arg == "-v" {
            parsed.verbose = true;
            continue;
        }

        if arg == "--seed" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for --seed".to_string())?;
            let text = value.to_string_lossy();
            let seed = text
                .parse()
                .map_err(|_| format!("invalid seed: {text}"))?;
            parsed.seed = Some(seed);
            continue;
        }

        if arg == "--config" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for --config".to_string())?;
            parsed.config = Some(PathBuf::from(value));
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if transcript.is_some() {
            return Err("multiple transcript paths provided".to_string());
        }
        transcript = Some(PathBuf::from(arg));
    }

    parsed.transcript = transcript.ok_or_else(|| "missing transcript path".to_string())?;
    Ok(parsed)
}

fn run_replay(args: &ReplayArgs) -> Result<(), CliError> {
    let config = resolve_config(args.config.as_deref(), args.seed)?;
    let source = fs::read_to_string(&args.transcript).map_err(|source| CliError::Read {
        path: args.transcript.clone(),
        source,
    })?;
    let steps = parse_transcript(&source)?;

    let mut device = Device::new(config);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    replay(&mut device, &steps, &mut out)?;
    out.flush()?;

    if args.verbose {
        let dump = serde_json::to_string_pretty(device.diagnostics())
            .unwrap_or_else(|err| format!("<diagnostics unavailable: {err}>"));
        eprintln!("{dump}");
    }
    Ok(())
}

fn run_crc(args: &[String]) -> Result<(), CliError> {
    let bytes = parse_hex_args(args.iter().map(String::as_str))?;
    let [lo, hi] = crc16_le_bytes(&bytes);
    println!("0x{:04X} ({lo:02X} {hi:02X})", crc16(&bytes));
    Ok(())
}

fn report(result: Result<(), CliError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err}");
            EXIT_FAILURE
        }
    }
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Command(command)) => {
            init_logging(command.verbose());
            match command {
                Command::Replay(args) => report(run_replay(&args)),
                Command::Crc(args) => report(run_crc(&args)),
            }
        }
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            EXIT_USAGE
        }
    };

    std::process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::path::PathBuf;

    fn os_args(args: &[&str]) -> impl Iterator<Item = OsString> {
        args.iter()
            .map(OsString::from)
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn parses_replay_command_with_options() {
        let result = parse_replay_args(os_args(&[
            "session.txt",
            "--seed",
            "42",
            "--config",
            "strict.json",
            "-v",
        ]))
        .expect("valid replay args should parse");

        assert_eq!(
            result,
            ReplayArgs {
                transcript: PathBuf::from("session.txt"),
                seed: Some(42),
                config: Some(PathBuf::from("strict.json")),
                verbose: true,
            }
        );
    }

    #[test]
    fn parses_crc_command() {
        let result = parse_args(os_args(&["crc", "07", "1B"])).expect("crc should parse");
        assert!(matches!(
            result,
            ParseResult::Command(Command::Crc(ref bytes)) if bytes == &["07", "1B"]
        ));
    }

    #[test]
    fn only_verbose_replay_raises_log_level() {
        let ParseResult::Command(replay) =
            parse_args(os_args(&["replay", "t.txt", "-v"])).expect("replay parses")
        else {
            panic!("expected a command");
        };
        assert!(replay.verbose());

        let ParseResult::Command(crc) = parse_args(os_args(&["crc", "07"])).expect("crc parses")
        else {
            panic!("expected a command");
        };
        assert!(!crc.verbose());
    }

    #[test]
    fn parses_help_flag() {
        let result = parse_args(os_args(&["-h"])).expect("help should parse without error");
        assert!(matches!(result, ParseResult::Help));
    }

    #[test]
    fn rejects_unknown_command() {
        let error = parse_args(os_args(&["flash"])).expect_err("unknown command should fail");
        assert!(error.contains("unknown command"));
    }

    #[test]
    fn rejects_bad_seed_and_missing_transcript() {
        let error = parse_replay_args(os_args(&["t.txt", "--seed", "abc"]))
            .expect_err("seed must be numeric");
        assert!(error.contains("invalid seed"));

        let error = parse_replay_args(os_args(&["--verbose"])).expect_err("missing path");
        assert!(error.contains("missing transcript"));

        let error = parse_replay_args(os_args(&["a.txt", "b.txt"])).expect_err("two paths");
        assert!(error.contains("multiple transcript"));
    }

    #[test]
    fn crc_rejects_malformed_hex() {
        assert!(run_crc(&["0Z".to_string()]).is_err());
        assert!(run_crc(&["07".to_string(), "1B".to_string()]).is_ok());
    }
}
