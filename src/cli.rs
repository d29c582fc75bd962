use std::ffi::OsString;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, CommandFactory, FromArgMatches, Parser};

use decoder_ring::codec::Registry;
use decoder_ring::error::{Result, RingError};
use decoder_ring::types::{Direction, Invocation, PipelineOptions, ENCODER_NAME};

/// Long flag names that may also be spelled with a single dash.
const LONG_FLAGS: &[&str] = &["encode", "strip", "emit", "help"];

#[derive(Parser, Debug)]
#[command(name = "decoder-ring")]
#[command(about = "Decode (or encode) stdin to stdout through a named mode")]
#[command(version)]
#[command(override_usage = "decoder-ring [-encode] [-strip=BOOL] [-emit=BOOL] <MODE>")]
pub struct Cli {
    #[arg(
        short = 'e',
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        value_name = "BOOL",
        help = "Encode instead of decode"
    )]
    pub encode: Option<bool>,

    #[arg(
        short = 's',
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value = "true",
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        value_name = "BOOL",
        help = "Strip one trailing newline from the input"
    )]
    pub strip: bool,

    #[arg(
        short = 't',
        long,
        num_args = 0..=1,
        require_equals = true,
        default_value = "true",
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        value_name = "BOOL",
        help = "Append a newline to the output"
    )]
    pub emit: bool,

    #[arg(value_name = "MODE")]
    pub modes: Vec<String>,
}

impl Cli {
    /// Exactly one mode is required.
    pub fn mode(&self) -> Result<&str> {
        match self.modes.as_slice() {
            [mode] => Ok(mode.as_str()),
            [] => Err(RingError::usage("no mode given")),
            _ => Err(RingError::usage(format!(
                "expected exactly one mode, got {}",
                self.modes.len()
            ))),
        }
    }

    pub fn direction(&self, invocation: Invocation) -> Direction {
        self.encode
            .map(Direction::from_encode_flag)
            .unwrap_or(invocation.default_direction)
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            strip_newline: self.strip,
            emit_newline: self.emit,
        }
    }
}

fn modes_help(registry: &Registry) -> String {
    format!(
        "Modes (* = encode only):\n  {}\n\n\
         Any IANA character set name (latin1, shift_jis, utf-16le, ...) also works as a mode.\n\
         Installed or linked as '{}', the default direction is encode.",
        registry.mode_list(),
        ENCODER_NAME
    )
}

pub fn command(registry: &Registry) -> clap::Command {
    Cli::command().after_help(modes_help(registry))
}

/// Rewrites `-encode`, `-strip=false` and friends to their `--` form. The
/// program name and anything after `--` are left alone.
pub fn normalize_go_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;
    for (idx, arg) in args.into_iter().enumerate() {
        if idx == 0 || passthrough {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }
        let rewritten = arg.to_str().and_then(|s| {
            let rest = s.strip_prefix('-').filter(|r| !r.starts_with('-'))?;
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            LONG_FLAGS.contains(&name).then(|| OsString::from(format!("-{}", s)))
        });
        out.push(rewritten.unwrap_or(arg));
    }
    out
}

pub fn parse<I>(args: I, registry: &Registry) -> std::result::Result<Cli, clap::Error>
where
    I: IntoIterator<Item = OsString>,
{
    let matches = command(registry).try_get_matches_from(normalize_go_flags(args))?;
    Cli::from_arg_matches(&matches)
}
