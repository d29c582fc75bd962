use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

use crate::codec::Registry;

/// Program name that flips the default direction to encoding.
pub const ENCODER_NAME: &str = "encoder-ring";

pub struct Context {
    pub registry: &'static Registry,
}

impl Context {
    pub fn new(registry: &'static Registry) -> Self {
        Self { registry }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self {
            registry: Registry::global(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Decode,
    Encode,
}

impl Direction {
    pub fn from_encode_flag(encode: bool) -> Self {
        if encode {
            Direction::Encode
        } else {
            Direction::Decode
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Decode => f.write_str("decode"),
            Direction::Encode => f.write_str("encode"),
        }
    }
}

/// Process-level settings derived once from how the binary was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Invocation {
    pub default_direction: Direction,
}

impl Invocation {
    pub fn from_program_name(argv0: Option<&OsStr>) -> Self {
        let is_encoder = argv0
            .and_then(|arg| Path::new(arg).file_name())
            .and_then(OsStr::to_str)
            .map(|name| name.strip_suffix(".exe").unwrap_or(name) == ENCODER_NAME)
            .unwrap_or(false);

        Self {
            default_direction: Direction::from_encode_flag(is_encoder),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub strip_newline: bool,
    pub emit_newline: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            strip_newline: true,
            emit_newline: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeSummary {
    pub name: &'static str,
    pub encode_only: bool,
    pub description: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_decoder_by_default() {
        let inv = Invocation::from_program_name(Some(OsStr::new("/usr/bin/decoder-ring")));
        assert_eq!(inv.default_direction, Direction::Decode);
        assert_eq!(Invocation::from_program_name(None).default_direction, Direction::Decode);
    }

    #[test]
    fn test_invocation_encoder_name() {
        let inv = Invocation::from_program_name(Some(OsStr::new("/usr/local/bin/encoder-ring")));
        assert_eq!(inv.default_direction, Direction::Encode);
        let inv = Invocation::from_program_name(Some(OsStr::new("encoder-ring")));
        assert_eq!(inv.default_direction, Direction::Encode);
    }

    #[test]
    fn test_invocation_similar_name_is_decoder() {
        let inv = Invocation::from_program_name(Some(OsStr::new("encoder-ring-old")));
        assert_eq!(inv.default_direction, Direction::Decode);
    }
}
