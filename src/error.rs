use std::process::ExitCode as StdExitCode;
use thiserror::Error;

use crate::types::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    Failure = 1,
    Usage = 2,
}

impl From<ExitCode> for StdExitCode {
    fn from(code: ExitCode) -> Self {
        StdExitCode::from(code as u8)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LengthConstraint {
    Exact(usize),
    MultipleOf(usize),
}

impl std::fmt::Display for LengthConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LengthConstraint::Exact(n) => write!(f, "exactly {}", n),
            LengthConstraint::MultipleOf(n) => write!(f, "a multiple of {}", n),
        }
    }
}

#[derive(Debug, Error)]
pub enum RingError {
    #[error("unknown mode: {name}")]
    UnknownMode { name: String },

    #[error("mode {name} cannot {direction}")]
    UnsupportedDirection { name: String, direction: Direction },

    #[error("{reason}")]
    Usage { reason: String },

    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("invalid byte {byte:#04x} at position {position}")]
    InvalidByte { byte: u8, position: usize },

    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        expected: LengthConstraint,
        actual: usize,
    },

    #[error("invalid escape {sequence:?}")]
    InvalidEscape { sequence: String },

    #[error("parsing {token:?}: {reason}")]
    InvalidNumber { token: String, reason: String },

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RingError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            RingError::UnknownMode { .. }
            | RingError::UnsupportedDirection { .. }
            | RingError::Usage { .. } => ExitCode::Usage,
            RingError::InvalidInput { .. }
            | RingError::InvalidByte { .. }
            | RingError::InvalidLength { .. }
            | RingError::InvalidEscape { .. }
            | RingError::InvalidNumber { .. }
            | RingError::Json(_)
            | RingError::Pattern(_)
            | RingError::Io(_) => ExitCode::Failure,
        }
    }

    /// Errors that are reported by printing usage text instead of a message.
    pub fn is_usage(&self) -> bool {
        self.exit_code() == ExitCode::Usage
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn invalid_byte(byte: u8, position: usize) -> Self {
        Self::InvalidByte { byte, position }
    }

    pub fn invalid_length(expected: LengthConstraint, actual: usize) -> Self {
        Self::InvalidLength { expected, actual }
    }

    pub fn invalid_escape(sequence: &[u8]) -> Self {
        Self::InvalidEscape {
            sequence: String::from_utf8_lossy(sequence).into_owned(),
        }
    }

    pub fn invalid_number(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNumber {
            token: token.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_mode(name: impl Into<String>) -> Self {
        Self::UnknownMode { name: name.into() }
    }

    pub fn unsupported_direction(name: impl Into<String>, direction: Direction) -> Self {
        Self::UnsupportedDirection {
            name: name.into(),
            direction,
        }
    }

    pub fn usage(reason: impl Into<String>) -> Self {
        Self::Usage {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_errors_exit_two() {
        assert_eq!(RingError::unknown_mode("nope").exit_code(), ExitCode::Usage);
        assert_eq!(
            RingError::unsupported_direction("codepoint", Direction::Decode).exit_code(),
            ExitCode::Usage
        );
        assert!(RingError::usage("expected exactly one MODE").is_usage());
    }

    #[test]
    fn test_transform_errors_exit_one() {
        assert_eq!(RingError::invalid_byte(b'g', 0).exit_code(), ExitCode::Failure);
        assert_eq!(RingError::invalid_escape(b"%zz").exit_code(), ExitCode::Failure);
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        assert_eq!(RingError::from(io).exit_code(), ExitCode::Failure);
    }

    #[test]
    fn test_messages() {
        assert_eq!(RingError::invalid_byte(b'g', 3).to_string(), "invalid byte 0x67 at position 3");
        assert_eq!(RingError::invalid_escape(b"%zz").to_string(), "invalid escape \"%zz\"");
        assert_eq!(
            RingError::unsupported_direction("codepoint", Direction::Decode).to_string(),
            "mode codepoint cannot decode"
        );
        assert_eq!(
            RingError::invalid_length(LengthConstraint::MultipleOf(2), 3).to_string(),
            "invalid length: expected a multiple of 2, got 3"
        );
    }
}
