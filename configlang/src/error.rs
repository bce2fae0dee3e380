//! Error taxonomy shared by the interpreter and the host API.
//!
//! Every fallible operation returns [`Result`]; callers branch on
//! [`Error::kind`] (or its numeric [`ErrorKind::code`]), never on the message
//! text.

use std::path::PathBuf;

use thiserror::Error;

// ── ErrorKind ─────────────────────────────────────────────────────────────────

/// Coarse failure category with a stable numeric code.
///
/// Success is `0`; every kind maps to a distinct negative code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    Io,
    Parse,
    VariableNotFound,
    ConstViolation,
    CapacityExceeded,
    TypeMismatch,
    Unknown,
}

impl ErrorKind {
    pub const OK: i32 = 0;

    pub fn code(self) -> i32 {
        match self {
            ErrorKind::InvalidArgument => -1,
            ErrorKind::Io => -2,
            ErrorKind::Parse => -3,
            ErrorKind::VariableNotFound => -4,
            ErrorKind::ConstViolation => -5,
            ErrorKind::CapacityExceeded => -6,
            ErrorKind::TypeMismatch => -7,
            ErrorKind::Unknown => -8,
        }
    }

    /// Map a numeric code back to its kind.
    ///
    /// Returns `None` for [`ErrorKind::OK`]; codes outside the table map to
    /// [`ErrorKind::Unknown`].
    pub fn from_code(code: i32) -> Option<ErrorKind> {
        let kind = match code {
            Self::OK => return None,
            -1 => ErrorKind::InvalidArgument,
            -2 => ErrorKind::Io,
            -3 => ErrorKind::Parse,
            -4 => ErrorKind::VariableNotFound,
            -5 => ErrorKind::ConstViolation,
            -6 => ErrorKind::CapacityExceeded,
            -7 => ErrorKind::TypeMismatch,
            _ => ErrorKind::Unknown,
        };
        Some(kind)
    }
}

// ── Error ─────────────────────────────────────────────────────────────────────

/// A failed load, lookup, update, or save.
///
/// Variants raised while executing a script carry the 1-based source line;
/// host API calls leave it as `None`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("cannot {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("{}variable '{name}' not found", at_line(.line))]
    VariableNotFound { name: String, line: Option<usize> },

    #[error("{}cannot modify const variable '{name}'", at_line(.line))]
    ConstViolation { name: String, line: Option<usize> },

    #[error("{}too many variables (limit is {limit})", at_line(.line))]
    CapacityExceeded { limit: usize, line: Option<usize> },

    #[error("{}variable '{name}' is {found}, expected {expected}", at_line(.line))]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
        line: Option<usize>,
    },
}

fn at_line(line: &Option<usize>) -> String {
    line.map(|n| format!("line {n}: ")).unwrap_or_default()
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::Io { .. } => ErrorKind::Io,
            Error::Parse { .. } => ErrorKind::Parse,
            Error::VariableNotFound { .. } => ErrorKind::VariableNotFound,
            Error::ConstViolation { .. } => ErrorKind::ConstViolation,
            Error::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
        }
    }

    /// Shorthand for `self.kind().code()`.
    pub fn code(&self) -> i32 {
        self.kind().code()
    }

    /// Source line the error was raised on, if it came from a script.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Parse { line, .. } => Some(*line),
            Error::VariableNotFound { line, .. }
            | Error::ConstViolation { line, .. }
            | Error::CapacityExceeded { line, .. }
            | Error::TypeMismatch { line, .. } => *line,
            Error::InvalidArgument(_) | Error::Io { .. } => None,
        }
    }

    /// Attach a script line to an error raised by the store.
    pub(crate) fn at(mut self, at: usize) -> Self {
        match &mut self {
            Error::VariableNotFound { line, .. }
            | Error::ConstViolation { line, .. }
            | Error::CapacityExceeded { line, .. }
            | Error::TypeMismatch { line, .. } => *line = Some(at),
            Error::InvalidArgument(_) | Error::Io { .. } | Error::Parse { .. } => {}
        }
        self
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse { line, message: message.into() }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_and_negative() {
        let kinds = [
            ErrorKind::InvalidArgument,
            ErrorKind::Io,
            ErrorKind::Parse,
            ErrorKind::VariableNotFound,
            ErrorKind::ConstViolation,
            ErrorKind::CapacityExceeded,
            ErrorKind::TypeMismatch,
            ErrorKind::Unknown,
        ];
        for (i, kind) in kinds.iter().enumerate() {
            assert_eq!(kind.code(), -(i as i32) - 1);
            assert_eq!(ErrorKind::from_code(kind.code()), Some(*kind));
        }
    }

    #[test]
    fn from_code_edges() {
        assert_eq!(ErrorKind::from_code(ErrorKind::OK), None);
        assert_eq!(ErrorKind::from_code(-42), Some(ErrorKind::Unknown));
        assert_eq!(ErrorKind::from_code(7), Some(ErrorKind::Unknown));
    }

    #[test]
    fn parse_error_display() {
        let err = Error::parse(3, "expected '='");
        assert_eq!(err.to_string(), "line 3: expected '='");
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn host_errors_have_no_line_prefix() {
        let err = Error::VariableNotFound { name: "x".into(), line: None };
        assert_eq!(err.to_string(), "variable 'x' not found");
        assert_eq!(err.line(), None);
    }

    #[test]
    fn at_attaches_line() {
        let err = Error::ConstViolation { name: "max".into(), line: None }.at(7);
        assert_eq!(err.to_string(), "line 7: cannot modify const variable 'max'");
        assert_eq!(err.code(), -5);
    }

    #[test]
    fn at_keeps_parse_line() {
        let err = Error::parse(2, "unexpected token").at(9);
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn type_mismatch_display() {
        let err = Error::TypeMismatch {
            name: "name".into(),
            expected: "integer",
            found: "string",
            line: None,
        };
        assert_eq!(err.to_string(), "variable 'name' is string, expected integer");
    }
}
