use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Result type alias for operations that can produce an interpreter error.
pub type RunResult<T> = Result<T, Exception>;

/// The four interpreter error kinds.
///
/// Uses strum derives for automatic `Display`, `FromStr`, and `Into<&'static str>`
/// implementations. The string representation is the wire-exact spelling a host
/// test harness matches on (e.g. `ErrorKind::TypeError` -> "TYPE_ERROR").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Parser failure or an unrecognized statement/expression head.
    #[strum(serialize = "SYNTAX_ERROR")]
    SyntaxError,
    /// Type mismatches: unknown type names, operators on the wrong operand
    /// type, non-bool conditions, return/field/assignment mismatches,
    /// duplicate class names.
    #[strum(serialize = "TYPE_ERROR")]
    TypeError,
    /// Name failures: unknown methods and variables, duplicate definitions
    /// within a class, duplicate formals and `let` bindings, arity exhaustion,
    /// and the parameter-value mismatch quirk.
    #[strum(serialize = "NAME_ERROR")]
    NameError,
    /// Runtime faults: null dereference, division by zero, exhausted input.
    #[strum(serialize = "FAULT_ERROR")]
    FaultError,
}

/// A terminal interpreter error.
///
/// Every error aborts the program run; there is no catch mechanism in the
/// language. The line number is the source line of the originating token when
/// one exists — errors raised on behalf of a call site carry the caller's
/// line, not the callee's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exception {
    /// Which of the four kinds this error is.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
    /// 1-based source line of the originating token, if it has one.
    pub line: Option<u32>,
}

impl Exception {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
        }
    }

    pub(crate) fn syntax_error(message: impl Into<String>, line: Option<u32>) -> Self {
        Self::new(ErrorKind::SyntaxError, message, line)
    }

    pub(crate) fn type_error(message: impl Into<String>, line: Option<u32>) -> Self {
        Self::new(ErrorKind::TypeError, message, line)
    }

    pub(crate) fn name_error(message: impl Into<String>, line: Option<u32>) -> Self {
        Self::new(ErrorKind::NameError, message, line)
    }

    pub(crate) fn fault_error(message: impl Into<String>, line: Option<u32>) -> Self {
        Self::new(ErrorKind::FaultError, message, line)
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(line) = self.line {
            write!(f, " (line {line})")?;
        }
        Ok(())
    }
}

impl std::error::Error for Exception {}
