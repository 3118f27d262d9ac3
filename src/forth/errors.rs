//! Error types for the stack engine
//!
//! This module defines [`ForthError`], covering everything that can stop a
//! command line early. None of these escape to the host: the engine turns each
//! one into a message on its output sink and returns
//! [`ExecOutcome::Error`](crate::ExecOutcome::Error).

use std::fmt;

/// Errors raised while tokenizing, compiling or executing a line
#[derive(Debug, Clone, PartialEq)]
pub enum ForthError {
    /// Fewer items on the data stack than the word consumes
    StackUnderflow { word: String },

    /// Token is neither a literal nor a dictionary entry
    UnknownWord { name: String },

    /// `/` or `MOD` with a zero divisor
    DivisionByZero { word: String },

    /// Math function applied outside its domain (`SQRT` of a negative, `LOG` of a non-positive)
    DomainError { word: String, message: String },

    /// `PICK`/`ROLL` index outside the stack
    InvalidIndex {
        word: String,
        index: i64,
        depth: usize,
    },

    /// A `"` with no closing quote
    UnterminatedString { position: usize },

    /// Operand of the wrong kind (e.g. a string given to `*`)
    TypeMismatch {
        word: String,
        expected: String,
        got: String,
    },

    /// Malformed definition or control structure
    CompileError { message: String },

    /// Return stack grew past the configured call depth
    ResourceExceeded { limit: usize },
}

impl ForthError {
    /// Type mismatches are caught operator failures; they also get a diagnostic line
    pub fn is_internal(&self) -> bool {
        matches!(self, ForthError::TypeMismatch { .. })
    }
}

impl fmt::Display for ForthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForthError::StackUnderflow { word } => write!(f, "Stack underflow in {}", word),
            ForthError::UnknownWord { name } => write!(f, "Unknown word: {}", name),
            ForthError::DivisionByZero { word } => write!(f, "Division by zero in {}", word),
            ForthError::DomainError { word, message } => {
                write!(f, "Domain error in {}: {}", word, message)
            }
            ForthError::InvalidIndex { word, index, depth } => {
                write!(
                    f,
                    "Invalid index {} for {} (depth {})",
                    index, word, depth
                )
            }
            ForthError::UnterminatedString { position } => {
                write!(f, "Unterminated string starting at column {}", position + 1)
            }
            ForthError::TypeMismatch {
                word,
                expected,
                got,
            } => {
                write!(f, "Type error in {}: expected {}, got {}", word, expected, got)
            }
            ForthError::CompileError { message } => write!(f, "Compile error: {}", message),
            ForthError::ResourceExceeded { limit } => {
                write!(f, "Return stack overflow (limit {})", limit)
            }
        }
    }
}

impl std::error::Error for ForthError {}
