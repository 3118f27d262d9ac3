//! Error types for the logic engine
//!
//! None of these reach the host as a failure status: the engine prints them
//! and carries on. A query that simply has no solutions is not an error.

use crate::logic::arith::EvalError;
use crate::logic::parser::ParseError;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum LogicError {
    /// Fact, rule or query text that does not parse
    MalformedClause { message: String, text: String },

    /// Arithmetic goal that could not be evaluated
    ArithmeticEval { message: String },

    /// Added proof depth or step bound was hit
    ResourceExceeded { what: &'static str, limit: usize },
}

impl LogicError {
    pub fn malformed(message: impl Into<String>, text: &str) -> Self {
        LogicError::MalformedClause {
            message: message.into(),
            text: text.trim().to_string(),
        }
    }

    pub fn from_parse(err: ParseError, text: &str) -> Self {
        LogicError::malformed(err.to_string(), text)
    }
}

impl From<EvalError> for LogicError {
    fn from(err: EvalError) -> Self {
        LogicError::ArithmeticEval {
            message: err.message,
        }
    }
}

impl fmt::Display for LogicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicError::MalformedClause { message, text } => {
                write!(f, "Malformed clause '{}': {}", text, message)
            }
            LogicError::ArithmeticEval { message } => write!(f, "Arithmetic error: {}", message),
            LogicError::ResourceExceeded { what, limit } => {
                write!(f, "Resource limit exceeded: {} (limit {})", what, limit)
            }
        }
    }
}

impl std::error::Error for LogicError {}
