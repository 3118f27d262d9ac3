//! Stack cell representation
//!
//! This module defines the [`Value`] enum held by every data stack cell.
//!
//! # Value Types
//!
//! - [`Value::Int`]: 64-bit signed integer
//! - [`Value::Float`]: 64-bit float
//! - [`Value::Str`]: string literal contents (quotes already stripped)
//!
//! # Booleans
//!
//! There is no boolean variant. Comparison words push `Int(-1)` for true and
//! `Int(0)` for false; any non-zero number is truthy when consumed by `IF`,
//! `UNTIL` or `WHILE`.

use std::fmt;

pub const TRUE: Value = Value::Int(-1);
pub const FALSE: Value = Value::Int(0);

/// Runtime values on the data stack
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn from_bool(flag: bool) -> Self {
        if flag {
            TRUE
        } else {
            FALSE
        }
    }

    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
        }
    }

    /// Get the integer value, returns None if not an Int
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view of the value, promoting integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            Value::Str(_) => None,
        }
    }

    /// Forth truthiness: any non-zero number
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::Str(s) => !s.is_empty(),
        }
    }

    /// Rendering used by `.S`, where strings keep their quotes
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => format!("\"{}\"", s),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Integral floats keep one decimal place so they stay visibly floats
pub fn format_float(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_formatting() {
        assert_eq!(Value::Float(5.0).to_string(), "5.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Float(-0.25).to_string(), "-0.25");
    }

    #[test]
    fn test_truthiness() {
        assert!(TRUE.is_truthy());
        assert!(!FALSE.is_truthy());
        assert!(Value::Float(0.5).is_truthy());
    }

    #[test]
    fn test_repr_quotes_strings() {
        assert_eq!(Value::Str("hi".into()).repr(), "\"hi\"");
        assert_eq!(Value::Str("hi".into()).to_string(), "hi");
    }
}
