//! Built-in word implementations
//!
//! Every [`Builtin`] is executed by [`StackEngine::execute_builtin`]. The
//! engine checks the word's minimum depth first, and each operation computes
//! its result from borrowed operands before popping anything, so a failing
//! word (underflow, division by zero, domain or type error) leaves the data
//! stack exactly as it found it.
//!
//! # Operand order
//!
//! Binary words pop the top as the right operand and the next item as the
//! left operand: `a b -` computes `a - b`.
//!
//! # Numeric rules
//!
//! - `Int op Int` stays an integer (64-bit wrapping), except `/`, which is
//!   always true division and yields a float
//! - any float operand promotes the result to float
//! - `MOD` is floored: the result takes the sign of the divisor
//! - trig words take degrees
//! - comparisons, `=` and `<>` included, take two numbers or two strings

use crate::constants::MAX_SPACES;
use crate::forth::dictionary::Builtin;
use crate::forth::engine::StackEngine;
use crate::forth::errors::ForthError;
use crate::forth::value::{Value, FALSE, TRUE};
use crate::output::OutputSink;
use std::cmp::Ordering;

impl<S: OutputSink> StackEngine<S> {
    pub(crate) fn execute_builtin(&mut self, builtin: Builtin) -> Result<(), ForthError> {
        let word = builtin.name();
        self.stack.require(builtin.arity(), word)?;

        match builtin {
            // Stack manipulation
            Builtin::Dup => {
                let a = self.stack.peek(0, word)?.clone();
                self.stack.push(a);
            }
            Builtin::Drop => {
                self.stack.pop(word)?;
            }
            Builtin::Swap => {
                let b = self.stack.pop(word)?;
                let a = self.stack.pop(word)?;
                self.stack.push(b);
                self.stack.push(a);
            }
            Builtin::Over => {
                let a = self.stack.peek(1, word)?.clone();
                self.stack.push(a);
            }
            Builtin::Rot => {
                let a = self.stack.remove(2, word)?;
                self.stack.push(a);
            }
            Builtin::Nip => {
                self.stack.remove(1, word)?;
            }
            Builtin::Tuck => {
                let b = self.stack.pop(word)?;
                let a = self.stack.pop(word)?;
                self.stack.push(b.clone());
                self.stack.push(a);
                self.stack.push(b);
            }
            Builtin::TwoDup => {
                let a = self.stack.peek(1, word)?.clone();
                let b = self.stack.peek(0, word)?.clone();
                self.stack.push(a);
                self.stack.push(b);
            }
            Builtin::TwoDrop => self.stack.discard(2),
            Builtin::TwoSwap => {
                let a = self.stack.remove(3, word)?;
                let b = self.stack.remove(2, word)?;
                self.stack.push(a);
                self.stack.push(b);
            }
            Builtin::Clear => self.stack.clear(),

            // Arithmetic
            Builtin::Add => self.binary_op(word, add)?,
            Builtin::Sub => self.binary_op(word, |w, a, b| {
                numeric_op(w, a, b, i64::wrapping_sub, |x, y| x - y)
            })?,
            Builtin::Mul => self.binary_op(word, |w, a, b| {
                numeric_op(w, a, b, i64::wrapping_mul, |x, y| x * y)
            })?,
            Builtin::Div => self.binary_op(word, divide)?,
            Builtin::Mod => self.binary_op(word, modulo)?,
            Builtin::Negate => self.unary_op(word, |w, a| match a {
                Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
                Value::Float(x) => Ok(Value::Float(-x)),
                other => Err(type_mismatch(w, "number", other)),
            })?,
            Builtin::Abs => self.unary_op(word, |w, a| match a {
                Value::Int(n) => Ok(Value::Int(n.wrapping_abs())),
                Value::Float(x) => Ok(Value::Float(x.abs())),
                other => Err(type_mismatch(w, "number", other)),
            })?,
            Builtin::Min => self.binary_op(word, |w, a, b| {
                let ordering = compare(w, a, b)?;
                Ok(if ordering == Some(Ordering::Greater) {
                    b.clone()
                } else {
                    a.clone()
                })
            })?,
            Builtin::Max => self.binary_op(word, |w, a, b| {
                let ordering = compare(w, a, b)?;
                Ok(if ordering == Some(Ordering::Less) {
                    b.clone()
                } else {
                    a.clone()
                })
            })?,

            // Comparison
            Builtin::Eq => self.binary_op(word, |w, a, b| Ok(Value::from_bool(equals(w, a, b)?)))?,
            Builtin::Ne => self.binary_op(word, |w, a, b| Ok(Value::from_bool(!equals(w, a, b)?)))?,
            Builtin::Lt => self.compare_op(word, |o| o == Ordering::Less)?,
            Builtin::Gt => self.compare_op(word, |o| o == Ordering::Greater)?,
            Builtin::Le => self.compare_op(word, |o| o != Ordering::Greater)?,
            Builtin::Ge => self.compare_op(word, |o| o != Ordering::Less)?,
            Builtin::ZeroEq => self.unary_op(word, |w, a| {
                Ok(Value::from_bool(expect_number(w, a)? == 0.0))
            })?,
            Builtin::ZeroLt => self.unary_op(word, |w, a| {
                Ok(Value::from_bool(expect_number(w, a)? < 0.0))
            })?,
            Builtin::ZeroGt => self.unary_op(word, |w, a| {
                Ok(Value::from_bool(expect_number(w, a)? > 0.0))
            })?,

            // Bitwise
            Builtin::And => self.bitwise_op(word, |x, y| x & y)?,
            Builtin::Or => self.bitwise_op(word, |x, y| x | y)?,
            Builtin::Xor => self.bitwise_op(word, |x, y| x ^ y)?,
            Builtin::Invert => self.unary_op(word, |w, a| Ok(Value::Int(!expect_int(w, a)?)))?,
            Builtin::Not => self.unary_op(word, |_, a| Ok(Value::from_bool(!a.is_truthy())))?,

            // I/O
            Builtin::Print => {
                let value = self.stack.pop(word)?;
                self.sink.log_output(&value.to_string());
            }
            Builtin::PrintStack => {
                let mut line = format!("<{}>", self.stack.depth());
                for value in self.stack.items() {
                    line.push(' ');
                    line.push_str(&value.repr());
                }
                self.sink.log_output(&line);
            }
            Builtin::Cr => self.sink.log_output(""),
            Builtin::Emit => {
                let code = expect_int(word, self.stack.peek(0, word)?)?;
                let ch = u32::try_from(code)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| ForthError::DomainError {
                        word: word.to_string(),
                        message: format!("{} is not a valid character code", code),
                    })?;
                self.stack.pop(word)?;
                self.sink.log_output(&ch.to_string());
            }
            Builtin::Spaces => {
                let count = expect_int(word, self.stack.peek(0, word)?)?;
                if count > MAX_SPACES {
                    return Err(ForthError::DomainError {
                        word: word.to_string(),
                        message: format!("{} exceeds the limit of {} spaces", count, MAX_SPACES),
                    });
                }
                self.stack.pop(word)?;
                self.sink.log_output(&" ".repeat(count.max(0) as usize));
            }
            Builtin::Words => {
                let names = self.dictionary.names().join(" ");
                self.sink.log_output(&names);
            }

            // Math
            Builtin::Sin => self.math_op(word, |x| Ok(x.to_radians().sin()))?,
            Builtin::Cos => self.math_op(word, |x| Ok(x.to_radians().cos()))?,
            Builtin::Tan => self.math_op(word, |x| Ok(x.to_radians().tan()))?,
            Builtin::Sqrt => self.math_op(word, |x| {
                if x < 0.0 {
                    Err("square root of a negative number".to_string())
                } else {
                    Ok(x.sqrt())
                }
            })?,
            Builtin::Log => self.math_op(word, |x| {
                if x <= 0.0 {
                    Err("logarithm of a non-positive number".to_string())
                } else {
                    Ok(x.ln())
                }
            })?,
            Builtin::Exp => self.math_op(word, |x| Ok(x.exp()))?,

            // Stack queries
            Builtin::Depth => {
                let depth = self.stack.depth() as i64;
                self.stack.push(Value::Int(depth));
            }
            Builtin::Pick => {
                let n = self.stack_index(word)?;
                self.stack.pop(word)?;
                let item = self.stack.peek(n, word)?.clone();
                self.stack.push(item);
            }
            Builtin::Roll => {
                let n = self.stack_index(word)?;
                self.stack.pop(word)?;
                let item = self.stack.remove(n, word)?;
                self.stack.push(item);
            }

            // Named constants
            Builtin::True => self.stack.push(TRUE),
            Builtin::False => self.stack.push(FALSE),
            Builtin::Pi => self.stack.push(Value::Float(std::f64::consts::PI)),
            Builtin::E => self.stack.push(Value::Float(std::f64::consts::E)),

            // Placeholders
            Builtin::Variable | Builtin::Constant | Builtin::Store | Builtin::Fetch => {
                self.sink
                    .log_output(&format!("{} is not implemented", word));
            }
        }

        Ok(())
    }

    /// Replace the top two items with `op(left, right)`
    fn binary_op<F>(&mut self, word: &str, op: F) -> Result<(), ForthError>
    where
        F: FnOnce(&str, &Value, &Value) -> Result<Value, ForthError>,
    {
        let right = self.stack.peek(0, word)?;
        let left = self.stack.peek(1, word)?;
        let result = op(word, left, right)?;
        self.stack.discard(2);
        self.stack.push(result);
        Ok(())
    }

    /// Replace the top item with `op(item)`
    fn unary_op<F>(&mut self, word: &str, op: F) -> Result<(), ForthError>
    where
        F: FnOnce(&str, &Value) -> Result<Value, ForthError>,
    {
        let result = op(word, self.stack.peek(0, word)?)?;
        self.stack.discard(1);
        self.stack.push(result);
        Ok(())
    }

    fn compare_op<F>(&mut self, word: &str, test: F) -> Result<(), ForthError>
    where
        F: FnOnce(Ordering) -> bool,
    {
        self.binary_op(word, |w, a, b| {
            let ordering = compare(w, a, b)?;
            Ok(Value::from_bool(ordering.is_some_and(test)))
        })
    }

    fn bitwise_op<F>(&mut self, word: &str, op: F) -> Result<(), ForthError>
    where
        F: FnOnce(i64, i64) -> i64,
    {
        self.binary_op(word, |w, a, b| {
            Ok(Value::Int(op(expect_int(w, a)?, expect_int(w, b)?)))
        })
    }

    /// Float-valued math function; `Err(message)` is a domain error
    fn math_op<F>(&mut self, word: &str, f: F) -> Result<(), ForthError>
    where
        F: FnOnce(f64) -> Result<f64, String>,
    {
        self.unary_op(word, |w, a| {
            let x = expect_number(w, a)?;
            f(x).map(Value::Float).map_err(|message| ForthError::DomainError {
                word: w.to_string(),
                message,
            })
        })
    }

    /// Validate the `n` on top of the stack for `PICK`/`ROLL` without popping it
    fn stack_index(&self, word: &str) -> Result<usize, ForthError> {
        let n = expect_int(word, self.stack.peek(0, word)?)?;
        let depth = self.stack.depth() - 1;
        if n < 0 || n as usize >= depth {
            return Err(ForthError::InvalidIndex {
                word: word.to_string(),
                index: n,
                depth,
            });
        }
        Ok(n as usize)
    }
}

fn type_mismatch(word: &str, expected: &str, got: &Value) -> ForthError {
    ForthError::TypeMismatch {
        word: word.to_string(),
        expected: expected.to_string(),
        got: got.type_name().to_string(),
    }
}

fn expect_number(word: &str, value: &Value) -> Result<f64, ForthError> {
    value
        .as_f64()
        .ok_or_else(|| type_mismatch(word, "number", value))
}

fn expect_int(word: &str, value: &Value) -> Result<i64, ForthError> {
    value
        .as_int()
        .ok_or_else(|| type_mismatch(word, "integer", value))
}

/// Integer op when both sides are integers, float op otherwise
fn numeric_op(
    word: &str,
    a: &Value,
    b: &Value,
    int_op: fn(i64, i64) -> i64,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, ForthError> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(int_op(*x, *y))),
        _ => Ok(Value::Float(float_op(
            expect_number(word, a)?,
            expect_number(word, b)?,
        ))),
    }
}

fn add(word: &str, a: &Value, b: &Value) -> Result<Value, ForthError> {
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => Ok(Value::Str(format!("{}{}", x, y))),
        _ => numeric_op(word, a, b, i64::wrapping_add, |x, y| x + y),
    }
}

fn divide(word: &str, a: &Value, b: &Value) -> Result<Value, ForthError> {
    let x = expect_number(word, a)?;
    let y = expect_number(word, b)?;
    if y == 0.0 {
        return Err(ForthError::DivisionByZero {
            word: word.to_string(),
        });
    }
    Ok(Value::Float(x / y))
}

fn modulo(word: &str, a: &Value, b: &Value) -> Result<Value, ForthError> {
    let zero = ForthError::DivisionByZero {
        word: word.to_string(),
    };
    match (a, b) {
        (Value::Int(_), Value::Int(0)) => Err(zero),
        (Value::Int(x), Value::Int(y)) => {
            let r = x.wrapping_rem(*y);
            Ok(Value::Int(if r != 0 && ((r < 0) != (*y < 0)) { r + y } else { r }))
        }
        _ => {
            let x = expect_number(word, a)?;
            let y = expect_number(word, b)?;
            if y == 0.0 {
                return Err(zero);
            }
            let r = x % y;
            Ok(Value::Float(if r != 0.0 && ((r < 0.0) != (y < 0.0)) { r + y } else { r }))
        }
    }
}

/// Numbers compare by value across Int and Float; a string only equals a string
fn equals(word: &str, a: &Value, b: &Value) -> Result<bool, ForthError> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(x == y),
        (Value::Str(x), Value::Str(y)) => Ok(x == y),
        (Value::Str(_), other) | (other, Value::Str(_)) => {
            Err(type_mismatch(word, "two numbers or two strings", other))
        }
        _ => Ok(a.as_f64() == b.as_f64()),
    }
}

/// Ordering between two values; `None` when a float NaN is involved
fn compare(word: &str, a: &Value, b: &Value) -> Result<Option<Ordering>, ForthError> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(Some(x.cmp(y))),
        (Value::Str(x), Value::Str(y)) => Ok(Some(x.cmp(y))),
        (Value::Str(_), other) | (other, Value::Str(_)) => {
            Err(type_mismatch(word, "two numbers or two strings", other))
        }
        _ => Ok(expect_number(word, a)?.partial_cmp(&expect_number(word, b)?)),
    }
}
