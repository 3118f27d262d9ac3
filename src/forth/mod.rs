//! Forth-style stack language engine
//!
//! - [`tokenizer`]: comment stripping, string literals, whitespace splitting
//! - [`value`]: stack cell representation (Int, Float, Str)
//! - [`stack`]: data stack and control stack
//! - [`dictionary`]: built-in operations and user definitions
//! - [`errors`]: [`ForthError`]
//! - [`engine`]: [`StackEngine`], the `execute` entry point and definition protocol
//! - `builtins`, `control`: `impl StackEngine` blocks for built-in and control words
//!
//! # Execution Model
//!
//! A line is tokenized, then executed one token at a time. The first failing
//! token stops the line; the error is printed and `execute` returns
//! [`ExecOutcome::Error`](crate::ExecOutcome::Error). A `: NAME ... ;`
//! definition captures tokens verbatim, so references inside it are resolved
//! only when the word runs.

mod builtins;
mod control;
pub mod dictionary;
pub mod engine;
pub mod errors;
pub mod stack;
pub mod tokenizer;
pub mod value;

pub use dictionary::{Builtin, Dictionary, Word};
pub use engine::{CompilationState, StackEngine};
pub use errors::ForthError;
pub use stack::{ControlMarker, ControlStack, DataStack};
pub use value::Value;
