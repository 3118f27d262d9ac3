//! Prolog-style logic language engine
//!
//! - [`term`]: [`Term`] and [`Clause`]
//! - [`lexer`] / [`parser`]: tokens, terms, clause heads and goals
//! - [`arith`]: safe arithmetic expressions for `is` and comparisons
//! - [`bindings`]: [`Bindings`], `unify` with occurs-check
//! - [`database`]: clauses grouped by predicate in definition order
//! - [`errors`]: [`LogicError`]
//! - [`engine`]: [`LogicEngine`], line classification and reporting
//! - `solve`: `impl LogicEngine` block with the resolution search
//!
//! # Lines
//!
//! A line containing `:-` defines a rule, a line starting with `?-` is a
//! query, a line with parentheses defines a fact, and anything else is a
//! command (`LISTING`, `TRACE`, `NOTRACE`, `RESET`). Rule bodies are stored
//! as goal text and parsed on each use.

pub mod arith;
pub mod bindings;
pub mod database;
pub mod engine;
pub mod errors;
pub mod lexer;
pub mod parser;
mod solve;
pub mod term;

pub use bindings::{unify, unify_args, Bindings};
pub use database::Database;
pub use engine::{classify, LineKind, LogicEngine};
pub use errors::LogicError;
pub use parser::{parse_goal, Goal, ParseError};
pub use term::{Clause, Number, Term};
