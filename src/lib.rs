//! # Introduction
//!
//! interp-farm is the in-process core of an educational "interpreter farm":
//! a Forth-style stack language and a Prolog-style logic language, each run by
//! its own engine that a host feeds one command line at a time. Output is
//! returned through an [`output::OutputSink`] the host provides, and a small
//! terminal REPL built with [ratatui](https://docs.rs/ratatui) drives both.
//!
//! ## Execution pipeline
//!
//! ```text
//! Forth:  line → Tokenizer → Dictionary lookup → DataStack / ControlStack
//! Prolog: line → Lexer → Parser → Database | Query → Resolution → Solutions
//! ```
//!
//! 1. [`forth`]: the [`forth::StackEngine`]: tokenizer, data and control
//!    stacks, dictionary of built-in and user words.
//! 2. [`logic`]: the [`logic::LogicEngine`]: term parser, clause database,
//!    unification with occurs-check, depth-first resolution with cut.
//! 3. [`output`]: the two output channels (`log_output` / `debug_output`)
//!    and the [`output::BufferedSink`] recorder.
//! 4. [`config`]: [`config::Limits`], the added recursion and step bounds.
//! 5. [`session`]: one engine of each kind plus a multi-line program runner.
//! 6. [`ui`]: ratatui-based REPL; not part of the stable library API.
//!
//! ## Host contract
//!
//! Each engine exposes `execute(line) -> ExecOutcome`. The stack engine
//! returns [`ExecOutcome::Error`] when a line stops on an error; the logic
//! engine always returns [`ExecOutcome::Continue`], since an unprovable query
//! is a normal answer.

pub mod config;
pub mod constants;
pub mod forth;
pub mod logic;
pub mod output;
pub mod session;
pub mod ui;

/// Status returned to the host after executing one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutcome {
    Continue,
    Error,
}

impl ExecOutcome {
    pub fn is_error(self) -> bool {
        self == ExecOutcome::Error
    }
}
