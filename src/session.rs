//! Host-side glue: one engine of each language and a program runner
//!
//! A [`Session`] is what the REPL and the batch runner talk to. Each engine
//! keeps its own [`BufferedSink`]; callers drain output after every call.
//!
//! Programs run line by line. A Forth line that fails stops the program,
//! while Prolog lines never do: an unprovable query is an answer, not an
//! error.

use crate::config::Limits;
use crate::forth::StackEngine;
use crate::logic::LogicEngine;
use crate::output::{BufferedSink, OutputLine};
use crate::ExecOutcome;
use std::fmt;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Forth,
    Prolog,
}

impl Language {
    /// The other language (Tab in the REPL)
    pub fn toggle(self) -> Language {
        match self {
            Language::Forth => Language::Prolog,
            Language::Prolog => Language::Forth,
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            Language::Forth => "forth> ",
            Language::Prolog => "prolog> ",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Forth => write!(f, "forth"),
            Language::Prolog => write!(f, "prolog"),
        }
    }
}

/// Error for an unrecognised language name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLanguage(pub String);

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown language '{}' (expected forth or prolog)", self.0)
    }
}

impl std::error::Error for UnknownLanguage {}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forth" | "fs" | "4th" => Ok(Language::Forth),
            "prolog" | "pl" => Ok(Language::Prolog),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

/// Outcome of [`Session::run_program`]
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramReport {
    /// Non-blank lines handed to the engine
    pub executed_lines: usize,
    /// 1-based line number of the line that stopped the program
    pub stopped_at: Option<usize>,
    pub output: Vec<OutputLine>,
}

impl ProgramReport {
    pub fn completed(&self) -> bool {
        self.stopped_at.is_none()
    }
}

pub struct Session {
    forth: StackEngine<BufferedSink>,
    prolog: LogicEngine<BufferedSink>,
}

impl Session {
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    pub fn with_limits(limits: Limits) -> Self {
        Session {
            forth: StackEngine::with_limits(BufferedSink::new(), limits),
            prolog: LogicEngine::with_limits(BufferedSink::new(), limits),
        }
    }

    /// Execute one line; its output stays buffered until [`Session::take_output`]
    pub fn execute(&mut self, language: Language, line: &str) -> ExecOutcome {
        match language {
            Language::Forth => self.forth.execute(line),
            Language::Prolog => self.prolog.execute(line),
        }
    }

    /// Drain buffered output of one engine
    pub fn take_output(&mut self, language: Language) -> Vec<OutputLine> {
        match language {
            Language::Forth => self.forth.sink_mut().take(),
            Language::Prolog => self.prolog.sink_mut().take(),
        }
    }

    /// Run a multi-line program
    pub fn run_program(&mut self, language: Language, text: &str) -> ProgramReport {
        let mut report = ProgramReport {
            executed_lines: 0,
            stopped_at: None,
            output: Vec::new(),
        };

        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            report.executed_lines += 1;
            let outcome = self.execute(language, line);
            report.output.extend(self.take_output(language));

            if outcome.is_error() {
                report.stopped_at = Some(index + 1);
                info!(%language, line = index + 1, "program stopped on error");
                break;
            }
        }

        report
    }

    /// Reset one engine to its initial state
    pub fn reset(&mut self, language: Language) {
        match language {
            Language::Forth => self.forth.reset(),
            Language::Prolog => self.prolog.reset(),
        }
        self.take_output(language);
    }

    pub fn forth(&self) -> &StackEngine<BufferedSink> {
        &self.forth
    }

    pub fn prolog(&self) -> &LogicEngine<BufferedSink> {
        &self.prolog
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_str() {
        assert_eq!("forth".parse::<Language>(), Ok(Language::Forth));
        assert_eq!("Prolog".parse::<Language>(), Ok(Language::Prolog));
        assert!("cobol".parse::<Language>().is_err());
        assert_eq!(Language::Forth.toggle(), Language::Prolog);
        assert_eq!(Language::Prolog.to_string(), "prolog");
    }
}
