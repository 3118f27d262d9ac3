//! Control-structure words (`IF ELSE THEN BEGIN UNTIL WHILE REPEAT`).
//!
//! These words never jump. They push and pop [`ControlMarker`]s on the
//! control stack in a single left-to-right pass, and the engine ignores
//! ordinary tokens while any skip marker is present.
//!
//! `UNTIL` only pops its `BEGIN` marker when the flag is true and otherwise
//! does nothing; `REPEAT` only closes the `BEGIN ... WHILE` pair. A loop body
//! therefore runs at most once per pass. This is the engine's documented
//! scope: re-running the body token subsequence until the condition holds is
//! the extension point if real looping is ever wanted.

use crate::forth::engine::StackEngine;
use crate::forth::errors::ForthError;
use crate::forth::stack::ControlMarker;
use crate::output::OutputSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ControlWord {
    If,
    Else,
    Then,
    Begin,
    Until,
    While,
    Repeat,
}

impl ControlWord {
    pub(crate) fn from_name(name: &str) -> Option<ControlWord> {
        match name {
            "IF" => Some(ControlWord::If),
            "ELSE" => Some(ControlWord::Else),
            "THEN" => Some(ControlWord::Then),
            "BEGIN" => Some(ControlWord::Begin),
            "UNTIL" => Some(ControlWord::Until),
            "WHILE" => Some(ControlWord::While),
            "REPEAT" => Some(ControlWord::Repeat),
            _ => None,
        }
    }
}

fn mismatch(message: &str) -> ForthError {
    ForthError::CompileError {
        message: message.to_string(),
    }
}

impl<S: OutputSink> StackEngine<S> {
    pub(crate) fn execute_control(&mut self, word: ControlWord) -> Result<(), ForthError> {
        let skipping = self.control.is_skipping();

        match word {
            ControlWord::If => {
                if skipping {
                    self.control.push(ControlMarker::IfSkip);
                } else {
                    let flag = self.stack.pop("IF")?;
                    self.control.push(if flag.is_truthy() {
                        ControlMarker::IfExec
                    } else {
                        ControlMarker::IfSkip
                    });
                }
            }

            ControlWord::Else => {
                if !self.control.top().is_some_and(ControlMarker::is_if) {
                    return Err(mismatch("ELSE without IF"));
                }
                // Only flip when the enclosing context is live
                if !self.control.is_skipping_below_top() {
                    if let Some(top) = self.control.top_mut() {
                        *top = match *top {
                            ControlMarker::IfExec => ControlMarker::IfSkip,
                            _ => ControlMarker::IfExec,
                        };
                    }
                }
            }

            ControlWord::Then => {
                if !self.control.top().is_some_and(ControlMarker::is_if) {
                    return Err(mismatch("THEN without IF"));
                }
                self.control.pop();
            }

            ControlWord::Begin => self.control.push(ControlMarker::Begin),

            ControlWord::Until => {
                if self.control.top() != Some(ControlMarker::Begin) {
                    return Err(mismatch("UNTIL without BEGIN"));
                }
                if skipping {
                    self.control.pop();
                } else if self.stack.pop("UNTIL")?.is_truthy() {
                    self.control.pop();
                }
            }

            ControlWord::While => {
                if skipping {
                    self.control.push(ControlMarker::WhileSkip);
                } else {
                    if self.control.top() != Some(ControlMarker::Begin) {
                        return Err(mismatch("WHILE without BEGIN"));
                    }
                    let flag = self.stack.pop("WHILE")?;
                    self.control.push(if flag.is_truthy() {
                        ControlMarker::WhileExec
                    } else {
                        ControlMarker::WhileSkip
                    });
                }
            }

            ControlWord::Repeat => {
                if !self.control.top().is_some_and(ControlMarker::is_while) {
                    return Err(mismatch("REPEAT without WHILE"));
                }
                self.control.pop();
                if self.control.top() != Some(ControlMarker::Begin) {
                    return Err(mismatch("REPEAT without BEGIN"));
                }
                self.control.pop();
            }
        }

        Ok(())
    }
}
