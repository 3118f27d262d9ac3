// Execution engine for the stack language

use crate::config::Limits;
use crate::forth::dictionary::{Dictionary, Word};
use crate::forth::errors::ForthError;
use crate::forth::stack::{ControlStack, DataStack};
use crate::forth::tokenizer::{is_string_literal, tokenize, unquote};
use crate::forth::value::Value;
use crate::output::OutputSink;
use crate::ExecOutcome;
use tracing::{debug, trace, warn};

/// Transient state while a `: NAME ... ;` definition is open
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompilationState {
    pub compiling: bool,
    /// Name of the word being defined, once the token after `:` has been read
    pub name: Option<String>,
    /// Tokens captured so far, verbatim
    pub pending: Vec<String>,
}

impl CompilationState {
    fn start(&mut self) {
        self.compiling = true;
        self.name = None;
        self.pending.clear();
    }

    fn reset(&mut self) {
        self.compiling = false;
        self.name = None;
        self.pending.clear();
    }
}

/// Forth-style interpreter session
///
/// Owns its data stack, control stack, return stack and dictionary for its
/// whole lifetime; two engines never share state.
pub struct StackEngine<S: OutputSink> {
    /// Operand stack
    pub(crate) stack: DataStack,

    /// Conditional/loop markers for the line being executed
    pub(crate) control: ControlStack,

    /// Names of the user words currently executing, innermost last
    pub(crate) return_stack: Vec<String>,

    /// Built-in and user-defined words
    pub(crate) dictionary: Dictionary,

    /// Open definition, if any (may span several `execute` calls)
    pub(crate) compilation: CompilationState,

    pub(crate) limits: Limits,

    /// Where all output goes
    pub(crate) sink: S,
}

impl<S: OutputSink> StackEngine<S> {
    /// Create an engine with default limits
    pub fn new(sink: S) -> Self {
        Self::with_limits(sink, Limits::default())
    }

    pub fn with_limits(sink: S, limits: Limits) -> Self {
        StackEngine {
            stack: DataStack::new(),
            control: ControlStack::new(),
            return_stack: Vec::new(),
            dictionary: Dictionary::new(),
            compilation: CompilationState::default(),
            limits,
            sink,
        }
    }

    /// Execute one command line
    ///
    /// Output goes to the sink. Returns [`ExecOutcome::Error`] if the line
    /// stopped early; the session stays usable either way.
    pub fn execute(&mut self, command: &str) -> ExecOutcome {
        self.control.clear();
        self.return_stack.clear();

        let result = tokenize(command).and_then(|tokens| self.execute_tokens(&tokens));

        if !self.control.is_empty() {
            let open = self.control.depth();
            debug!(open, "control structure left open at end of line");
            self.sink.debug_output(&format!(
                "Unbalanced control structure: {} marker(s) left open ({:?})",
                open,
                self.control.markers()
            ));
            self.control.clear();
        }

        match result {
            Ok(()) => ExecOutcome::Continue,
            Err(err) => {
                self.report_error(&err);
                self.return_stack.clear();
                ExecOutcome::Error
            }
        }
    }

    /// Run tokens left to right, stopping at the first failure
    pub(crate) fn execute_tokens(&mut self, tokens: &[String]) -> Result<(), ForthError> {
        for token in tokens {
            self.execute_token(token)?;
        }
        Ok(())
    }

    /// Execute (or compile) a single token
    fn execute_token(&mut self, token: &str) -> Result<(), ForthError> {
        if self.compilation.compiling {
            return self.compile_token(token);
        }

        trace!(token, depth = self.stack.depth(), "execute token");

        let upper = token.to_uppercase();

        // Control words must be seen even inside a skipped branch
        if let Some(word) = super::control::ControlWord::from_name(&upper) {
            return self.execute_control(word);
        }
        if self.control.is_skipping() {
            return Ok(());
        }

        match upper.as_str() {
            ":" => {
                self.compilation.start();
                return Ok(());
            }
            ";" => {
                return Err(ForthError::CompileError {
                    message: "';' without matching ':'".to_string(),
                });
            }
            "RECURSE" => return self.recurse(),
            _ => {}
        }

        if is_string_literal(token) {
            self.stack.push(Value::Str(unquote(token).to_string()));
            return Ok(());
        }

        if let Some(word) = self.dictionary.get(&upper).cloned() {
            return self.execute_word(&upper, word);
        }

        if let Some(value) = parse_number(token) {
            self.stack.push(value);
            return Ok(());
        }

        Err(ForthError::UnknownWord {
            name: token.to_string(),
        })
    }

    /// Capture a token into the open definition
    fn compile_token(&mut self, token: &str) -> Result<(), ForthError> {
        if token == ":" {
            self.compilation.reset();
            return Err(ForthError::CompileError {
                message: "nested definitions are not allowed".to_string(),
            });
        }

        let Some(name) = self.compilation.name.clone() else {
            if token == ";" {
                self.compilation.reset();
                return Err(ForthError::CompileError {
                    message: "definition has no name".to_string(),
                });
            }
            self.compilation.name = Some(token.to_uppercase());
            return Ok(());
        };

        if token == ";" {
            let body = std::mem::take(&mut self.compilation.pending);
            debug!(word = %name, tokens = body.len(), "word defined");
            self.dictionary.define(&name, body);
            self.compilation.reset();
        } else {
            self.compilation.pending.push(token.to_string());
        }
        Ok(())
    }

    fn execute_word(&mut self, name: &str, word: Word) -> Result<(), ForthError> {
        match word {
            Word::Builtin(builtin) => self.execute_builtin(builtin),
            Word::User(body) => self.invoke_user_word(name, &body),
        }
    }

    /// Replay a user definition through the ordinary token loop
    fn invoke_user_word(&mut self, name: &str, body: &[String]) -> Result<(), ForthError> {
        if self.return_stack.len() >= self.limits.max_call_depth {
            warn!(word = name, limit = self.limits.max_call_depth, "call depth exceeded");
            return Err(ForthError::ResourceExceeded {
                limit: self.limits.max_call_depth,
            });
        }

        self.return_stack.push(name.to_string());
        let result = self.execute_tokens(body);
        self.return_stack.pop();
        result
    }

    /// `RECURSE`: re-invoke the innermost executing user word
    fn recurse(&mut self) -> Result<(), ForthError> {
        let name = self
            .return_stack
            .last()
            .cloned()
            .ok_or_else(|| ForthError::CompileError {
                message: "RECURSE outside of a definition".to_string(),
            })?;

        match self.dictionary.get(&name).cloned() {
            Some(word) => self.execute_word(&name, word),
            None => Err(ForthError::UnknownWord { name }),
        }
    }

    fn report_error(&mut self, err: &ForthError) {
        self.sink.log_output(&err.to_string());
        if err.is_internal() {
            self.sink.debug_output(&format!("caught: {:?}", err));
        }
    }

    /// Drop all session state; built-ins are restored, user words forgotten
    pub fn reset(&mut self) {
        self.stack.clear();
        self.control.clear();
        self.return_stack.clear();
        self.dictionary = Dictionary::new();
        self.compilation.reset();
        debug!("stack engine reset");
    }

    // ===== Accessors for the host =====

    pub fn stack(&self) -> &DataStack {
        &self.stack
    }

    pub fn control_stack(&self) -> &ControlStack {
        &self.control
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn compilation(&self) -> &CompilationState {
        &self.compilation
    }

    pub fn is_compiling(&self) -> bool {
        self.compilation.compiling
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// Numeric literal rule: a `.` means float, otherwise integer
pub fn parse_number(token: &str) -> Option<Value> {
    if token.contains('.') {
        token.parse::<f64>().ok().map(Value::Float)
    } else {
        token.parse::<i64>().ok().map(Value::Int)
    }
}
