// Execution engine for the logic language

use crate::config::Limits;
use crate::logic::bindings::Bindings;
use crate::logic::database::Database;
use crate::logic::errors::LogicError;
use crate::logic::lexer::strip_comment;
use crate::logic::parser::{
    find_top_level, parse_clause_head, parse_goal, split_top_level, strip_terminator, Goal,
};
use crate::logic::term::{Clause, Term};
use crate::output::OutputSink;
use crate::ExecOutcome;
use tracing::{debug, warn};

/// How an input line was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Rule,
    Query,
    Fact,
    Command,
}

/// Classify a line, checking in priority order: rule, query, fact, command
pub fn classify(line: &str) -> LineKind {
    let line = line.trim();
    if find_top_level(line, ":-").is_some() {
        LineKind::Rule
    } else if line.starts_with("?-") {
        LineKind::Query
    } else if line.contains('(') && line.contains(')') {
        LineKind::Fact
    } else {
        LineKind::Command
    }
}

/// Prolog-style interpreter session
///
/// Owns its clause database for its whole lifetime. `execute` always returns
/// [`ExecOutcome::Continue`]; answers and errors are written to the sink.
pub struct LogicEngine<S: OutputSink> {
    pub(crate) database: Database,

    /// Print `Call:`/`Exit:`/`Fail:` lines for every predicate call
    pub(crate) trace: bool,

    pub(crate) limits: Limits,

    /// Counter giving each clause activation a unique variable suffix
    pub(crate) activations: usize,

    /// Goal resolutions in the current query
    pub(crate) steps: usize,

    pub(crate) sink: S,
}

impl<S: OutputSink> LogicEngine<S> {
    /// Create an engine with default limits
    pub fn new(sink: S) -> Self {
        Self::with_limits(sink, Limits::default())
    }

    pub fn with_limits(sink: S, limits: Limits) -> Self {
        LogicEngine {
            database: Database::new(),
            trace: false,
            limits,
            activations: 0,
            steps: 0,
            sink,
        }
    }

    /// Execute one fact, rule, query or command line
    pub fn execute(&mut self, command: &str) -> ExecOutcome {
        let line = strip_comment(command).trim();
        if line.is_empty() {
            return ExecOutcome::Continue;
        }

        let result = match classify(line) {
            LineKind::Rule => self.define_rule(line),
            LineKind::Query => self.run_query(&line[2..]),
            LineKind::Fact => self.define_fact(line),
            LineKind::Command => self.run_command(line),
        };

        if let Err(err) = result {
            self.sink.log_output(&err.to_string());
        }
        ExecOutcome::Continue
    }

    fn define_fact(&mut self, line: &str) -> Result<(), LogicError> {
        let (name, args) = parse_clause_head(line).map_err(|e| LogicError::from_parse(e, line))?;
        debug!(predicate = %name, arity = args.len(), "fact added");
        self.database.add(&name, Clause::Fact { args });
        Ok(())
    }

    fn define_rule(&mut self, line: &str) -> Result<(), LogicError> {
        let split = find_top_level(line, ":-")
            .ok_or_else(|| LogicError::malformed("missing ':-'", line))?;
        let head_text = &line[..split];
        let body_text = strip_terminator(&line[split + 2..]);

        let (name, head_args) =
            parse_clause_head(head_text).map_err(|e| LogicError::from_parse(e, line))?;

        let body = split_top_level(body_text, ',');
        if body.is_empty() {
            return Err(LogicError::malformed("rule body is empty", line));
        }
        for goal in &body {
            if goal.is_empty() {
                return Err(LogicError::malformed("empty goal in rule body", line));
            }
            // Checked now so a typo is reported at definition time
            parse_goal(goal).map_err(|e| LogicError::from_parse(e, goal))?;
        }

        debug!(predicate = %name, arity = head_args.len(), goals = body.len(), "rule added");
        self.database.add(&name, Clause::Rule { head_args, body });
        Ok(())
    }

    fn run_query(&mut self, text: &str) -> Result<(), LogicError> {
        let body = strip_terminator(text.trim());
        let pieces = split_top_level(body, ',');
        if pieces.is_empty() || pieces.iter().any(String::is_empty) {
            return Err(LogicError::malformed("empty goal in query", text));
        }

        let goals = pieces
            .iter()
            .map(|piece| parse_goal(piece).map_err(|e| LogicError::from_parse(e, piece)))
            .collect::<Result<Vec<Goal>, _>>()?;

        let mut variables = Vec::new();
        for goal in &goals {
            goal.collect_variables(&mut variables);
        }
        variables.retain(|name| !name.starts_with('_'));

        self.steps = 0;
        let proof = match self.prove_goals(&goals, &Bindings::new(), 0) {
            Ok(proof) => proof,
            Err(err @ LogicError::ResourceExceeded { .. }) => {
                warn!(steps = self.steps, "query aborted: {}", err);
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        debug!(solutions = proof.solutions.len(), steps = self.steps, "query solved");
        self.report_solutions(&proof.solutions, &variables);
        Ok(())
    }

    fn report_solutions(&mut self, solutions: &[Bindings], variables: &[String]) {
        if solutions.is_empty() {
            self.sink.log_output("false.");
            return;
        }
        if variables.is_empty() {
            self.sink.log_output("true.");
            return;
        }

        let shown = self.limits.max_displayed_solutions;
        for solution in solutions.iter().take(shown) {
            let line = variables
                .iter()
                .map(|name| format!("{} = {}", name, display_binding(solution, name)))
                .collect::<Vec<_>>()
                .join(", ");
            self.sink.log_output(&line);
        }
        if solutions.len() > shown {
            self.sink
                .log_output(&format!("... and {} more", solutions.len() - shown));
        }
    }

    fn run_command(&mut self, line: &str) -> Result<(), LogicError> {
        let word = strip_terminator(line);
        match word.to_ascii_uppercase().as_str() {
            "LISTING" => {
                self.print_listing();
                Ok(())
            }
            "TRACE" => {
                self.trace = true;
                self.sink.log_output("% trace on");
                Ok(())
            }
            "NOTRACE" => {
                self.trace = false;
                self.sink.log_output("% trace off");
                Ok(())
            }
            "RESET" => {
                self.reset();
                self.sink.log_output("% database cleared");
                Ok(())
            }
            _ if word.starts_with(|c: char| c.is_ascii_lowercase()) => {
                // A bare atom is a zero-argument fact
                self.define_fact(line)
            }
            _ => Err(LogicError::malformed("unrecognised command", line)),
        }
    }

    fn print_listing(&mut self) {
        if self.database.is_empty() {
            self.sink.log_output("% database is empty");
            return;
        }
        for line in self.database.listing() {
            self.sink.log_output(&line);
        }
    }

    /// Forget every clause and switch tracing off
    pub fn reset(&mut self) {
        self.database.clear();
        self.trace = false;
        self.activations = 0;
        self.steps = 0;
        debug!("logic engine reset");
    }

    // ===== Accessors for the host =====

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn is_tracing(&self) -> bool {
        self.trace
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

/// Fully resolved value of a query variable
fn display_binding(solution: &Bindings, name: &str) -> String {
    hide_free_variables(solution.resolve_deep(&Term::var(name))).to_string()
}

/// Every variable still free after resolution prints as `_`
fn hide_free_variables(term: Term) -> Term {
    match term {
        Term::Variable(_) => Term::var("_"),
        Term::List(items) => {
            Term::List(items.into_iter().map(hide_free_variables).collect())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_priority() {
        assert_eq!(classify("a(X) :- b(X)."), LineKind::Rule);
        assert_eq!(classify("?- a(X)."), LineKind::Query);
        assert_eq!(classify("a(x)."), LineKind::Fact);
        assert_eq!(classify("LISTING"), LineKind::Command);
        assert_eq!(classify("p(':-')."), LineKind::Fact);
    }

    #[test]
    fn test_free_variables_display_as_underscore() {
        let term = Term::List(vec![Term::var("Var#3"), Term::int(1)]);
        assert_eq!(hide_free_variables(term).to_string(), "[_, 1]");
        assert_eq!(hide_free_variables(Term::atom("a")).to_string(), "a");
    }
}
