//! Depth-first resolution
//!
//! Goals are proved left to right. Every alternative of a goal is combined
//! with every solution of the goals after it, and predicate clauses are tried
//! in definition order, so solutions come out in standard resolution order.
//!
//! # Cut
//!
//! [`Proof::cut`] reports that a `!` was reached. Reaching it drops every
//! pending alternative of the goals to its left, and the predicate call
//! owning the clause body stops trying further clauses. The flag is absorbed
//! there and never escapes the call.
//!
//! # Bounds
//!
//! Nesting deeper than `max_proof_depth` predicate calls, or more than
//! `max_proof_steps` goal resolutions in one query, aborts the query with
//! [`LogicError::ResourceExceeded`].

use crate::logic::arith::{eval, EvalError};
use crate::logic::bindings::{unify, unify_args, Bindings};
use crate::logic::engine::LogicEngine;
use crate::logic::errors::LogicError;
use crate::logic::parser::{parse_goal, Goal};
use crate::logic::term::{render_head, Clause, Term};
use crate::output::OutputSink;
use tracing::{trace, warn};

/// Result of proving a goal list
#[derive(Debug, Clone, Default)]
pub(crate) struct Proof {
    pub(crate) solutions: Vec<Bindings>,
    /// A `!` in this goal list was reached
    pub(crate) cut: bool,
}

impl<S: OutputSink> LogicEngine<S> {
    /// Prove `goals` in order, collecting every solution
    ///
    /// The conjunction is walked with an explicit stack of pending
    /// alternatives, so only nested predicate calls grow the native stack.
    pub(crate) fn prove_goals(
        &mut self,
        goals: &[Goal],
        bindings: &Bindings,
        depth: usize,
    ) -> Result<Proof, LogicError> {
        let mut proof = Proof::default();
        // (index of the next goal, bindings still to try at that goal)
        let mut pending: Vec<(usize, std::vec::IntoIter<Bindings>)> =
            vec![(0, vec![bindings.clone()].into_iter())];

        while let Some((index, alternatives)) = pending.last_mut() {
            let index = *index;
            let Some(current) = alternatives.next() else {
                pending.pop();
                continue;
            };

            match goals.get(index) {
                None => proof.solutions.push(current),
                Some(Goal::Cut) => {
                    // Alternatives of every goal left of the cut are dropped
                    proof.cut = true;
                    pending.clear();
                    pending.push((index + 1, vec![current].into_iter()));
                }
                Some(goal) => {
                    let next = self.prove_goal(goal, &current, depth)?;
                    pending.push((index + 1, next.into_iter()));
                }
            }
        }

        Ok(proof)
    }

    /// All binding extensions under which one goal holds
    fn prove_goal(
        &mut self,
        goal: &Goal,
        bindings: &Bindings,
        depth: usize,
    ) -> Result<Vec<Bindings>, LogicError> {
        self.steps += 1;
        if self.steps > self.limits.max_proof_steps {
            warn!(limit = self.limits.max_proof_steps, "proof step limit reached");
            return Err(LogicError::ResourceExceeded {
                what: "proof steps",
                limit: self.limits.max_proof_steps,
            });
        }
        trace!(?goal, depth, "prove goal");

        let solutions = match goal {
            Goal::True | Goal::Cut => vec![bindings.clone()],
            Goal::Fail => Vec::new(),
            Goal::Nl => {
                self.sink.log_output("");
                vec![bindings.clone()]
            }
            Goal::Write(term) => {
                let text = bindings.resolve_deep(term).write_text();
                self.sink.log_output(&text);
                vec![bindings.clone()]
            }
            Goal::Member(element, list) => match bindings.resolve(list) {
                // First unifying element only
                Term::List(items) => items
                    .iter()
                    .find_map(|item| unify(element, item, bindings))
                    .into_iter()
                    .collect(),
                _ => Vec::new(),
            },
            Goal::Unify(left, right) => unify(left, right, bindings).into_iter().collect(),
            Goal::NotUnify(left, right) => match unify(left, right, bindings) {
                Some(_) => Vec::new(),
                None => vec![bindings.clone()],
            },
            Goal::Is(target, expr) => match eval(expr, bindings) {
                Ok(value) => unify(target, &Term::Number(value), bindings)
                    .into_iter()
                    .collect(),
                Err(err) => self.arithmetic_failure(err),
            },
            Goal::Compare(op, left, right) => {
                match eval(left, bindings).and_then(|l| eval(right, bindings).map(|r| (l, r))) {
                    Ok((l, r)) if op.holds(l, r) => vec![bindings.clone()],
                    Ok(_) => Vec::new(),
                    Err(err) => self.arithmetic_failure(err),
                }
            }
            Goal::Call { name, args } => self.call_predicate(name, args, bindings, depth)?,
        };

        Ok(solutions)
    }

    #[cold]
    fn depth_exceeded(&self, predicate: &str) -> LogicError {
        let limit = self.limits.max_proof_depth;
        warn!(predicate, limit, "proof depth limit reached");
        LogicError::ResourceExceeded {
            what: "proof depth",
            limit,
        }
    }

    /// An unevaluable expression makes the goal fail
    fn arithmetic_failure(&mut self, err: EvalError) -> Vec<Bindings> {
        self.sink.debug_output(&LogicError::from(err).to_string());
        Vec::new()
    }

    /// Try every clause of a predicate in definition order
    fn call_predicate(
        &mut self,
        name: &str,
        args: &[Term],
        bindings: &Bindings,
        depth: usize,
    ) -> Result<Vec<Bindings>, LogicError> {
        if depth >= self.limits.max_proof_depth {
            return Err(self.depth_exceeded(name));
        }

        let args: Vec<Term> = args.iter().map(|a| bindings.resolve_deep(a)).collect();
        if self.trace {
            self.sink
                .log_output(&format!("Call: {}", render_head(name, &args)));
        }
        if !self.database.contains(name) {
            self.sink
                .debug_output(&format!("Unknown procedure: {}/{}", name, args.len()));
        }

        let clauses = self.database.clauses(name).to_vec();
        let mut solutions = Vec::new();

        for clause in &clauses {
            self.activations += 1;
            let suffix = self.activations;
            let rename = |var: &str| format!("{}#{}", var, suffix);

            let head: Vec<Term> = clause
                .head_args()
                .iter()
                .map(|t| t.rename_variables(&rename))
                .collect();
            let Some(unified) = unify_args(&args, &head, bindings) else {
                continue;
            };

            match clause {
                Clause::Fact { .. } => solutions.push(unified),
                Clause::Rule { body, .. } => {
                    let goals = body
                        .iter()
                        .map(|text| {
                            parse_goal(text)
                                .map(|goal| goal.rename_variables(&rename))
                                .map_err(|e| LogicError::from_parse(e, text))
                        })
                        .collect::<Result<Vec<_>, _>>()?;

                    let proof = self.prove_goals(&goals, &unified, depth + 1)?;
                    solutions.extend(proof.solutions);
                    if proof.cut {
                        break;
                    }
                }
            }
        }

        if self.trace {
            if solutions.is_empty() {
                self.sink
                    .log_output(&format!("Fail: {}", render_head(name, &args)));
            }
            for solution in &solutions {
                let resolved: Vec<Term> = args.iter().map(|a| solution.resolve_deep(a)).collect();
                self.sink
                    .log_output(&format!("Exit: {}", render_head(name, &resolved)));
            }
        }

        Ok(solutions)
    }
}
