//! Term and clause definitions for the logic language
//!
//! - [`Term`]: Variable, Atom, Number, String or List; immutable once built
//! - [`Number`]: integer or float payload of [`Term::Number`]
//! - [`Clause`]: a stored fact or rule
//!
//! Rule bodies are kept as raw goal text and only parsed when the rule is
//! used, so a body may mention predicates that do not exist yet.

use crate::forth::value::format_float;
use std::fmt;

/// Numeric payload; integers and floats compare by value
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(x) => x,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            Number::Float(x) => write!(f, "{}", format_float(*x)),
        }
    }
}

/// A logic-language term
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Variable(String),
    Atom(String),
    Number(Number),
    String(String),
    List(Vec<Term>),
}

impl Term {
    pub fn var(name: &str) -> Term {
        Term::Variable(name.to_string())
    }

    pub fn atom(name: &str) -> Term {
        Term::Atom(name.to_string())
    }

    pub fn int(n: i64) -> Term {
        Term::Number(Number::Int(n))
    }

    pub fn float(x: f64) -> Term {
        Term::Number(Number::Float(x))
    }

    /// `_` matches anything and is never bound
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Term::Variable(name) if name == "_")
    }

    /// Append every variable name in the term, in order of first appearance
    pub fn collect_variables(&self, out: &mut Vec<String>) {
        match self {
            Term::Variable(name) => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            Term::List(items) => {
                for item in items {
                    item.collect_variables(out);
                }
            }
            _ => {}
        }
    }

    /// Copy of the term with every named variable renamed by `rename`
    pub fn rename_variables<F>(&self, rename: &F) -> Term
    where
        F: Fn(&str) -> String,
    {
        match self {
            Term::Variable(name) if name != "_" => Term::Variable(rename(name)),
            Term::List(items) => {
                Term::List(items.iter().map(|t| t.rename_variables(rename)).collect())
            }
            other => other.clone(),
        }
    }

    /// Text printed by `write/1`: strings lose their quotes
    pub fn write_text(&self) -> String {
        match self {
            Term::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(name) => match name.split_once('#') {
                // Renamed clause variable that stayed unbound
                Some((base, id)) => write!(f, "_{}{}", base.trim_start_matches('_'), id),
                None => write!(f, "{}", name),
            },
            Term::Atom(name) => write!(f, "{}", name),
            Term::Number(n) => write!(f, "{}", n),
            Term::String(s) => write!(f, "\"{}\"", s),
            Term::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// A stored clause
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Fact {
        args: Vec<Term>,
    },
    Rule {
        head_args: Vec<Term>,
        /// Raw goal text, parsed each time the rule is tried
        body: Vec<String>,
    },
}

impl Clause {
    pub fn head_args(&self) -> &[Term] {
        match self {
            Clause::Fact { args } => args,
            Clause::Rule { head_args, .. } => head_args,
        }
    }

    /// Render as source text under the given predicate name
    pub fn render(&self, predicate: &str) -> String {
        let head = render_head(predicate, self.head_args());
        match self {
            Clause::Fact { .. } => format!("{}.", head),
            Clause::Rule { body, .. } => format!("{} :- {}.", head, body.join(", ")),
        }
    }
}

/// `name(arg1, arg2)`, or just `name` for zero arguments
pub fn render_head(name: &str, args: &[Term]) -> String {
    if args.is_empty() {
        return name.to_string();
    }
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    format!("{}({})", name, args.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let list = Term::List(vec![Term::int(1), Term::atom("a"), Term::String("s".into())]);
        assert_eq!(list.to_string(), "[1, a, \"s\"]");
        assert_eq!(Term::float(2.0).to_string(), "2.0");
    }

    #[test]
    fn test_numbers_compare_by_value() {
        assert_eq!(Term::int(1), Term::float(1.0));
        assert_ne!(Term::int(1), Term::int(2));
    }

    #[test]
    fn test_render_rule() {
        let clause = Clause::Rule {
            head_args: vec![Term::var("X"), Term::var("Z")],
            body: vec!["parent(X, Y)".into(), "parent(Y, Z)".into()],
        };
        assert_eq!(
            clause.render("grandparent"),
            "grandparent(X, Z) :- parent(X, Y), parent(Y, Z)."
        );
    }

    #[test]
    fn test_renamed_variable_display() {
        assert_eq!(Term::var("Y#12").to_string(), "_Y12");
    }
}
