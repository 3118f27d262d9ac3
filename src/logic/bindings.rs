//! Variable bindings and unification
//!
//! [`Bindings`] maps variable names to terms. Extending a binding set never
//! mutates the original, so every alternative explored by the search keeps
//! its own consistent view.

use crate::logic::term::Term;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    map: FxHashMap<String, Term>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Term> {
        self.map.get(name)
    }

    /// Copy of these bindings with one more entry
    pub fn bind(&self, name: &str, term: Term) -> Bindings {
        let mut extended = self.clone();
        extended.map.insert(name.to_string(), term);
        extended
    }

    /// Follow variable bindings until reaching a non-variable or a free variable
    pub fn resolve(&self, term: &Term) -> Term {
        let mut current = term;
        while let Term::Variable(name) = current {
            match self.map.get(name) {
                Some(next) => current = next,
                None => break,
            }
        }
        current.clone()
    }

    /// Resolve a term and every list element inside it
    pub fn resolve_deep(&self, term: &Term) -> Term {
        match self.resolve(term) {
            Term::List(items) => Term::List(items.iter().map(|t| self.resolve_deep(t)).collect()),
            other => other,
        }
    }

    /// Does variable `name` occur anywhere inside `term`?
    pub fn occurs(&self, name: &str, term: &Term) -> bool {
        match self.resolve(term) {
            Term::Variable(other) => other == name,
            Term::List(items) => items.iter().any(|t| self.occurs(name, t)),
            _ => false,
        }
    }

    fn unify_in_place(&mut self, left: &Term, right: &Term) -> bool {
        if left.is_anonymous() || right.is_anonymous() {
            return true;
        }

        let left = self.resolve(left);
        let right = self.resolve(right);

        match (&left, &right) {
            (Term::Variable(a), Term::Variable(b)) if a == b => true,
            (Term::Variable(var), other) | (other, Term::Variable(var)) => {
                if self.occurs(var, other) {
                    return false;
                }
                self.map.insert(var.clone(), other.clone());
                true
            }
            (Term::List(xs), Term::List(ys)) => {
                xs.len() == ys.len()
                    && xs.iter().zip(ys).all(|(x, y)| self.unify_in_place(x, y))
            }
            (a, b) => a == b,
        }
    }
}

/// Unify two terms, returning the extended bindings on success
pub fn unify(left: &Term, right: &Term, bindings: &Bindings) -> Option<Bindings> {
    let mut extended = bindings.clone();
    extended.unify_in_place(left, right).then_some(extended)
}

/// Unify two argument lists element-wise; arity must match
pub fn unify_args(left: &[Term], right: &[Term], bindings: &Bindings) -> Option<Bindings> {
    if left.len() != right.len() {
        return None;
    }
    let mut extended = bindings.clone();
    left.iter()
        .zip(right)
        .all(|(l, r)| extended.unify_in_place(l, r))
        .then_some(extended)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_does_not_mutate_original() {
        let empty = Bindings::new();
        let bound = empty.bind("X", Term::atom("a"));
        assert!(empty.is_empty());
        assert_eq!(bound.get("X"), Some(&Term::atom("a")));
    }

    #[test]
    fn test_resolve_chain() {
        let b = Bindings::new()
            .bind("X", Term::var("Y"))
            .bind("Y", Term::int(3));
        assert_eq!(b.resolve(&Term::var("X")), Term::int(3));
        assert_eq!(b.resolve(&Term::var("Z")), Term::var("Z"));
    }

    #[test]
    fn test_unify_variable_with_atom() {
        let b = unify(&Term::var("X"), &Term::atom("bob"), &Bindings::new()).unwrap();
        assert_eq!(b.resolve(&Term::var("X")), Term::atom("bob"));
    }

    #[test]
    fn test_unify_same_variable() {
        let b = unify(&Term::var("X"), &Term::var("X"), &Bindings::new()).unwrap();
        assert!(b.is_empty());
    }

    #[test]
    fn test_unify_mismatch() {
        assert!(unify(&Term::atom("a"), &Term::atom("b"), &Bindings::new()).is_none());
        assert!(unify(&Term::int(1), &Term::atom("1"), &Bindings::new()).is_none());
        let short = Term::List(vec![Term::int(1)]);
        let long = Term::List(vec![Term::int(1), Term::int(2)]);
        assert!(unify(&short, &long, &Bindings::new()).is_none());
    }

    #[test]
    fn test_occurs_check() {
        let list = Term::List(vec![Term::int(1), Term::var("X")]);
        assert!(unify(&Term::var("X"), &list, &Bindings::new()).is_none());

        // Indirect: Y = [X] then X = Y
        let list = Term::List(vec![Term::var("X")]);
        let b = unify(&Term::var("Y"), &list, &Bindings::new()).unwrap();
        assert!(unify(&Term::var("X"), &Term::var("Y"), &b).is_none());
    }

    #[test]
    fn test_anonymous_never_bound() {
        let b = unify(&Term::var("_"), &Term::atom("a"), &Bindings::new()).unwrap();
        assert!(b.is_empty());
    }

    #[test]
    fn test_unify_args_threads_bindings() {
        let left = [Term::var("X"), Term::var("X")];
        let right = [Term::atom("a"), Term::atom("b")];
        assert!(unify_args(&left, &right, &Bindings::new()).is_none());

        let right = [Term::atom("a"), Term::atom("a")];
        assert!(unify_args(&left, &right, &Bindings::new()).is_some());
        assert!(unify_args(&left, &right[..1], &Bindings::new()).is_none());
    }
}
