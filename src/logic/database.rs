//! Clause database
//!
//! Clauses are grouped by predicate name and kept in definition order.
//! Predicates themselves are remembered in first-definition order so
//! `LISTING` output is stable.

use crate::logic::term::Clause;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
pub struct Database {
    predicates: FxHashMap<String, Vec<Clause>>,
    order: Vec<String>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a clause to the end of its predicate
    pub fn add(&mut self, predicate: &str, clause: Clause) {
        match self.predicates.get_mut(predicate) {
            Some(clauses) => clauses.push(clause),
            None => {
                self.order.push(predicate.to_string());
                self.predicates.insert(predicate.to_string(), vec![clause]);
            }
        }
    }

    /// Clauses for a predicate, in definition order
    pub fn clauses(&self, predicate: &str) -> &[Clause] {
        self.predicates.get(predicate).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, predicate: &str) -> bool {
        self.predicates.contains_key(predicate)
    }

    /// Predicate names in first-definition order
    pub fn predicates(&self) -> &[String] {
        &self.order
    }

    pub fn clause_count(&self) -> usize {
        self.predicates.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.predicates.clear();
        self.order.clear();
    }

    /// Source-like rendering, one clause per line, blank line between predicates
    pub fn listing(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (i, name) in self.order.iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            lines.extend(self.clauses(name).iter().map(|c| c.render(name)));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::term::Term;

    fn fact(args: &[&str]) -> Clause {
        Clause::Fact {
            args: args.iter().map(|a| Term::atom(a)).collect(),
        }
    }

    #[test]
    fn test_definition_order() {
        let mut db = Database::new();
        db.add("parent", fact(&["tom", "bob"]));
        db.add("likes", fact(&["bob", "pizza"]));
        db.add("parent", fact(&["bob", "ann"]));

        assert_eq!(db.predicates(), &["parent".to_string(), "likes".to_string()]);
        assert_eq!(db.clauses("parent").len(), 2);
        assert_eq!(db.clause_count(), 3);
        assert!(db.clauses("missing").is_empty());
        assert_eq!(
            db.listing(),
            vec![
                "parent(tom, bob).",
                "parent(bob, ann).",
                "",
                "likes(bob, pizza).",
            ]
        );
    }

    #[test]
    fn test_clear() {
        let mut db = Database::new();
        db.add("p", fact(&["a"]));
        db.clear();
        assert!(db.is_empty());
        assert!(db.listing().is_empty());
    }
}
