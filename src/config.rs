//! Engine limits
//!
//! Neither language bounds recursion on its own. [`Limits`] adds explicit
//! ceilings so a divergent word or query reports a "resource exceeded" error
//! instead of exhausting the host's stack.

use crate::constants::{
    DEFAULT_MAX_CALL_DEPTH, DEFAULT_MAX_DISPLAYED_SOLUTIONS, DEFAULT_MAX_PROOF_DEPTH,
    DEFAULT_MAX_PROOF_STEPS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Nested user-word invocations (stack engine return stack)
    pub max_call_depth: usize,
    /// Recursion depth of one proof (logic engine)
    pub max_proof_depth: usize,
    /// Goal resolutions per query (logic engine)
    pub max_proof_steps: usize,
    /// Solutions printed per query
    pub max_displayed_solutions: usize,
}

impl Limits {
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_max_proof_depth(mut self, depth: usize) -> Self {
        self.max_proof_depth = depth;
        self
    }

    pub fn with_max_proof_steps(mut self, steps: usize) -> Self {
        self.max_proof_steps = steps;
        self
    }

    pub fn with_max_displayed_solutions(mut self, count: usize) -> Self {
        self.max_displayed_solutions = count;
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_proof_depth: DEFAULT_MAX_PROOF_DEPTH,
            max_proof_steps: DEFAULT_MAX_PROOF_STEPS,
            max_displayed_solutions: DEFAULT_MAX_DISPLAYED_SOLUTIONS,
        }
    }
}
