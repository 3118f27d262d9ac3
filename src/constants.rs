// Default limits for both engines
//
// The depth limits keep the deepest recursion inside a 2 MiB thread stack,
// the Rust default for spawned threads, even in debug builds.

/// Maximum nesting of user-defined word invocations in the stack engine
pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;

/// Maximum nesting of predicate calls within a single proof in the logic engine
pub const DEFAULT_MAX_PROOF_DEPTH: usize = 128;

/// Largest count `SPACES` accepts
pub const MAX_SPACES: i64 = 4096;

/// Maximum number of goal resolutions attempted by a single query
pub const DEFAULT_MAX_PROOF_STEPS: usize = 1_000_000;

/// Number of solutions printed before the "... and N more" suffix
pub const DEFAULT_MAX_DISPLAYED_SOLUTIONS: usize = 5;
