// Integration tests for the logic language engine

use interp_farm::config::Limits;
use interp_farm::logic::LogicEngine;
use interp_farm::output::BufferedSink;
use interp_farm::ExecOutcome;

fn engine() -> LogicEngine<BufferedSink> {
    LogicEngine::new(BufferedSink::new())
}

fn load(engine: &mut LogicEngine<BufferedSink>, program: &str) {
    for line in program.lines() {
        assert_eq!(engine.execute(line), ExecOutcome::Continue);
    }
    engine.sink_mut().clear();
}

/// Run one line and return its log output
fn ask(engine: &mut LogicEngine<BufferedSink>, line: &str) -> Vec<String> {
    engine.sink_mut().clear();
    assert_eq!(engine.execute(line), ExecOutcome::Continue);
    engine.sink().log_lines()
}

const FAMILY: &str = "\
parent(tom, bob).
parent(bob, ann).
parent(bob, pat).
parent(pat, jim).
grandparent(X, Z) :- parent(X, Y), parent(Y, Z).
ancestor(X, Y) :- parent(X, Y).
ancestor(X, Y) :- parent(X, Z), ancestor(Z, Y).";

#[test]
fn test_ground_fact_query() {
    let mut e = engine();
    load(&mut e, FAMILY);
    assert_eq!(ask(&mut e, "?- parent(tom, bob)."), vec!["true."]);
    assert_eq!(ask(&mut e, "?- parent(bob, tom)."), vec!["false."]);
}

#[test]
fn test_definitions_are_silent() {
    let mut e = engine();
    assert!(ask(&mut e, "parent(tom, bob).").is_empty());
    assert!(ask(&mut e, "child(X, Y) :- parent(Y, X).").is_empty());
    assert_eq!(e.database().clause_count(), 2);
}

#[test]
fn test_variable_bindings_in_order() {
    let mut e = engine();
    load(&mut e, FAMILY);
    assert_eq!(ask(&mut e, "?- parent(tom, X)."), vec!["X = bob"]);
    assert_eq!(ask(&mut e, "?- parent(bob, X)."), vec!["X = ann", "X = pat"]);
    assert_eq!(
        ask(&mut e, "?- parent(X, Y)."),
        vec!["X = tom, Y = bob", "X = bob, Y = ann", "X = bob, Y = pat", "X = pat, Y = jim"]
    );
}

#[test]
fn test_rule_resolution() {
    let mut e = engine();
    load(&mut e, FAMILY);
    assert_eq!(ask(&mut e, "?- grandparent(tom, Z)."), vec!["Z = ann", "Z = pat"]);
    assert_eq!(ask(&mut e, "?- grandparent(X, jim)."), vec!["X = bob"]);
}

#[test]
fn test_recursive_rule() {
    let mut e = engine();
    load(&mut e, FAMILY);
    assert_eq!(
        ask(&mut e, "?- ancestor(tom, Who)."),
        vec!["Who = bob", "Who = ann", "Who = pat", "Who = jim"]
    );
    assert_eq!(ask(&mut e, "?- ancestor(jim, _)."), vec!["false."]);
}

#[test]
fn test_rule_variables_do_not_leak() {
    let mut e = engine();
    load(&mut e, "same(X, X).\nboth(X, Y) :- same(X, a), same(Y, b).");
    // Each activation gets fresh variables, so X and Y stay independent
    assert_eq!(ask(&mut e, "?- both(P, Q)."), vec!["P = a, Q = b"]);
}

#[test]
fn test_anonymous_variables_are_not_reported() {
    let mut e = engine();
    load(&mut e, FAMILY);
    assert_eq!(ask(&mut e, "?- parent(_, jim)."), vec!["true."]);
    assert_eq!(ask(&mut e, "?- parent(X, _)."), vec!["X = tom", "X = bob", "X = bob", "X = pat"]);
}

#[test]
fn test_unbound_variable_displays_as_underscore() {
    let mut e = engine();
    load(&mut e, "anything(_).");
    assert_eq!(ask(&mut e, "?- anything(X)."), vec!["X = _"]);
}

#[test]
fn test_clause_variables_never_reach_answers() {
    let mut e = engine();
    load(&mut e, "same(Y, Y).\nwrap(Y, [Y, 1]).");
    assert_eq!(ask(&mut e, "?- same(X, Z)."), vec!["X = _, Z = _"]);
    assert_eq!(ask(&mut e, "?- wrap(A, L)."), vec!["A = _, L = [_, 1]"]);
    assert_eq!(ask(&mut e, "?- wrap(2, L)."), vec!["L = [2, 1]"]);
}

#[test]
fn test_conjunctive_query_shares_bindings() {
    let mut e = engine();
    load(&mut e, FAMILY);
    assert_eq!(
        ask(&mut e, "?- parent(tom, X), parent(X, Y)."),
        vec!["X = bob, Y = ann", "X = bob, Y = pat"]
    );
}

#[test]
fn test_unification_goals() {
    let mut e = engine();
    assert_eq!(ask(&mut e, "?- X = hello."), vec!["X = hello"]);
    assert_eq!(ask(&mut e, "?- [A, 2] = [1, B]."), vec!["A = 1, B = 2"]);
    assert_eq!(ask(&mut e, "?- a = b."), vec!["false."]);
    assert_eq!(ask(&mut e, "?- a \\= b."), vec!["true."]);
    assert_eq!(ask(&mut e, "?- a \\= a."), vec!["false."]);
    assert_eq!(ask(&mut e, "?- _ = anything."), vec!["true."]);
}

#[test]
fn test_occurs_check() {
    let mut e = engine();
    assert_eq!(ask(&mut e, "?- X = [1, X]."), vec!["false."]);
}

#[test]
fn test_member_yields_first_match_only() {
    let mut e = engine();
    assert_eq!(ask(&mut e, "?- member(X, [1, 2, 3])."), vec!["X = 1"]);
    assert_eq!(ask(&mut e, "?- member(2, [1, 2, 3])."), vec!["true."]);
    assert_eq!(ask(&mut e, "?- member(9, [1, 2, 3])."), vec!["false."]);
    assert_eq!(ask(&mut e, "?- member(X, [])."), vec!["false."]);
}

#[test]
fn test_arithmetic() {
    let mut e = engine();
    assert_eq!(ask(&mut e, "?- X is 2 + 3 * 4."), vec!["X = 14"]);
    assert_eq!(ask(&mut e, "?- X is (2 + 3) * 4."), vec!["X = 20"]);
    assert_eq!(ask(&mut e, "?- X is 7 / 2."), vec!["X = 3.5"]);
    assert_eq!(ask(&mut e, "?- X is 7 // 2."), vec!["X = 3"]);
    assert_eq!(ask(&mut e, "?- X is -7 mod 3."), vec!["X = 2"]);
    assert_eq!(ask(&mut e, "?- X is 2 ** 10."), vec!["X = 1024"]);
    assert_eq!(ask(&mut e, "?- X is max(3, 9) - abs(-1)."), vec!["X = 8"]);
    assert_eq!(ask(&mut e, "?- 5 is 2 + 3."), vec!["true."]);
}

#[test]
fn test_arithmetic_with_bound_variables() {
    let mut e = engine();
    load(&mut e, "double(X, Y) :- Y is X * 2.");
    assert_eq!(ask(&mut e, "?- double(21, Y)."), vec!["Y = 42"]);
}

#[test]
fn test_comparisons() {
    let mut e = engine();
    assert_eq!(ask(&mut e, "?- 1 < 2."), vec!["true."]);
    assert_eq!(ask(&mut e, "?- 2 =< 1."), vec!["false."]);
    assert_eq!(ask(&mut e, "?- 3 >= 3."), vec!["true."]);
    assert_eq!(ask(&mut e, "?- 1 + 1 =:= 2."), vec!["true."]);
    assert_eq!(ask(&mut e, "?- 1 =\\= 1.0."), vec!["false."]);
}

#[test]
fn test_arithmetic_error_fails_goal() {
    let mut e = engine();
    assert_eq!(ask(&mut e, "?- X is 1 / 0."), vec!["false."]);
    let debug = e.sink().debug_lines();
    assert_eq!(debug.len(), 1);
    assert!(debug[0].starts_with("Arithmetic error"));

    // An unbound variable cannot be evaluated
    assert_eq!(ask(&mut e, "?- X is Y + 1."), vec!["false."]);
}

#[test]
fn test_cut_commits_to_clause() {
    let mut e = engine();
    load(&mut e, "max(X, Y, X) :- X >= Y, !.\nmax(X, Y, Y).");
    assert_eq!(ask(&mut e, "?- max(3, 1, M)."), vec!["M = 3"]);
    assert_eq!(ask(&mut e, "?- max(1, 3, M)."), vec!["M = 3"]);
}

#[test]
fn test_cut_prunes_earlier_goals() {
    let mut e = engine();
    load(&mut e, "n(1).\nn(2).\nn(3).\nfirst(X) :- n(X), !.");
    assert_eq!(ask(&mut e, "?- first(X)."), vec!["X = 1"]);
    // The cut does not escape the predicate that owns it
    assert_eq!(
        ask(&mut e, "?- n(A), first(B)."),
        vec!["A = 1, B = 1", "A = 2, B = 1", "A = 3, B = 1"]
    );
}

#[test]
fn test_builtin_goals() {
    let mut e = engine();
    assert_eq!(ask(&mut e, "?- write(hello), nl."), vec!["hello", "", "true."]);
    assert_eq!(ask(&mut e, "?- write(\"quoted text\")."), vec!["quoted text", "true."]);
    assert_eq!(ask(&mut e, "?- true."), vec!["true."]);
    assert_eq!(ask(&mut e, "?- fail."), vec!["false."]);
    assert_eq!(ask(&mut e, "?- X = 5, write(X)."), vec!["5", "X = 5"]);
}

#[test]
fn test_unknown_predicate_fails() {
    let mut e = engine();
    assert_eq!(ask(&mut e, "?- nothere(1)."), vec!["false."]);
    assert_eq!(e.sink().debug_lines(), vec!["Unknown procedure: nothere/1"]);
}

#[test]
fn test_zero_arity_facts() {
    let mut e = engine();
    load(&mut e, "sunny.\nhappy :- sunny.");
    assert_eq!(ask(&mut e, "?- happy."), vec!["true."]);
}

#[test]
fn test_solution_display_is_truncated() {
    let mut e = engine();
    load(&mut e, "n(1).\nn(2).\nn(3).\nn(4).\nn(5).\nn(6).\nn(7).\nn(8).");
    assert_eq!(
        ask(&mut e, "?- n(X)."),
        vec!["X = 1", "X = 2", "X = 3", "X = 4", "X = 5", "... and 3 more"]
    );

    let mut e = LogicEngine::with_limits(
        BufferedSink::new(),
        Limits::default().with_max_displayed_solutions(2),
    );
    load(&mut e, "n(1).\nn(2).\nn(3).");
    assert_eq!(ask(&mut e, "?- n(X)."), vec!["X = 1", "X = 2", "... and 1 more"]);
}

#[test]
fn test_listing() {
    let mut e = engine();
    load(&mut e, "parent(tom, bob).\nparent(bob, ann).\nchild(X, Y) :- parent(Y, X).");
    let first = ask(&mut e, "LISTING");
    assert_eq!(
        first,
        vec!["parent(tom, bob).", "parent(bob, ann).", "", "child(X, Y) :- parent(Y, X)."]
    );
    // Listing never changes the database
    assert_eq!(ask(&mut e, "listing."), first);
    assert_eq!(e.database().clause_count(), 3);
}

#[test]
fn test_reset_clears_database() {
    let mut e = engine();
    load(&mut e, FAMILY);
    assert_eq!(ask(&mut e, "RESET"), vec!["% database cleared"]);
    assert!(e.database().is_empty());
    assert_eq!(ask(&mut e, "LISTING"), vec!["% database is empty"]);
    assert_eq!(ask(&mut e, "?- parent(tom, X)."), vec!["false."]);
}

#[test]
fn test_trace_output() {
    let mut e = engine();
    load(&mut e, "parent(tom, bob).");
    assert_eq!(ask(&mut e, "TRACE"), vec!["% trace on"]);
    assert!(e.is_tracing());
    assert_eq!(
        ask(&mut e, "?- parent(tom, X)."),
        vec!["Call: parent(tom, X)", "Exit: parent(tom, bob)", "X = bob"]
    );
    assert_eq!(
        ask(&mut e, "?- parent(bob, X)."),
        vec!["Call: parent(bob, X)", "Fail: parent(bob, X)", "false."]
    );
    assert_eq!(ask(&mut e, "NOTRACE"), vec!["% trace off"]);
    assert_eq!(ask(&mut e, "?- parent(tom, X)."), vec!["X = bob"]);
}

#[test]
fn test_comments_and_blank_lines() {
    let mut e = engine();
    assert!(ask(&mut e, "% a comment").is_empty());
    assert!(ask(&mut e, "   ").is_empty());
    assert!(ask(&mut e, "likes(mary, wine). % trailing comment").is_empty());
    assert_eq!(ask(&mut e, "?- likes(mary, X)."), vec!["X = wine"]);
    assert_eq!(ask(&mut e, "?- X is 7 % 4."), vec!["X = 3"]);
}

#[test]
fn test_malformed_clauses_are_reported() {
    let mut e = engine();
    for line in [
        "parent(tom bob).",
        "broken(X :- foo(X).",
        "empty(X) :- .",
        "bad(X) :- foo(X),, bar(X).",
        "Uppercase",
        "?- .",
    ] {
        let out = ask(&mut e, line);
        assert_eq!(out.len(), 1, "line: {}", line);
        assert!(out[0].starts_with("Malformed clause"), "line: {} gave {:?}", line, out);
    }
    assert!(e.database().is_empty());

    // The engine keeps working afterwards
    load(&mut e, "ok(1).");
    assert_eq!(ask(&mut e, "?- ok(X)."), vec!["X = 1"]);
}

#[test]
fn test_proof_depth_limit() {
    let limits = Limits::default().with_max_proof_depth(50);
    let mut e = LogicEngine::with_limits(BufferedSink::new(), limits);
    load(&mut e, "loop(X) :- loop(X).");
    assert_eq!(
        ask(&mut e, "?- loop(1)."),
        vec!["Resource limit exceeded: proof depth (limit 50)"]
    );
    // Still usable
    load(&mut e, "fine.");
    assert_eq!(ask(&mut e, "?- fine."), vec!["true."]);
}

#[test]
fn test_default_proof_depth_limit() {
    let mut e = engine();
    load(&mut e, "count(0).\ncount(N) :- N > 0, M is N - 1, count(M).");
    assert_eq!(ask(&mut e, "?- count(30)."), vec!["true."]);
    assert_eq!(
        ask(&mut e, "?- count(5000)."),
        vec!["Resource limit exceeded: proof depth (limit 128)"]
    );
}

#[test]
fn test_long_conjunction() {
    let mut e = engine();
    let goals = vec!["X = 1"; 300].join(", ");
    assert_eq!(ask(&mut e, &format!("?- {}.", goals)), vec!["X = 1"]);
}

#[test]
fn test_proof_step_limit() {
    let limits = Limits::default().with_max_proof_steps(10);
    let mut e = LogicEngine::with_limits(BufferedSink::new(), limits);
    load(&mut e, FAMILY);
    assert_eq!(
        ask(&mut e, "?- ancestor(X, Y)."),
        vec!["Resource limit exceeded: proof steps (limit 10)"]
    );
    // The counter restarts for each query
    assert_eq!(ask(&mut e, "?- parent(tom, X)."), vec!["X = bob"]);
}

#[test]
fn test_instances_are_independent() {
    let mut a = engine();
    let mut b = engine();
    load(&mut a, "only_a(1).");
    assert_eq!(ask(&mut b, "?- only_a(X)."), vec!["false."]);
    assert_eq!(ask(&mut a, "?- only_a(X)."), vec!["X = 1"]);
}

#[test]
fn test_into_sink_keeps_output() {
    let mut e = engine();
    e.execute("?- write(done).");
    assert_eq!(e.into_sink().log_lines(), vec!["done", "true."]);
}
