// Integration tests for running whole programs through a session

use interp_farm::config::Limits;
use interp_farm::output::{Channel, OutputLine};
use interp_farm::session::{Language, Session};
use interp_farm::ExecOutcome;

fn log_text(output: &[OutputLine]) -> Vec<&str> {
    output
        .iter()
        .filter(|line| line.channel == Channel::Log)
        .map(|line| line.text.as_str())
        .collect()
}

#[test]
fn test_forth_program() {
    let source = r#"
        \ squares and a countdown
        : SQUARE ( n -- n*n ) DUP * ;
        : COUNTDOWN DUP 0 > IF DUP . 1 - RECURSE THEN ;

        4 SQUARE .
        3 COUNTDOWN DROP
        "done" .
    "#;

    let mut session = Session::new();
    let report = session.run_program(Language::Forth, source);

    assert!(report.completed(), "Program stopped: {:?}", report);
    assert_eq!(report.executed_lines, 6);
    assert_eq!(log_text(&report.output), vec!["16", "3", "2", "1", "done"]);
    assert!(session.forth().stack().is_empty());
}

#[test]
fn test_forth_program_stops_at_first_error() {
    let source = r#"
        1 2 +
        DROP DROP
        99 .
    "#;

    let mut session = Session::new();
    let report = session.run_program(Language::Forth, source);

    assert_eq!(report.stopped_at, Some(3));
    assert_eq!(report.executed_lines, 2);
    assert_eq!(log_text(&report.output), vec!["Stack underflow in DROP"]);
}

#[test]
fn test_prolog_program_never_stops() {
    let source = r#"
        % family facts
        parent(tom, bob).
        parent(bob, ann).
        grandparent(X, Z) :- parent(X, Y), parent(Y, Z).

        ?- grandparent(tom, Who).
        ?- parent(ann, _).
        not a clause
        ?- parent(tom, X).
    "#;

    let mut session = Session::new();
    let report = session.run_program(Language::Prolog, source);

    assert!(report.completed());
    assert_eq!(report.executed_lines, 8);
    let log = log_text(&report.output);
    assert_eq!(log[0], "Who = ann");
    assert_eq!(log[1], "false.");
    assert!(log[2].starts_with("Malformed clause"));
    assert_eq!(log[3], "X = bob");
}

#[test]
fn test_engines_are_isolated() {
    let mut session = Session::new();
    session.execute(Language::Forth, "1 2 3");
    session.execute(Language::Prolog, "fact(1).");

    assert_eq!(session.forth().stack().depth(), 3);
    assert_eq!(session.prolog().database().clause_count(), 1);

    session.reset(Language::Forth);
    assert!(session.forth().stack().is_empty());
    assert_eq!(session.prolog().database().clause_count(), 1);
}

#[test]
fn test_output_is_drained_per_language() {
    let mut session = Session::new();
    assert_eq!(session.execute(Language::Forth, "42 ."), ExecOutcome::Continue);
    assert_eq!(session.execute(Language::Prolog, "?- true."), ExecOutcome::Continue);

    let forth = session.take_output(Language::Forth);
    assert_eq!(log_text(&forth), vec!["42"]);
    assert!(session.take_output(Language::Forth).is_empty());
    assert_eq!(log_text(&session.take_output(Language::Prolog)), vec!["true."]);
}

#[test]
fn test_debug_channel_is_separate() {
    let mut session = Session::new();
    let report = session.run_program(Language::Prolog, "?- X is 1 / 0.");

    let debug: Vec<&OutputLine> = report
        .output
        .iter()
        .filter(|line| line.channel == Channel::Debug)
        .collect();
    assert_eq!(debug.len(), 1);
    assert_eq!(log_text(&report.output), vec!["false."]);
}

#[test]
fn test_limits_apply_to_both_engines() {
    let limits = Limits::default()
        .with_max_call_depth(8)
        .with_max_proof_depth(8);
    let mut session = Session::with_limits(limits);

    session.execute(Language::Forth, ": DEEP RECURSE ;");
    assert_eq!(session.execute(Language::Forth, "DEEP"), ExecOutcome::Error);
    assert_eq!(
        log_text(&session.take_output(Language::Forth)),
        vec!["Return stack overflow (limit 8)"]
    );

    session.execute(Language::Prolog, "deep(X) :- deep(X).");
    assert_eq!(session.execute(Language::Prolog, "?- deep(a)."), ExecOutcome::Continue);
    assert_eq!(
        log_text(&session.take_output(Language::Prolog)),
        vec!["Resource limit exceeded: proof depth (limit 8)"]
    );
}

#[test]
fn test_language_names() {
    assert_eq!("pl".parse::<Language>(), Ok(Language::Prolog));
    assert_eq!("4th".parse::<Language>(), Ok(Language::Forth));
    assert_eq!(Language::default(), Language::Forth);
    assert_eq!(Language::Prolog.prompt(), "prolog> ");
}
