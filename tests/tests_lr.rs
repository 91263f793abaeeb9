//! LR(1) generator tests: construction, conflicts, FIRST/FOLLOW, and
//! cache determinism.

use ember::grammar::{Action, Grammar, ParseTable, TableError, build_table};
use ember::lexer::Token;
use ember::syntax::ember_grammar;

fn leaf(_: &Token) -> u32 {
    0
}

/// S → C C ; C → c C | d: LR(1) but not SLR(1).
fn cc_grammar() -> Grammar<u32> {
    let mut g = Grammar::new("cc", "S", leaf);
    g.terminals(&["c", "d"]);
    g.rule("S", &["C", "C"], |_| 0);
    g.rule("C", &["c", "C"], |_| 0);
    g.rule("C", &["d"], |_| 0);
    g
}

#[test]
fn canonical_construction_state_count() {
    let table = build_table(&cc_grammar()).expect("no conflicts");
    assert_eq!(table.state_count(), 10);
}

#[test]
fn the_initial_state_shifts_both_terminals() {
    let table = build_table(&cc_grammar()).expect("no conflicts");
    assert!(matches!(table.action(0, "c"), Some(Action::Shift(_))));
    assert!(matches!(table.action(0, "d"), Some(Action::Shift(_))));
    assert_eq!(table.action(0, "$"), None);
}

#[test]
fn conflicts_name_both_actions_and_the_lookahead() {
    let mut g: Grammar<u32> = Grammar::new("dangling", "E", leaf);
    g.terminals(&["+", "x"]);
    g.rule("E", &["E", "+", "E"], |_| 0);
    g.rule("E", &["x"], |_| 0);

    let error = build_table(&g).expect_err("ambiguous grammar");
    let TableError::Conflict {
        lookahead,
        existing,
        incoming,
        ..
    } = &error
    else {
        panic!("expected a conflict, got {error:?}");
    };
    assert_eq!(lookahead, "+");
    let report = format!("{existing} {incoming}");
    assert!(report.contains("E → E + E"), "got: {report}");
}

#[test]
fn first_and_follow_fixed_points() {
    // S → A b ; A → a | ε
    let mut g: Grammar<u32> = Grammar::new("ff", "S", leaf);
    g.terminals(&["a", "b"]);
    g.rule("S", &["A", "b"], |_| 0);
    g.rule("A", &["a"], |_| 0);
    g.rule("A", &[], |_| 0);

    let first = g.first_sets();
    let s = g.symbol_id("S").expect("S registered");
    let a_terminal = g.symbol_id("a").expect("a registered");
    let b_terminal = g.symbol_id("b").expect("b registered");
    assert!(first[s].contains(&a_terminal));
    assert!(first[s].contains(&b_terminal));

    let follow = g.follow_sets();
    let a = g.symbol_id("A").expect("A registered");
    assert!(follow[a].contains(&b_terminal));
    assert!(follow[g.start()].contains(&g.eof()));
}

#[test]
fn persisted_tables_are_byte_identical_across_builds() {
    let dir = tempfile::tempdir().expect("temp dir");
    let first_path = dir.path().join("first_lr.json");
    let second_path = dir.path().join("second_lr.json");

    build_table(&cc_grammar())
        .expect("no conflicts")
        .save_to(&first_path)
        .expect("save");
    build_table(&cc_grammar())
        .expect("no conflicts")
        .save_to(&second_path)
        .expect("save");

    let first = std::fs::read(&first_path).expect("read");
    let second = std::fs::read(&second_path).expect("read");
    assert_eq!(first, second);
}

#[test]
fn the_ember_grammar_is_conflict_free_and_deterministic() {
    let grammar = ember_grammar();
    let table = build_table(&grammar).expect("the Ember grammar must be conflict-free");
    let again = build_table(&grammar).expect("second build");
    assert_eq!(
        serde_json::to_string(&table).expect("json"),
        serde_json::to_string(&again).expect("json"),
    );
}

#[test]
fn loaded_tables_validate_against_their_grammar() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("cc_lr.json");
    build_table(&cc_grammar())
        .expect("no conflicts")
        .save_to(&path)
        .expect("save");

    let loaded = ParseTable::load_from(&path).expect("load");
    assert!(loaded.validate(&cc_grammar()).is_ok());

    // A grammar with a different terminal inventory must reject the
    // cached table.
    let mut other: Grammar<u32> = Grammar::new("cc", "S", leaf);
    other.terminals(&["c", "d", "e"]);
    other.rule("S", &["c"], |_| 0);
    assert!(matches!(
        loaded.validate(&other),
        Err(TableError::ShapeMismatch { .. })
    ));
}
