//! Pipeline tests: cache regeneration, cache reuse and invalidation,
//! and stage short-circuiting.

use ember::pipeline::{CacheConfig, CompileOutcome, Stage, build, compile_source};

fn temp_config() -> (tempfile::TempDir, CacheConfig) {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = CacheConfig::new(dir.path());
    (dir, config)
}

#[test]
fn build_writes_every_cache_artifact() {
    let (_dir, config) = temp_config();
    assert!(build(&config).expect("build runs"));
    assert!(config.table_path("regex").is_file());
    assert!(config.table_path("ember").is_file());
    assert!(config.automaton_path("ember").is_file());
}

#[test]
fn building_twice_yields_byte_identical_caches() {
    let (_dir, config) = temp_config();
    assert!(build(&config).expect("first build"));
    let table = std::fs::read(config.table_path("ember")).expect("read");
    let automaton = std::fs::read(config.automaton_path("ember")).expect("read");

    assert!(build(&config).expect("second build"));
    assert_eq!(table, std::fs::read(config.table_path("ember")).expect("read"));
    assert_eq!(
        automaton,
        std::fs::read(config.automaton_path("ember")).expect("read")
    );
}

#[test]
fn compile_rebuilds_missing_caches_on_demand() {
    let (_dir, config) = temp_config();
    let outcome = compile_source("print(2 + 3 * 4);", &config).expect("pipeline runs");
    assert!(outcome.ok(), "got: {outcome:?}");
    assert!(config.automaton_path("ember").is_file());
    assert!(config.table_path("ember").is_file());
}

#[test]
fn corrupt_caches_are_rebuilt_not_trusted() {
    let (_dir, config) = temp_config();
    assert!(build(&config).expect("build"));
    std::fs::write(config.table_path("ember"), b"{not json").expect("corrupt");
    std::fs::write(config.automaton_path("ember"), b"{}").expect("corrupt");

    let outcome = compile_source("1 + 1;", &config).expect("pipeline runs");
    assert!(outcome.ok(), "got: {outcome:?}");
}

#[test]
fn successful_compiles_surface_ast_and_context() {
    let (_dir, config) = temp_config();
    let outcome = compile_source(
        "type A { x : Number = 1; } new A().x + 1;",
        &config,
    )
    .expect("pipeline runs");
    let CompileOutcome::Success { context, .. } = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert!(context.class("A").is_some());
}

#[test]
fn the_first_failing_stage_short_circuits() {
    let (_dir, config) = temp_config();

    let lexical = compile_source("let x = $;", &config).expect("pipeline runs");
    let CompileOutcome::Failure { stage, errors } = lexical else {
        panic!("expected failure");
    };
    assert_eq!(stage, Stage::Lexical);
    assert!(errors[0].contains("Lexical error"));

    let syntactic = compile_source("let = 5 in x;", &config).expect("pipeline runs");
    let CompileOutcome::Failure { stage, errors } = syntactic else {
        panic!("expected failure");
    };
    assert_eq!(stage, Stage::Syntactic);
    assert!(errors[0].contains("Syntax error"));

    let semantic = compile_source("ghost + 1;", &config).expect("pipeline runs");
    let CompileOutcome::Failure { stage, errors } = semantic else {
        panic!("expected failure");
    };
    assert_eq!(stage, Stage::Semantic);
    assert!(errors[0].contains("is not defined"));
}
