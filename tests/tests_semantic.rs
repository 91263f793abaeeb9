//! Semantic analyzer tests: the three passes end to end over parsed
//! Ember programs.

use ember::grammar::{ParseTable, build_table};
use ember::lexer::{Lexer, build_lexer};
use ember::parser::Parser;
use ember::regex::RegexCompiler;
use ember::semantic::{SemanticError, SemanticResult, analyze};
use ember::syntax::{Ast, ember_grammar, ember_rules, ember_terminal_of};
use once_cell::sync::Lazy;

struct Fixture {
    lexer: Lexer,
    grammar: ember::grammar::Grammar<Ast>,
    table: ParseTable,
}

static FIXTURE: Lazy<Fixture> = Lazy::new(|| {
    let regex = RegexCompiler::new().expect("regex grammar builds");
    let lexer = build_lexer(&regex, ember_rules()).expect("ember rules build");
    let grammar = ember_grammar();
    let table = build_table(&grammar).expect("ember grammar is conflict-free");
    Fixture {
        lexer,
        grammar,
        table,
    }
});

fn run(source: &str) -> SemanticResult {
    let tokens = FIXTURE.lexer.run(source).expect("source lexes");
    let parser = Parser::new(&FIXTURE.grammar, &FIXTURE.table, ember_terminal_of);
    let tree = parser.parse(&tokens).expect("source parses");
    let ast = FIXTURE.grammar.evaluate(&tree, &tokens);
    analyze(&ast)
}

fn assert_clean(source: &str) -> SemanticResult {
    let result = run(source);
    assert!(result.ok, "expected no errors, got: {:?}", result.errors);
    result
}

// ----------------------------------------------------------------------
// End-to-end scenarios
// ----------------------------------------------------------------------

#[test]
fn arithmetic_program_checks_without_errors() {
    assert_clean("print(2 + 3 * 4);");
}

#[test]
fn class_with_inheritance_registers_parent_and_infers_attributes() {
    let result = assert_clean(
        "type A { x : Number = 1; } \
         type B inherits A { y : Number = 2; } \
         new B().x + new B().y;",
    );
    let a = result.context.class("A").expect("A registered");
    let b = result.context.class("B").expect("B registered");
    assert_eq!(a.parent.as_deref(), Some("Object"));
    assert_eq!(b.parent.as_deref(), Some("A"));
    assert_eq!(a.attribute("x").and_then(|x| x.ty.as_deref()), Some("Number"));
    assert_eq!(b.attribute("y").and_then(|y| y.ty.as_deref()), Some("Number"));
}

#[test]
fn structural_protocol_implementation_is_assigned() {
    let result = assert_clean(
        "protocol Hashable { hash() : Number; } \
         type Point { hash() : Number => 7; } \
         new Point().hash();",
    );
    let point = result.context.class("Point").expect("Point registered");
    assert!(
        point.protocols.iter().any(|p| p == "Hashable"),
        "Point should implement Hashable, has: {:?}",
        point.protocols
    );
    assert!(result.context.conforms("Point", "Hashable"));
}

#[test]
fn circular_inheritance_is_reported_exactly_once() {
    let result = run("type A inherits B {} type B inherits A {} 0;");
    assert!(!result.ok);
    assert_eq!(result.errors.len(), 1, "got: {:?}", result.errors);
    assert!(result.errors[0].to_string().contains("Circular inheritance"));
}

#[test]
fn vector_literals_resolve_to_the_lub_of_their_elements() {
    let result = assert_clean("let v = [1, 2, 3] in v;");
    assert!(result.context.class("[Number]").is_some());

    let mixed = assert_clean("let v = [1, \"x\"] in v;");
    assert!(mixed.context.class("[Object]").is_some());
}

// ----------------------------------------------------------------------
// Inference details
// ----------------------------------------------------------------------

#[test]
fn function_parameter_types_are_inferred_from_use() {
    let result = assert_clean("function double(x) => x * 2; double(21);");
    let double = result.context.methods.get("double").expect("registered");
    assert_eq!(double.return_type.as_deref(), Some("Number"));
}

#[test]
fn method_signatures_are_materialized_after_inference() {
    let result = assert_clean(
        "type Counter { value = 0; bump(step) => step + 1; } \
         new Counter().bump(5);",
    );
    let counter = result.context.class("Counter").expect("registered");
    let bump = counter.method("bump").expect("bump materialized");
    assert_eq!(bump.return_type.as_deref(), Some("Number"));
    assert_eq!(bump.parameters.len(), 1);
    assert_eq!(bump.parameters[0].ty.as_deref(), Some("Number"));
}

#[test]
fn for_loops_iterate_ranges_at_their_element_type() {
    assert_clean("let total = 0 in for (i in range(1, 10)) total := total + i;");
}

#[test]
fn comprehensions_build_vectors_of_the_body_type() {
    assert_clean("let squares = [i * i || i in range(1, 5)] in squares.get(0) + 1;");
}

#[test]
fn string_concatenation_accepts_any_operands() {
    assert_clean("let label = \"total: \" @ 42 in print(label);");
}

#[test]
fn as_casts_force_the_expression_type() {
    assert_clean(
        "type A { } type B inherits A { } \
         let a = new B() as A in a is B;",
    );
}

// ----------------------------------------------------------------------
// Error taxonomy
// ----------------------------------------------------------------------

#[test]
fn duplicate_class_declarations_are_errors() {
    let result = run("type A {} type A {} 0;");
    assert!(matches!(
        result.errors.first(),
        Some(SemanticError::DuplicateType { .. })
    ));
}

#[test]
fn inheriting_from_sealed_primitives_is_forbidden() {
    let result = run("type Fancy inherits Number {} 0;");
    assert!(matches!(
        result.errors.first(),
        Some(SemanticError::ForbiddenInheritance { .. })
    ));
}

#[test]
fn protocols_may_not_redeclare_parent_methods() {
    let result = run(
        "protocol Base { id() : Number; } \
         protocol Child extends Base { id() : Number; } 0;",
    );
    assert!(matches!(
        result.errors.first(),
        Some(SemanticError::ProtocolRedeclaration { .. })
    ));
}

#[test]
fn undefined_variables_report_their_position() {
    let result = run("ghost + 1;");
    match result.errors.first() {
        Some(SemanticError::UndefinedVariable { name, position }) => {
            assert_eq!(name, "ghost");
            assert_eq!(position.line, 1);
            assert_eq!(position.column, 1);
        }
        other => panic!("expected an undefined variable, got {other:?}"),
    }
}

#[test]
fn call_arity_is_checked() {
    let result = run("function f(x, y) => x + y; f(1);");
    assert!(matches!(
        result.errors.first(),
        Some(SemanticError::ArityMismatch { .. })
    ));
}

#[test]
fn boolean_conditions_are_enforced() {
    let result = run("if (1 + 2) 1 else 2;");
    assert!(!result.ok);
    assert!(matches!(
        result.errors.first(),
        Some(SemanticError::InconsistentInference)
    ));
}

#[test]
fn override_must_keep_the_base_signature() {
    let result = run(
        "type A { tag() : Number => 1; } \
         type B inherits A { tag() : String => \"x\"; } \
         new B().tag();",
    );
    assert!(
        result
            .errors
            .iter()
            .any(|e| matches!(e, SemanticError::OverrideMismatch { .. })),
        "got: {:?}",
        result.errors
    );
}

#[test]
fn matching_override_is_accepted() {
    assert_clean(
        "type A { tag() : Number => 1; } \
         type B inherits A { tag() : Number => 2; } \
         new B().tag();",
    );
}

#[test]
fn later_passes_are_skipped_after_collection_errors() {
    // The duplicate stops analysis before the (also broken) body
    // would be checked.
    let result = run("type A {} type A {} ghost;");
    assert_eq!(result.errors.len(), 1);
    assert!(matches!(
        result.errors[0],
        SemanticError::DuplicateType { .. }
    ));
}
