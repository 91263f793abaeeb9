//! Regex front-end tests: pattern semantics all the way through the
//! LR machinery and the automaton combinators.

use ember::regex::RegexCompiler;
use once_cell::sync::Lazy;
use rstest::rstest;

static COMPILER: Lazy<RegexCompiler> =
    Lazy::new(|| RegexCompiler::new().expect("regex grammar is conflict-free"));

fn matches(pattern: &str, input: &str) -> bool {
    COMPILER
        .compile(pattern)
        .unwrap_or_else(|e| panic!("pattern {pattern:?} must compile: {e}"))
        .matches(input)
}

#[rstest]
#[case("a(b|c)*d", "abbcd", true)]
#[case("a(b|c)*d", "ad", true)]
#[case("a(b|c)*d", "acbcbd", true)]
#[case("a(b|c)*d", "abx", false)]
#[case("a(b|c)*d", "bd", false)]
#[case("a(b|c)*d", "abcd" , true)]
fn union_star_grouping(#[case] pattern: &str, #[case] input: &str, #[case] expected: bool) {
    assert_eq!(matches(pattern, input), expected);
}

#[rstest]
#[case("colou?r", "color", true)]
#[case("colou?r", "colour", true)]
#[case("colou?r", "colouur", false)]
#[case("ab+", "ab", true)]
#[case("ab+", "abbb", true)]
#[case("ab+", "a", false)]
fn plus_and_optional(#[case] pattern: &str, #[case] input: &str, #[case] expected: bool) {
    assert_eq!(matches(pattern, input), expected);
}

#[rstest]
#[case("[a-c]+", "abcba", true)]
#[case("[a-c]+", "abd", false)]
#[case("[a-c]+", "", false)]
#[case("[0-9]+(\\.[0-9]+)?", "314", true)]
#[case("[0-9]+(\\.[0-9]+)?", "3.14", true)]
#[case("[0-9]+(\\.[0-9]+)?", "3.", false)]
#[case("[0-9]+(\\.[0-9]+)?", ".14", false)]
fn classes_and_ranges(#[case] pattern: &str, #[case] input: &str, #[case] expected: bool) {
    assert_eq!(matches(pattern, input), expected);
}

#[rstest]
#[case("a.c", "abc", true)]
#[case("a.c", "a.c", true)]
#[case("a.c", "ac", false)]
#[case("[^ab]", "c", true)]
#[case("[^ab]", "a", false)]
#[case("//[^\\n]*", "// a comment", true)]
#[case("//[^\\n]*", "// a\nb", false)]
fn dot_and_negated_classes(#[case] pattern: &str, #[case] input: &str, #[case] expected: bool) {
    assert_eq!(matches(pattern, input), expected);
}

#[test]
fn escaped_specials_are_literals() {
    assert!(matches(r"\(\)\*", "()*"));
    assert!(!matches(r"\(\)\*", "()"));
}

#[test]
fn malformed_patterns_are_rejected() {
    assert!(COMPILER.compile("a(b").is_err());
    assert!(COMPILER.compile("*a").is_err());
    assert!(COMPILER.compile("a\\").is_err());
}

#[test]
fn compiled_pattern_agrees_with_its_determinization() {
    let nfa = COMPILER.compile("a(b|c)*d").expect("compiles");
    let dfa = nfa.determinize();
    for input in ["abbcd", "ad", "abx", "", "ab", "addd", "acd"] {
        assert_eq!(nfa.matches(input), dfa.matches(input), "on {input:?}");
    }
}
