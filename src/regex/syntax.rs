//! Regex scanning, the regex grammar, and compilation to automata.

use smol_str::SmolStr;
use thiserror::Error;

use crate::automata::Automaton;
use crate::base::Position;
use crate::grammar::{Grammar, ParseTable, TableError, build_table};
use crate::lexer::{Token, TokenKind};
use crate::parser::{ParseError, Parser};

use super::ast::{ClassItem, RegexAst};

/// Errors raised while compiling a regex pattern.
#[derive(Debug, Error)]
pub enum RegexError {
    #[error("invalid pattern at {position}: {message}")]
    Scan { message: String, position: Position },

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Table(#[from] TableError),
}

/// Characters that stand for themselves as grammar terminals.
const SPECIALS: &[char] = &['(', ')', '[', ']', '|', '*', '+', '?', '.', '-', '^'];

/// Scan a pattern into tokens for the regex grammar: unescaped special
/// characters become `Symbol` tokens spelled as themselves, everything
/// else becomes a literal (`Identifier`) token carrying one character.
pub fn scan_pattern(pattern: &str) -> Result<Vec<Token>, RegexError> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    let mut column = 0;

    while let Some(symbol) = chars.next() {
        column += 1;
        let position = Position::new(1, column);
        if symbol == '\\' {
            let Some(escaped) = chars.next() else {
                return Err(RegexError::Scan {
                    message: "trailing escape".to_string(),
                    position,
                });
            };
            column += 1;
            let literal = match escaped {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                other => other,
            };
            tokens.push(Token::new(
                TokenKind::Identifier,
                SmolStr::new(literal.to_string()),
                position,
            ));
        } else if SPECIALS.contains(&symbol) {
            tokens.push(Token::new(
                TokenKind::Symbol,
                SmolStr::new(symbol.to_string()),
                position,
            ));
        } else {
            tokens.push(Token::new(
                TokenKind::Identifier,
                SmolStr::new(symbol.to_string()),
                position,
            ));
        }
    }

    tokens.push(Token::eof(Position::new(1, column + 1)));
    Ok(tokens)
}

fn leaf(token: &Token) -> RegexAst {
    match token.value.chars().next() {
        Some(symbol) => RegexAst::Literal(symbol),
        None => RegexAst::Empty,
    }
}

fn take2(values: Vec<RegexAst>, left: usize, right: usize) -> (RegexAst, RegexAst) {
    let mut values = values;
    let b = values.swap_remove(right.max(left));
    let a = values.swap_remove(left.min(right));
    (a, b)
}

/// The regex grammar, with builders folding derivations to [`RegexAst`].
///
/// ```text
/// Union    → Union '|' Concat | Concat
/// Concat   → Concat Suffixed | Suffixed
/// Suffixed → Atom '*' | Atom '+' | Atom '?' | Atom
/// Atom     → ch | '.' | '(' Union ')' | '[' Items ']' | '[' '^' Items ']'
/// Items    → Items Item | Item
/// Item     → ch | ch '-' ch
/// ```
pub fn regex_grammar() -> Grammar<RegexAst> {
    let mut g: Grammar<RegexAst> = Grammar::new("regex", "Union", leaf);
    g.terminals(&["(", ")", "[", "]", "|", "*", "+", "?", ".", "-", "^", "ch"]);

    g.rule("Union", &["Union", "|", "Concat"], |values| {
        let (left, right) = take2(values, 0, 2);
        RegexAst::Union(Box::new(left), Box::new(right))
    });
    g.rule("Union", &["Concat"], |mut values| {
        values.pop().unwrap_or(RegexAst::Empty)
    });

    g.rule("Concat", &["Concat", "Suffixed"], |values| {
        let (left, right) = take2(values, 0, 1);
        RegexAst::Concat(Box::new(left), Box::new(right))
    });
    g.rule("Concat", &["Suffixed"], |mut values| {
        values.pop().unwrap_or(RegexAst::Empty)
    });

    g.rule("Suffixed", &["Atom", "*"], |mut values| {
        RegexAst::Star(Box::new(values.swap_remove(0)))
    });
    g.rule("Suffixed", &["Atom", "+"], |mut values| {
        RegexAst::Plus(Box::new(values.swap_remove(0)))
    });
    g.rule("Suffixed", &["Atom", "?"], |mut values| {
        RegexAst::Optional(Box::new(values.swap_remove(0)))
    });
    g.rule("Suffixed", &["Atom"], |mut values| {
        values.pop().unwrap_or(RegexAst::Empty)
    });

    g.rule("Atom", &["ch"], |mut values| {
        values.pop().unwrap_or(RegexAst::Empty)
    });
    g.rule("Atom", &["."], |_values| RegexAst::Any);
    g.rule("Atom", &["(", "Union", ")"], |mut values| {
        values.swap_remove(1)
    });
    g.rule("Atom", &["[", "Items", "]"], |mut values| {
        values.swap_remove(1)
    });
    g.rule("Atom", &["[", "^", "Items", "]"], |mut values| {
        match values.swap_remove(2) {
            RegexAst::Class(items) => RegexAst::NegatedClass(items),
            other => other,
        }
    });

    g.rule("Items", &["Items", "Item"], |values| {
        let (left, right) = take2(values, 0, 1);
        match (left, right) {
            (RegexAst::Class(mut items), RegexAst::Class(more)) => {
                items.extend(more);
                RegexAst::Class(items)
            }
            (left, _) => left,
        }
    });
    g.rule("Items", &["Item"], |mut values| {
        values.pop().unwrap_or(RegexAst::Empty)
    });

    g.rule("Item", &["ch"], |mut values| {
        match values.pop() {
            Some(RegexAst::Literal(symbol)) => RegexAst::Class(vec![ClassItem::Single(symbol)]),
            _ => RegexAst::Class(Vec::new()),
        }
    });
    g.rule("Item", &["ch", "-", "ch"], |values| {
        let (from, to) = take2(values, 0, 2);
        match (from, to) {
            (RegexAst::Literal(from), RegexAst::Literal(to)) => {
                RegexAst::Class(vec![ClassItem::Range(from, to)])
            }
            _ => RegexAst::Class(Vec::new()),
        }
    });

    g
}

fn terminal_of(token: &Token) -> SmolStr {
    match token.kind {
        TokenKind::Symbol => token.value.clone(),
        _ => SmolStr::new("ch"),
    }
}

/// A reusable regex compiler: the grammar plus its LR(1) table.
///
/// The pipeline loads the table from the cache; [`RegexCompiler::new`]
/// builds it in place for tests and cold builds.
pub struct RegexCompiler {
    grammar: Grammar<RegexAst>,
    table: ParseTable,
}

impl RegexCompiler {
    /// Build the regex table from scratch.
    pub fn new() -> Result<Self, TableError> {
        let grammar = regex_grammar();
        let table = build_table(&grammar)?;
        Ok(Self { grammar, table })
    }

    /// Use a previously persisted table. The table is re-validated
    /// against the grammar's shape.
    pub fn with_table(table: ParseTable) -> Result<Self, TableError> {
        let grammar = regex_grammar();
        table.validate(&grammar)?;
        Ok(Self { grammar, table })
    }

    pub fn table(&self) -> &ParseTable {
        &self.table
    }

    /// Parse `pattern` into its AST.
    pub fn parse(&self, pattern: &str) -> Result<RegexAst, RegexError> {
        let tokens = scan_pattern(pattern)?;
        let parser = Parser::new(&self.grammar, &self.table, terminal_of);
        let tree = parser.parse(&tokens)?;
        Ok(self.grammar.evaluate(&tree, &tokens))
    }

    /// Compile `pattern` all the way to an ε-NFA.
    pub fn compile(&self, pattern: &str) -> Result<Automaton, RegexError> {
        Ok(self.parse(pattern)?.to_automaton())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiler() -> RegexCompiler {
        RegexCompiler::new().expect("regex grammar must be conflict-free")
    }

    #[test]
    fn the_regex_grammar_is_conflict_free() {
        compiler();
    }

    #[test]
    fn literal_concatenation() {
        let automaton = compiler().compile("abc").unwrap();
        assert!(automaton.matches("abc"));
        assert!(!automaton.matches("ab"));
    }

    #[test]
    fn union_and_star_and_grouping() {
        let automaton = compiler().compile("a(b|c)*d").unwrap();
        assert!(automaton.matches("abbcd"));
        assert!(automaton.matches("ad"));
        assert!(!automaton.matches("abx"));
    }

    #[test]
    fn class_with_range_and_plus() {
        let automaton = compiler().compile("[a-z_][a-z0-9_]*").unwrap();
        assert!(automaton.matches("snake_case1"));
        assert!(!automaton.matches("1starts_with_digit"));
    }

    #[test]
    fn dot_matches_any_single_character() {
        let automaton = compiler().compile("a.c").unwrap();
        assert!(automaton.matches("abc"));
        assert!(automaton.matches("a-c"));
        assert!(!automaton.matches("ac"));
    }

    #[test]
    fn negated_class_drives_the_complement_edge() {
        let automaton = compiler().compile(r#""[^"]*""#).unwrap();
        assert!(automaton.matches("\"hello\""));
        assert!(automaton.matches("\"\""));
        assert!(!automaton.matches("\"unterminated"));
        assert!(!automaton.matches("\"two\"\"quotes\""));
    }

    #[test]
    fn escapes_produce_literals() {
        let automaton = compiler().compile(r"\*\+\\").unwrap();
        assert!(automaton.matches("*+\\"));
        assert!(!automaton.matches("*+"));
    }

    #[test]
    fn trailing_escape_is_a_scan_error() {
        let err = compiler().compile("ab\\").unwrap_err();
        assert!(matches!(err, RegexError::Scan { .. }));
    }
}
