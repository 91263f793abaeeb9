//! The deterministic shift-reduce loop.

use smol_str::SmolStr;

use crate::base::Position;
use crate::grammar::{Action, EOF_NAME, Grammar, ParseTable};
use crate::lexer::{Token, TokenKind};

/// A derivation tree: leaves index into the parsed token list, inner
/// nodes name the production that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derivation {
    Leaf {
        token: usize,
    },
    Node {
        production: usize,
        children: Vec<Derivation>,
    },
}

/// A syntax error: the offending token plus the terminals the current
/// state would have accepted. No recovery is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub position: Position,
    pub found: SmolStr,
    pub expected: Vec<SmolStr>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut expected = self.expected.clone();
        expected.sort_unstable();
        write!(
            f,
            "Syntax error at {}: unexpected {}, expected one of: {}",
            self.position,
            if self.found.is_empty() {
                "end of input".to_string()
            } else {
                format!("'{}'", self.found)
            },
            expected.join(", ")
        )
    }
}

impl std::error::Error for ParseError {}

/// The table-driven parser for one grammar.
pub struct Parser<'a, V> {
    grammar: &'a Grammar<V>,
    table: &'a ParseTable,
    /// Maps a token to the grammar terminal it stands for.
    terminal_of: fn(&Token) -> SmolStr,
}

impl<'a, V> Parser<'a, V> {
    pub fn new(
        grammar: &'a Grammar<V>,
        table: &'a ParseTable,
        terminal_of: fn(&Token) -> SmolStr,
    ) -> Self {
        Self {
            grammar,
            table,
            terminal_of,
        }
    }

    /// Run the shift-reduce loop over `tokens` (which must end with an
    /// `Eof` token) and return the derivation tree.
    pub fn parse(&self, tokens: &[Token]) -> Result<Derivation, ParseError> {
        let mut states: Vec<usize> = vec![0];
        let mut symbols: Vec<Derivation> = Vec::new();
        let mut index = 0;

        let eof = Token::eof(Position::start());

        loop {
            let token = tokens
                .get(index)
                .or_else(|| tokens.last())
                .unwrap_or(&eof);
            let terminal = if token.kind == TokenKind::Eof {
                SmolStr::new(EOF_NAME)
            } else {
                (self.terminal_of)(token)
            };
            let state = *states.last().unwrap_or(&0);

            match self.table.action(state, &terminal) {
                Some(Action::Shift(next)) => {
                    symbols.push(Derivation::Leaf { token: index });
                    states.push(next);
                    index += 1;
                }
                Some(Action::Reduce(production)) => {
                    let arity = self.grammar.production(production).rhs.len();
                    // A table that does not match the grammar could ask
                    // to pop more than was pushed; report instead of
                    // panicking.
                    let Some(at) = symbols.len().checked_sub(arity) else {
                        return Err(self.error_at(token, state));
                    };
                    let children = symbols.split_off(at);
                    states.truncate(states.len() - arity);

                    let lhs = self.grammar.production(production).lhs;
                    let lhs_name = self.grammar.symbol_name(lhs);
                    let top = *states.last().unwrap_or(&0);
                    let Some(target) = self.table.goto(top, lhs_name) else {
                        // A missing goto means the table does not match
                        // the grammar; surface it as a syntax error at
                        // the current token rather than panicking.
                        return Err(self.error_at(token, state));
                    };

                    symbols.push(Derivation::Node {
                        production,
                        children,
                    });
                    states.push(target);
                }
                Some(Action::Accept) => {
                    return match symbols.pop() {
                        Some(tree) => Ok(tree),
                        None => Err(self.error_at(token, state)),
                    };
                }
                None => return Err(self.error_at(token, state)),
            }
        }
    }

    fn error_at(&self, token: &Token, state: usize) -> ParseError {
        ParseError {
            position: token.position,
            found: token.value.clone(),
            expected: self.table.expected_terminals(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Position;
    use crate::grammar::build_table;

    /// Sums over '+': S → S + n | n, evaluated to the sum.
    fn sum_grammar() -> Grammar<i64> {
        let mut g = Grammar::new(
            "sum",
            "S",
            |token| token.value.parse::<i64>().unwrap_or(0),
        );
        g.terminals(&["+", "n"]);
        g.rule("S", &["S", "+", "n"], |values| values[0] + values[2]);
        g.rule("S", &["n"], |mut values| values.pop().unwrap_or(0));
        g
    }

    fn tokens_of(text: &str) -> Vec<Token> {
        let mut out: Vec<Token> = text
            .split_whitespace()
            .enumerate()
            .map(|(i, word)| {
                let kind = if word == "+" {
                    TokenKind::Symbol
                } else {
                    TokenKind::Number
                };
                Token::new(kind, word, Position::new(1, i + 1))
            })
            .collect();
        out.push(Token::eof(Position::new(1, out.len() + 1)));
        out
    }

    fn terminal_of(token: &Token) -> SmolStr {
        match token.kind {
            TokenKind::Number => SmolStr::new("n"),
            _ => token.value.clone(),
        }
    }

    #[test]
    fn parse_and_evaluate_a_sum() {
        let grammar = sum_grammar();
        let table = build_table(&grammar).unwrap();
        let parser = Parser::new(&grammar, &table, terminal_of);
        let tokens = tokens_of("1 + 2 + 39");
        let tree = parser.parse(&tokens).unwrap();
        assert_eq!(grammar.evaluate(&tree, &tokens), 42);
    }

    #[test]
    fn syntax_error_reports_expected_terminals() {
        let grammar = sum_grammar();
        let table = build_table(&grammar).unwrap();
        let parser = Parser::new(&grammar, &table, terminal_of);
        let tokens = tokens_of("1 + + 2");
        let err = parser.parse(&tokens).unwrap_err();
        assert_eq!(err.position, Position::new(1, 3));
        assert!(err.expected.contains(&SmolStr::new("n")));
        assert!(!err.expected.contains(&SmolStr::new("+")));
    }

    #[test]
    fn empty_input_is_rejected_when_grammar_requires_content() {
        let grammar = sum_grammar();
        let table = build_table(&grammar).unwrap();
        let parser = Parser::new(&grammar, &table, terminal_of);
        let tokens = vec![Token::eof(Position::start())];
        assert!(parser.parse(&tokens).is_err());
    }
}
