//! Tagged-DFA construction and the maximal-munch loop.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use thiserror::Error;
use tracing::debug;

use crate::automata::{Automaton, AutomatonError, AutomatonRecord, CACHE_VERSION};
use crate::base::Position;
use crate::regex::{RegexCompiler, RegexError};

use super::token::{Token, TokenKind};

/// One token rule. Earlier rules win when several accept the same
/// lexeme (keywords are listed before identifiers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexerRule {
    pub name: SmolStr,
    pub kind: TokenKind,
    pub pattern: String,
    pub skip: bool,
}

impl LexerRule {
    pub fn new(name: &str, kind: TokenKind, pattern: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            kind,
            pattern: pattern.to_string(),
            skip: false,
        }
    }

    pub fn skip(name: &str, pattern: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            kind: TokenKind::Symbol,
            pattern: pattern.to_string(),
            skip: true,
        }
    }
}

/// Errors raised while building a lexer or scanning input.
#[derive(Debug, Error)]
pub enum LexError {
    #[error("rule '{rule}': {source}")]
    Rule {
        rule: SmolStr,
        source: RegexError,
    },

    #[error("{0}")]
    Automaton(#[from] AutomatonError),

    #[error("Lexical error at {position}: unrecognized character '{found}'")]
    Unrecognized { found: char, position: Position },
}

/// A built lexer: the determinized automaton plus, per DFA state, the
/// winning rule for accepting states.
#[derive(Debug, Clone)]
pub struct Lexer {
    dfa: Automaton,
    tags: Vec<Option<usize>>,
    rules: Vec<LexerRule>,
}

/// Build a lexer from `rules`, compiling each pattern with `regex`.
pub fn build_lexer(regex: &RegexCompiler, rules: Vec<LexerRule>) -> Result<Lexer, LexError> {
    // Combined NFA: fresh initial state with ε-edges into each rule's
    // automaton; rule tags recorded per absorbed final state.
    let mut combined = Automaton::new();
    let mut nfa_tags: Vec<(usize, usize)> = Vec::new();

    for (rule_index, rule) in rules.iter().enumerate() {
        let automaton = regex.compile(&rule.pattern).map_err(|source| LexError::Rule {
            rule: rule.name.clone(),
            source,
        })?;
        let finals = automaton.final_states();
        let offset = combined.union_offset(automaton);
        for state in finals {
            nfa_tags.push((state + offset, rule_index));
        }
    }

    let (dfa, subsets) = combined.determinize_with_subsets();

    // An accepting DFA state reports the highest-priority (smallest
    // index) rule among the NFA finals in its subset.
    let tags = subsets
        .iter()
        .map(|subset| {
            nfa_tags
                .iter()
                .filter(|(state, _)| subset.binary_search(state).is_ok())
                .map(|&(_, rule)| rule)
                .min()
        })
        .collect();

    debug!(
        rules = rules.len(),
        dfa_states = dfa.states().len(),
        "lexer DFA built"
    );

    Ok(Lexer { dfa, tags, rules })
}

impl Lexer {
    /// Tokenize `source`. Maximal munch: at each position consume
    /// greedily, remembering the latest accepting position; on a dead
    /// end emit the remembered token and resume after it.
    pub fn run(&self, source: &str) -> Result<Vec<Token>, LexError> {
        let chars: Vec<char> = source.chars().collect();
        let positions = positions_of(&chars);
        let mut tokens = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let mut state = self.dfa.initial();
            let mut end = start;
            let mut accepted: Option<(usize, usize)> = None;

            if self.dfa.state(state).finished {
                if let Some(rule) = self.tags[state] {
                    accepted = Some((start, rule));
                }
            }

            while end < chars.len() {
                let Some(next) = self.dfa.state(state).go_to(chars[end]) else {
                    break;
                };
                state = next;
                end += 1;
                if self.dfa.state(state).finished {
                    if let Some(rule) = self.tags[state] {
                        accepted = Some((end, rule));
                    }
                }
            }

            let Some((stop, rule_index)) = accepted else {
                return Err(LexError::Unrecognized {
                    found: chars[start],
                    position: positions[start],
                });
            };

            // A rule that accepted the empty string would not advance;
            // treat that as an unrecognized character.
            if stop == start {
                return Err(LexError::Unrecognized {
                    found: chars[start],
                    position: positions[start],
                });
            }

            let rule = &self.rules[rule_index];
            if !rule.skip {
                let value: String = chars[start..stop].iter().collect();
                tokens.push(Token::new(rule.kind, value, positions[start]));
            }
            start = stop;
        }

        tokens.push(Token::eof(positions[chars.len()]));
        Ok(tokens)
    }

    pub fn rules(&self) -> &[LexerRule] {
        &self.rules
    }

    pub fn to_record(&self) -> LexerRecord {
        LexerRecord {
            version: CACHE_VERSION,
            automaton: self.dfa.to_record(),
            tags: self.tags.clone(),
            rules: self.rules.clone(),
        }
    }

    pub fn from_record(record: &LexerRecord) -> Result<Self, LexError> {
        if record.version != CACHE_VERSION {
            return Err(AutomatonError::VersionMismatch {
                found: record.version,
                expected: CACHE_VERSION,
            }
            .into());
        }
        Ok(Self {
            dfa: Automaton::from_record(&record.automaton)?,
            tags: record.tags.clone(),
            rules: record.rules.clone(),
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), LexError> {
        let json =
            serde_json::to_string(&self.to_record()).map_err(AutomatonError::from)?;
        fs::write(path, json).map_err(AutomatonError::from)?;
        Ok(())
    }

    pub fn load_from(path: &Path) -> Result<Self, LexError> {
        let json = fs::read_to_string(path).map_err(AutomatonError::from)?;
        let record: LexerRecord =
            serde_json::from_str(&json).map_err(AutomatonError::from)?;
        Self::from_record(&record)
    }
}

/// A persisted lexer: DFA record plus rule tags and rule metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexerRecord {
    pub version: u32,
    pub automaton: AutomatonRecord,
    pub tags: Vec<Option<usize>>,
    pub rules: Vec<LexerRule>,
}

/// Position of every character, plus the position one past the input.
fn positions_of(chars: &[char]) -> Vec<Position> {
    let mut positions = Vec::with_capacity(chars.len() + 1);
    let mut line = 1;
    let mut column = 1;
    for &symbol in chars {
        positions.push(Position::new(line, column));
        if symbol == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    positions.push(Position::new(line, column));
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_lexer() -> Lexer {
        let regex = RegexCompiler::new().expect("regex grammar builds");
        build_lexer(
            &regex,
            vec![
                LexerRule::skip("whitespace", "[ \\t\\n]+"),
                LexerRule::new("keyword_let", TokenKind::Symbol, "let"),
                LexerRule::new("number", TokenKind::Number, "[0-9]+"),
                LexerRule::new("identifier", TokenKind::Identifier, "[a-z][a-z0-9]*"),
                LexerRule::new("plus", TokenKind::Symbol, "\\+"),
            ],
        )
        .expect("lexer builds")
    }

    #[test]
    fn keywords_beat_identifiers_and_munch_is_maximal() {
        let tokens = tiny_lexer().run("let lettuce 12+3").unwrap();
        let spellings: Vec<(&str, TokenKind)> = tokens
            .iter()
            .map(|t| (t.value.as_str(), t.kind))
            .collect();
        assert_eq!(
            spellings,
            vec![
                ("let", TokenKind::Symbol),
                ("lettuce", TokenKind::Identifier),
                ("12", TokenKind::Number),
                ("+", TokenKind::Symbol),
                ("3", TokenKind::Number),
                ("", TokenKind::Eof),
            ]
        );
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let tokens = tiny_lexer().run("let\n  x").unwrap();
        assert_eq!(tokens[0].position, Position::new(1, 1));
        assert_eq!(tokens[1].position, Position::new(2, 3));
        assert_eq!(tokens[2].position, Position::new(2, 4));
    }

    #[test]
    fn unrecognized_character_is_a_lexical_error() {
        let err = tiny_lexer().run("let ~ x").unwrap_err();
        match err {
            LexError::Unrecognized { found, position } => {
                assert_eq!(found, '~');
                assert_eq!(position, Position::new(1, 5));
            }
            other => panic!("expected lexical error, got {other}"),
        }
    }

    #[test]
    fn record_round_trip_preserves_tokenization() {
        let lexer = tiny_lexer();
        let reloaded = Lexer::from_record(&lexer.to_record()).unwrap();
        let source = "let abc 42 + 7";
        assert_eq!(lexer.run(source).unwrap(), reloaded.run(source).unwrap());
    }
}
