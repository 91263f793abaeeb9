//! Token type shared by the lexer, the parser driver, and the regex
//! front-end's hand scanner.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::base::Position;

/// Broad token categories. Keywords and punctuation are `Symbol`
/// tokens whose value is their spelling; the grammar keys on the
/// spelling directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Identifier,
    Number,
    String,
    Boolean,
    Symbol,
    Eof,
}

/// A token with its kind, text, and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: SmolStr,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<SmolStr>, position: Position) -> Self {
        Self {
            kind,
            value: value.into(),
            position,
        }
    }

    pub fn eof(position: Position) -> Self {
        Self::new(TokenKind::Eof, "", position)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::String => write!(f, "\"{}\"", self.value),
            _ => write!(f, "'{}'", self.value),
        }
    }
}
