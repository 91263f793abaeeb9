//! Shift/reduce/goto tables and their persistence.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use thiserror::Error;
use tracing::debug;

use crate::automata::CACHE_VERSION;

use super::rules::{Grammar, SymbolId};

/// Errors raised while building, persisting, or reloading a table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error(
        "LR conflict in state {state} on lookahead '{lookahead}': {existing} vs {incoming}"
    )]
    Conflict {
        state: usize,
        lookahead: SmolStr,
        existing: String,
        incoming: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cache version {found} does not match expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("cached table shape mismatch for grammar '{grammar}': {detail}")]
    ShapeMismatch { grammar: SmolStr, detail: String },
}

/// A parse action for one `(state, terminal)` pair. Absence of an
/// entry is the error action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
}

/// The LR(1) parse table: per-state action rows keyed by terminal
/// spelling and goto rows keyed by nonterminal spelling.
///
/// Rows are `IndexMap`s filled in a deterministic order, so the same
/// grammar always persists to byte-identical JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseTable {
    version: u32,
    grammar: SmolStr,
    terminals: Vec<SmolStr>,
    actions: Vec<IndexMap<SmolStr, Action>>,
    gotos: Vec<IndexMap<SmolStr, usize>>,
}

impl ParseTable {
    pub(crate) fn with_shape(grammar: SmolStr, terminals: Vec<SmolStr>) -> Self {
        Self {
            version: CACHE_VERSION,
            grammar,
            terminals,
            actions: Vec::new(),
            gotos: Vec::new(),
        }
    }

    pub(crate) fn push_state(&mut self) {
        self.actions.push(IndexMap::new());
        self.gotos.push(IndexMap::new());
    }

    pub(crate) fn set_action<V>(
        &mut self,
        grammar: &Grammar<V>,
        state: usize,
        terminal: SymbolId,
        action: Action,
        reducing: Option<usize>,
    ) -> Result<(), TableError> {
        let name = grammar.symbol_name(terminal).clone();
        if let Some(existing) = self.actions[state].get(&name) {
            if *existing != action {
                return Err(TableError::Conflict {
                    state,
                    lookahead: name,
                    existing: describe(grammar, *existing),
                    incoming: match reducing {
                        Some(p) => format!("reduce {}", grammar.production_text(p)),
                        None => describe(grammar, action),
                    },
                });
            }
            return Ok(());
        }
        self.actions[state].insert(name, action);
        Ok(())
    }

    pub(crate) fn set_goto<V>(
        &mut self,
        grammar: &Grammar<V>,
        state: usize,
        nonterminal: SymbolId,
        target: usize,
    ) {
        self.gotos[state].insert(grammar.symbol_name(nonterminal).clone(), target);
    }

    pub fn state_count(&self) -> usize {
        self.actions.len()
    }

    pub fn grammar_name(&self) -> &SmolStr {
        &self.grammar
    }

    pub fn action(&self, state: usize, terminal: &str) -> Option<Action> {
        self.actions.get(state)?.get(terminal).copied()
    }

    pub fn goto(&self, state: usize, nonterminal: &str) -> Option<usize> {
        self.gotos.get(state)?.get(nonterminal).copied()
    }

    /// Terminals that have any action in `state`, for syntax errors.
    pub fn expected_terminals(&self, state: usize) -> Vec<SmolStr> {
        match self.actions.get(state) {
            Some(row) => row.keys().cloned().collect(),
            None => Vec::new(),
        }
    }

    /// Re-validate a loaded table against the grammar it will drive:
    /// version tag and terminal inventory must match. A mismatch means
    /// the cache predates a grammar change and must be rebuilt.
    pub fn validate<V>(&self, grammar: &Grammar<V>) -> Result<(), TableError> {
        if self.version != CACHE_VERSION {
            return Err(TableError::VersionMismatch {
                found: self.version,
                expected: CACHE_VERSION,
            });
        }
        let expected = grammar.terminal_names();
        if self.terminals != expected {
            return Err(TableError::ShapeMismatch {
                grammar: self.grammar.clone(),
                detail: format!(
                    "{} cached terminals, grammar has {}",
                    self.terminals.len(),
                    expected.len()
                ),
            });
        }
        if self.actions.is_empty() {
            return Err(TableError::ShapeMismatch {
                grammar: self.grammar.clone(),
                detail: "cached table has no states".to_string(),
            });
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), TableError> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        debug!(grammar = self.grammar.as_str(), states = self.state_count(), "table persisted");
        Ok(())
    }

    pub fn load_from(path: &Path) -> Result<Self, TableError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

fn describe<V>(grammar: &Grammar<V>, action: Action) -> String {
    match action {
        Action::Shift(state) => format!("shift to state {state}"),
        Action::Reduce(production) => {
            format!("reduce {}", grammar.production_text(production))
        }
        Action::Accept => "accept".to_string(),
    }
}
