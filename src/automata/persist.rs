//! Automaton persistence.
//!
//! An automaton serializes to an ordered list of state records; record
//! `i` describes arena state `i`. Reloading reproduces `matches`
//! behavior exactly. Records carry a version tag; readers reject
//! mismatched versions so stale caches trigger a rebuild.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::machine::{Automaton, StateId};

/// Monotonic tag for every persisted artifact of this crate.
pub const CACHE_VERSION: u32 = 1;

/// Errors raised while persisting or reloading automata.
#[derive(Debug, Error)]
pub enum AutomatonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cache version {found} does not match expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("state record {record} references out-of-range state {target}")]
    InvalidStateIndex { record: usize, target: usize },
}

/// One serialized state. Transitions are kept as a sorted pair list so
/// repeated serializations of the same machine are byte-identical.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateRecord {
    pub transitions: Vec<(char, usize)>,
    pub epsilon: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default: Option<usize>,
    pub finished: bool,
}

/// A whole serialized automaton.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomatonRecord {
    pub version: u32,
    pub initial: usize,
    pub states: Vec<StateRecord>,
}

impl Automaton {
    pub fn to_record(&self) -> AutomatonRecord {
        let states = self
            .states()
            .iter()
            .map(|state| {
                let mut transitions: Vec<(char, usize)> = state
                    .transitions
                    .iter()
                    .map(|(&symbol, &target)| (symbol, target))
                    .collect();
                transitions.sort_unstable_by_key(|&(symbol, _)| symbol);
                StateRecord {
                    transitions,
                    epsilon: state.epsilon.clone(),
                    default: state.complement,
                    finished: state.finished,
                }
            })
            .collect();

        AutomatonRecord {
            version: CACHE_VERSION,
            initial: self.initial(),
            states,
        }
    }

    pub fn from_record(record: &AutomatonRecord) -> Result<Automaton, AutomatonError> {
        if record.version != CACHE_VERSION {
            return Err(AutomatonError::VersionMismatch {
                found: record.version,
                expected: CACHE_VERSION,
            });
        }

        let count = record.states.len();
        let check = |record_index: usize, target: StateId| {
            if target < count {
                Ok(target)
            } else {
                Err(AutomatonError::InvalidStateIndex {
                    record: record_index,
                    target,
                })
            }
        };

        let mut automaton = Automaton::empty();
        for _ in 0..count {
            automaton.add_state();
        }
        for (i, state) in record.states.iter().enumerate() {
            for &(symbol, target) in &state.transitions {
                automaton.add_transition(i, symbol, check(i, target)?);
            }
            for &target in &state.epsilon {
                automaton.add_epsilon(i, check(i, target)?);
            }
            if let Some(target) = state.default {
                automaton.add_complement(i, check(i, target)?);
            }
            if state.finished {
                automaton.mark_final(i);
            }
        }
        automaton.set_initial(check(0, record.initial)?);
        Ok(automaton)
    }

    /// Write this automaton as JSON at `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), AutomatonError> {
        let json = serde_json::to_string(&self.to_record())?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Reload an automaton previously written with [`Automaton::save_to`].
    pub fn load_from(path: &Path) -> Result<Automaton, AutomatonError> {
        let json = fs::read_to_string(path)?;
        let record: AutomatonRecord = serde_json::from_str(&json)?;
        Self::from_record(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_round_trip_preserves_matching() {
        let mut nfa = Automaton::literal("ab");
        nfa.union(Automaton::literal("cd"));
        nfa.closure();

        let reloaded = Automaton::from_record(&nfa.to_record()).unwrap();
        for input in ["", "ab", "cd", "abcd", "abc", "x"] {
            assert_eq!(nfa.matches(input), reloaded.matches(input), "on {input:?}");
        }
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let mut record = Automaton::literal("a").to_record();
        record.version = CACHE_VERSION + 1;
        assert!(matches!(
            Automaton::from_record(&record),
            Err(AutomatonError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn dangling_state_index_is_rejected() {
        let mut record = Automaton::literal("a").to_record();
        record.states[0].epsilon.push(99);
        assert!(matches!(
            Automaton::from_record(&record),
            Err(AutomatonError::InvalidStateIndex { .. })
        ));
    }
}
