//! Finite-automaton engine.
//!
//! Nondeterministic automata with ε-transitions and a distinguished
//! *complement* ("any other character") edge, combined Thompson-style
//! and determinized by subset construction. Both the lexer generator
//! and the regex front-end are built on this module.
//!
//! States live in an arena (`Vec<State>`) and refer to each other by
//! dense index, so the cyclic transition graph carries no ownership
//! cycles.

mod machine;
mod persist;
mod subset;

pub use machine::{Automaton, State, StateId};
pub use persist::{AutomatonError, AutomatonRecord, CACHE_VERSION, StateRecord};
