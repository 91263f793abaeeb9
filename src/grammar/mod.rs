//! Grammar model and LR(1) table generation.
//!
//! A [`Grammar`] registers terminals, nonterminals, and productions;
//! each production carries a semantic builder applied at reduction
//! time. [`build_table`] runs the canonical LR(1) construction and
//! produces a [`ParseTable`] that persists to the cache and drives the
//! shift-reduce loop in [`crate::parser`].

mod first;
mod lr1;
mod rules;
mod table;

pub use lr1::build_table;
pub use rules::{EOF_NAME, Grammar, Production, SymbolId};
pub use table::{Action, ParseTable, TableError};
