//! The Ember language definition.
//!
//! This module fixes the concrete language the generic machinery
//! compiles: the token rules ([`lexicon`]), the LR(1) grammar with its
//! AST-building semantic actions ([`rules`]), the AST itself ([`ast`]),
//! and a source printer used to round-trip programs.

pub mod ast;
mod lexicon;
mod print;
mod rules;

pub use ast::{ArithmeticOp, Ast, BooleanOp, ConstantKind, StringOp};
pub use lexicon::ember_rules;
pub use rules::{ember_grammar, ember_terminal_of};
