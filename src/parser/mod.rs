//! Table-driven shift-reduce parser.
//!
//! The driver executes a [`crate::grammar::ParseTable`] over a token
//! stream, producing a [`Derivation`] tree that the owning grammar's
//! semantic builders fold into a semantic value (for Ember, the AST).

mod driver;

pub use driver::{Derivation, ParseError, Parser};
