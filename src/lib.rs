//! # ember-lang
//!
//! Front-end for the Ember language: automata-based lexing, LR(1)
//! parsing, AST construction, and semantic analysis with graph type
//! inference.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! pipeline  → build()/compile_source() front door, cache handling
//!   ↓
//! semantic  → context, scopes, constraint graph, three-pass analyzer
//!   ↓
//! syntax    → Ember token rules, grammar, AST, source printer
//!   ↓
//! parser    → table-driven shift-reduce driver, derivation trees
//!   ↓
//! grammar   → grammar model, FIRST/FOLLOW, LR(1) generator, tables
//!   ↓
//! lexer     → rule sets, tagged DFA, maximal munch
//!   ↓
//! regex     → regex AST, regex grammar, lowering to automata
//!   ↓
//! automata  → ε-NFA engine, subset construction, persistence
//!   ↓
//! base      → Position/Span primitives
//! ```

// ============================================================================
// MODULES (dependency order: base → automata → regex → lexer → grammar →
// parser → syntax → semantic → pipeline)
// ============================================================================

/// Foundation types: Position, Span
pub mod base;

/// Finite automata: ε-NFA construction, determinization, persistence
pub mod automata;

/// Regex front-end: pattern scanning, regex grammar, lowering
pub mod regex;

/// Lexer generator and maximal-munch runtime
pub mod lexer;

/// Grammar model and LR(1) table generation
pub mod grammar;

/// Table-driven shift-reduce parser
pub mod parser;

/// The Ember language: token rules, grammar, AST
pub mod syntax;

/// Semantic analysis: context, scopes, graph type inference
pub mod semantic;

/// Build/compile entry points and cache handling
pub mod pipeline;

// Re-export commonly needed items
pub use base::{Position, Span};
pub use pipeline::{CacheConfig, CompileOutcome, Stage, build, compile_source};
