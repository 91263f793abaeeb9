//! Semantic analysis.
//!
//! Three passes over the AST, each skipped when the previous one
//! reported errors:
//!
//! 1. **Collection** ([`collector`]): register class and protocol
//!    names on top of the predefined bootstrap context.
//! 2. **Building** ([`builder`]): resolve inheritance and signatures,
//!    check hierarchy health, assign protocol implementations,
//!    materialize vector types.
//! 3. **Checking** ([`checker`]): build the constraint graph over all
//!    expressions and run graph type inference.
//!
//! Errors accumulate in an explicit list threaded through the passes;
//! the result carries the populated [`Context`] and that list.

mod builder;
mod checker;
mod collector;
mod context;
mod error;
mod graph;
mod scope;
mod types;

pub use context::Context;
pub use error::{SemanticError, SemanticResult};
pub use graph::{NodeId, SemanticGraph};
pub use scope::{ScopeId, ScopeTree};
pub use types::{Attribute, Class, Method, Protocol, TypeName};
pub use types::{BOOLEAN, ERROR, NUMBER, OBJECT, STRING, VECTOR, vector_of};

use crate::syntax::Ast;

/// Run all three passes over `ast`.
pub fn analyze(ast: &Ast) -> SemanticResult {
    let mut errors = Vec::new();

    let mut context = collector::collect(ast, &mut errors);

    if errors.is_empty() {
        builder::build(ast, &mut context, &mut errors);
    }
    if errors.is_empty() {
        checker::check(ast, &mut context, &mut errors);
    }

    SemanticResult::new(context, errors)
}
