//! Pass 1: type collection.
//!
//! Registers every declared class and protocol name on top of the
//! predefined bootstrap, without resolving parents or members yet.
//! Duplicates are errors.

use crate::syntax::Ast;

use super::context::Context;
use super::error::SemanticError;

pub(super) fn collect(ast: &Ast, errors: &mut Vec<SemanticError>) -> Context {
    let mut context = Context::bootstrap();

    let Ast::Program { types, .. } = ast else {
        return context;
    };

    for declaration in types {
        match declaration {
            Ast::ClassDeclaration { class_type, .. } => {
                let name = match class_type.as_ref() {
                    Ast::ClassType { name } | Ast::ClassTypeParameter { name, .. } => name,
                    _ => continue,
                };
                if let Err(error) = context.create_type(name) {
                    errors.push(error);
                }
            }
            Ast::ProtocolDeclaration { protocol_type, .. } => {
                let Ast::ProtocolType { name } = protocol_type.as_ref() else {
                    continue;
                };
                if let Err(error) = context.create_protocol(name) {
                    errors.push(error);
                }
            }
            _ => {}
        }
    }

    context
}
