//! Pass 2: type building.
//!
//! Resolves inheritance and extension targets, attaches attribute and
//! method signatures, then runs the hierarchy health checks: circular
//! inheritance, protocol redeclaration, protocol implementation
//! assignment, and vector materialization.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::debug;

use crate::syntax::Ast;

use super::context::Context;
use super::error::SemanticError;
use super::types::{
    Attribute, BOOLEAN, Class, Method, NUMBER, OBJECT, Protocol, STRING, TypeName,
};

pub(super) fn build(ast: &Ast, context: &mut Context, errors: &mut Vec<SemanticError>) {
    let Ast::Program {
        types, functions, ..
    } = ast
    else {
        return;
    };

    for declaration in types {
        match declaration {
            Ast::ClassDeclaration { .. } => build_class(declaration, context, errors),
            Ast::ProtocolDeclaration { .. } => build_protocol(declaration, context, errors),
            _ => {}
        }
    }
    for declaration in functions {
        build_function(declaration, context, errors);
    }

    if check_circular_inheritance(context, errors) {
        check_extends(context, errors);
        implement_protocols(context);
        collect_vectors(context);
    }

    debug!(
        types = context.types.len(),
        protocols = context.protocols.len(),
        "type building finished"
    );
}

/// Resolve a type annotation AST to a type name. `NoType` means
/// "infer"; a vector annotation materializes its vector type.
pub(super) fn resolve_annotation(
    context: &mut Context,
    annotation: &Ast,
    errors: &mut Vec<SemanticError>,
) -> Option<TypeName> {
    match annotation {
        Ast::NoType => None,
        Ast::Type { name } => match context.require_type(name) {
            Ok(()) => Some(name.value.clone()),
            Err(error) => {
                errors.push(error);
                None
            }
        },
        Ast::VectorType { name } => match context.require_type(name) {
            Ok(()) => Some(context.materialize_vector(&name.value)),
            Err(error) => {
                errors.push(error);
                None
            }
        },
        _ => None,
    }
}

fn build_parameters(
    context: &mut Context,
    parameters: &[Ast],
    errors: &mut Vec<SemanticError>,
) -> Vec<Attribute> {
    parameters
        .iter()
        .map(|parameter| match parameter {
            Ast::Parameter { name, annotation } => Attribute::untyped(
                &name.value,
                resolve_annotation(context, annotation, errors),
            ),
            other => Attribute::untyped("", resolve_annotation(context, other, errors)),
        })
        .collect()
}

fn build_function(declaration: &Ast, context: &mut Context, errors: &mut Vec<SemanticError>) {
    let Ast::FunctionDeclaration {
        name,
        parameters,
        return_type,
        ..
    } = declaration
    else {
        return;
    };
    let parameters = build_parameters(context, parameters, errors);
    let return_type = resolve_annotation(context, return_type, errors);
    if let Err(error) = context.create_method(name, parameters, return_type) {
        errors.push(error);
    }
}

fn build_class(declaration: &Ast, context: &mut Context, errors: &mut Vec<SemanticError>) {
    let Ast::ClassDeclaration {
        class_type,
        inheritance,
        body,
    } = declaration
    else {
        return;
    };

    let (name, constructor_parameters) = match class_type.as_ref() {
        Ast::ClassType { name } => (name.value.clone(), Vec::new()),
        Ast::ClassTypeParameter { name, parameters } => (
            name.value.clone(),
            build_parameters(context, parameters, errors),
        ),
        _ => return,
    };

    let parent = resolve_inheritance(inheritance, context, errors);

    let mut attributes = Vec::new();
    let mut methods = vec![Method::untyped(
        "init",
        Some(name.clone()),
        constructor_parameters.clone(),
    )];
    for member in body {
        match member {
            Ast::ClassProperty {
                name: attr_name,
                annotation,
                ..
            } => {
                attributes.push(Attribute::untyped(
                    &attr_name.value,
                    resolve_annotation(context, annotation, errors),
                ));
            }
            Ast::ClassFunction {
                name: method_name,
                parameters,
                return_type,
                ..
            } => {
                let parameters = build_parameters(context, parameters, errors);
                let return_type = resolve_annotation(context, return_type, errors);
                methods.push(Method::untyped(&method_name.value, return_type, parameters));
            }
            _ => {}
        }
    }

    if let Some(class) = context.class_mut(&name) {
        class.parent = parent;
        class.parameters = constructor_parameters;
        class.attributes = attributes;
        class.methods = methods;
    }
}

/// A class's parent: `Object` when no clause is present; never one of
/// the sealed primitives.
fn resolve_inheritance(
    inheritance: &Ast,
    context: &mut Context,
    errors: &mut Vec<SemanticError>,
) -> Option<TypeName> {
    let name = match inheritance {
        Ast::NoInheritance => return Some(SmolStr::new(OBJECT)),
        Ast::Inheritance { name } | Ast::InheritanceParameter { name, .. } => name,
        _ => return Some(SmolStr::new(OBJECT)),
    };

    if [NUMBER, STRING, BOOLEAN].contains(&name.value.as_str()) {
        errors.push(SemanticError::ForbiddenInheritance {
            name: name.value.clone(),
            position: name.position,
        });
        return Some(SmolStr::new(OBJECT));
    }
    if context.class(&name.value).is_none() {
        errors.push(SemanticError::UndefinedType {
            name: name.value.clone(),
            position: name.position,
        });
        return Some(SmolStr::new(OBJECT));
    }
    Some(name.value.clone())
}

fn build_protocol(declaration: &Ast, context: &mut Context, errors: &mut Vec<SemanticError>) {
    let Ast::ProtocolDeclaration {
        protocol_type,
        extension,
        body,
    } = declaration
    else {
        return;
    };
    let Ast::ProtocolType { name } = protocol_type.as_ref() else {
        return;
    };
    let name = name.value.clone();

    let parent = match extension.as_ref() {
        Ast::Extension { name: target } => {
            if context.protocol(&target.value).is_some() {
                Some(target.value.clone())
            } else {
                errors.push(SemanticError::UndefinedType {
                    name: target.value.clone(),
                    position: target.position,
                });
                None
            }
        }
        _ => None,
    };

    let mut methods = Vec::new();
    for member in body {
        let Ast::ProtocolFunction {
            name: method_name,
            parameters,
            return_type,
        } = member
        else {
            continue;
        };
        let parameters = build_parameters(context, parameters, errors);
        let return_type = resolve_annotation(context, return_type, errors);
        methods.push(Method::untyped(&method_name.value, return_type, parameters));
    }

    if let Some(protocol) = context.protocols.get_mut(&name) {
        protocol.parent = parent;
        protocol.methods = methods;
    }
}

// ----------------------------------------------------------------------
// Hierarchy health checks
// ----------------------------------------------------------------------

/// Visited-marking parent walk over both hierarchies. A cycle is
/// detected when a walk returns to its starting name; each name is
/// walked at most once, so one cycle yields one error.
fn check_circular_inheritance(context: &Context, errors: &mut Vec<SemanticError>) -> bool {
    let mut ok = true;

    let mut visited: FxHashMap<SmolStr, bool> =
        context.types.keys().map(|k| (k.clone(), false)).collect();
    for start in context.types.keys() {
        let mut current = Some(start.clone());
        while let Some(name) = current {
            if *visited.get(&name).unwrap_or(&true) {
                break;
            }
            visited.insert(name.clone(), true);
            current = context.class(&name).and_then(|c| c.parent.clone());
            if current.as_ref() == Some(start) {
                errors.push(SemanticError::CircularInheritance {
                    name: start.clone(),
                });
                ok = false;
                break;
            }
        }
    }

    let mut visited: FxHashMap<SmolStr, bool> = context
        .protocols
        .keys()
        .map(|k| (k.clone(), false))
        .collect();
    for start in context.protocols.keys() {
        let mut current = Some(start.clone());
        while let Some(name) = current {
            if *visited.get(&name).unwrap_or(&true) {
                break;
            }
            visited.insert(name.clone(), true);
            current = context.protocol(&name).and_then(|p| p.parent.clone());
            if current.as_ref() == Some(start) {
                errors.push(SemanticError::CircularExtension {
                    name: start.clone(),
                });
                ok = false;
                break;
            }
        }
    }

    ok
}

/// A protocol may not redeclare a method its parent chain already has.
fn check_extends(context: &Context, errors: &mut Vec<SemanticError>) {
    for protocol in context.protocols.values() {
        let Some(parent) = &protocol.parent else {
            continue;
        };
        for method in &protocol.methods {
            if parent_chain_has_method(context, parent, &method.name) {
                errors.push(SemanticError::ProtocolRedeclaration {
                    name: protocol.name.clone(),
                    method: method.name.clone(),
                });
                break;
            }
        }
    }
}

fn parent_chain_has_method(context: &Context, protocol: &str, method: &str) -> bool {
    let mut current = context.protocol(protocol);
    while let Some(p) = current {
        if p.method(method).is_some() {
            return true;
        }
        current = p.parent.as_ref().and_then(|n| context.protocol(n));
    }
    false
}

/// Register every class that structurally satisfies a protocol as an
/// implementation of it.
fn implement_protocols(context: &mut Context) {
    let mut assignments: Vec<(SmolStr, SmolStr)> = Vec::new();
    for class in context.types.values() {
        for protocol in context.protocols.values() {
            if implements(context, class, protocol) {
                assignments.push((class.name.clone(), protocol.name.clone()));
            }
        }
    }
    for (class_name, protocol_name) in assignments {
        if let Some(class) = context.class_mut(&class_name) {
            class.protocols.push(protocol_name);
        }
    }
}

/// Structural satisfaction: every method of the protocol (its parent
/// chain included) has a counterpart on the class (inherited methods
/// included) with the same arity, parameters accepting the protocol's,
/// and a return type conforming to the protocol's.
fn implements(context: &Context, class: &Class, protocol: &Protocol) -> bool {
    let mut current = Some(protocol);
    while let Some(p) = current {
        for required in &p.methods {
            let Some(found) = context.method_of(&class.name, &required.name) else {
                return false;
            };
            if found.parameters.len() != required.parameters.len() {
                return false;
            }
            match (&found.return_type, &required.return_type) {
                (Some(have), Some(want)) if context.conforms(have, want) => {}
                _ => return false,
            }
            for (have, want) in found.parameters.iter().zip(&required.parameters) {
                match (&have.ty, &want.ty) {
                    (Some(have), Some(want)) if context.conforms(want, have) => {}
                    _ => return false,
                }
            }
        }
        current = p.parent.as_ref().and_then(|n| context.protocol(n));
    }
    true
}

/// Materialize `[T]` for every resolved class and protocol.
fn collect_vectors(context: &mut Context) {
    let mut names: Vec<SmolStr> = context.user_class_names();
    names.extend(context.protocols.keys().cloned());
    for name in names {
        context.materialize_vector(&name);
    }
}
