//! Source printer.
//!
//! Prints an AST back to parseable Ember source. Operator expressions
//! are fully parenthesized, so re-parsing the printed text yields an
//! equivalent tree regardless of the original spelling.

use std::fmt;

use super::ast::Ast;

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ast::Token(token) => write!(f, "{}", token.value),
            Ast::List(items) => join(f, items, " "),

            Ast::Program {
                types,
                functions,
                expression,
            } => {
                for declaration in types.iter().chain(functions) {
                    writeln!(f, "{declaration}")?;
                }
                write!(f, "{expression};")
            }

            Ast::FunctionDeclaration {
                name,
                parameters,
                return_type,
                body,
            } => {
                write!(f, "function {}(", name.value)?;
                join(f, parameters, ", ")?;
                write!(f, ")")?;
                annotation(f, return_type)?;
                write!(f, " => {body};")
            }
            Ast::ClassDeclaration {
                class_type,
                inheritance,
                body,
            } => {
                write!(f, "type {class_type}{inheritance} {{ ")?;
                join(f, body, " ")?;
                write!(f, " }}")
            }
            Ast::ProtocolDeclaration {
                protocol_type,
                extension,
                body,
            } => {
                write!(f, "protocol {protocol_type}{extension} {{ ")?;
                join(f, body, " ")?;
                write!(f, " }}")
            }

            Ast::ClassType { name } => write!(f, "{}", name.value),
            Ast::ClassTypeParameter { name, parameters } => {
                write!(f, "{}(", name.value)?;
                join(f, parameters, ", ")?;
                write!(f, ")")
            }
            Ast::Inheritance { name } => write!(f, " inherits {}", name.value),
            Ast::InheritanceParameter { name, arguments } => {
                write!(f, " inherits {}(", name.value)?;
                join(f, arguments, ", ")?;
                write!(f, ")")
            }
            Ast::ClassProperty {
                name,
                annotation: ann,
                expression,
            } => {
                write!(f, "{}", name.value)?;
                annotation(f, ann)?;
                write!(f, " = {expression};")
            }
            Ast::ClassFunction {
                name,
                parameters,
                return_type,
                body,
            } => {
                write!(f, "{}(", name.value)?;
                join(f, parameters, ", ")?;
                write!(f, ")")?;
                annotation(f, return_type)?;
                write!(f, " => {body};")
            }

            Ast::ProtocolType { name } => write!(f, "{}", name.value),
            Ast::Extension { name } => write!(f, " extends {}", name.value),
            Ast::ProtocolFunction {
                name,
                parameters,
                return_type,
            } => {
                write!(f, "{}(", name.value)?;
                join(f, parameters, ", ")?;
                write!(f, ") : {return_type};")
            }

            Ast::Parameter {
                name,
                annotation: ann,
            } => {
                write!(f, "{}", name.value)?;
                annotation(f, ann)
            }

            Ast::Atomic { name } => write!(f, "{}", name.value),
            Ast::Constant { value, .. } => write!(f, "{}", value.value),
            Ast::ExpressionBlock { instructions } => {
                write!(f, "{{ ")?;
                for instruction in instructions {
                    write!(f, "{instruction}; ")?;
                }
                write!(f, "}}")
            }
            Ast::If {
                condition,
                body,
                elifs,
                else_body,
            } => {
                write!(f, "if ({condition}) {body}")?;
                for elif in elifs {
                    write!(f, "{elif}")?;
                }
                write!(f, " else {else_body}")
            }
            Ast::Elif { condition, body } => write!(f, " elif ({condition}) {body}"),
            Ast::While { condition, body } => write!(f, "while ({condition}) {body}"),
            Ast::For {
                variable,
                iterable,
                body,
            } => write!(f, "for ({} in {iterable}) {body}", variable.value),
            Ast::Let { bindings, body } => {
                write!(f, "let ")?;
                join(f, bindings, ", ")?;
                write!(f, " in {body}")
            }
            Ast::Declaration {
                name,
                annotation: ann,
                value,
            } => {
                write!(f, "{}", name.value)?;
                annotation(f, ann)?;
                write!(f, " = {value}")
            }
            Ast::Assignment { name, value } => write!(f, "{} := {value}", name.value),

            Ast::ArithmeticBinary { op, left, right } => {
                write!(f, "({left} {} {right})", op.spelling())
            }
            Ast::ArithmeticUnary { op, child } => write!(f, "({}{child})", op.spelling()),
            Ast::BooleanBinary { op, left, right } => {
                write!(f, "({left} {} {right})", op.spelling())
            }
            Ast::BooleanUnary { op, child } => write!(f, "({}{child})", op.spelling()),
            Ast::StringBinary { op, left, right } => {
                write!(f, "({left} {} {right})", op.spelling())
            }

            Ast::New { name, arguments } => {
                write!(f, "new {}(", name.value)?;
                join(f, arguments, ", ")?;
                write!(f, ")")
            }
            Ast::Is { expression, target } => write!(f, "({expression} is {target})"),
            Ast::As { expression, target } => write!(f, "({expression} as {target})"),
            Ast::ExpressionCall { name, arguments } => {
                write!(f, "{}(", name.value)?;
                join(f, arguments, ", ")?;
                write!(f, ")")
            }
            Ast::InstanceProperty { receiver, property } => {
                write!(f, "{receiver}.{}", property.value)
            }
            Ast::AssignmentProperty {
                receiver,
                property,
                value,
            } => write!(f, "{receiver}.{} := {value}", property.value),
            Ast::InstanceFunction {
                receiver,
                name,
                arguments,
            } => {
                write!(f, "{receiver}.{}(", name.value)?;
                join(f, arguments, ", ")?;
                write!(f, ")")
            }

            Ast::ExplicitArrayDeclaration { values, .. } => {
                write!(f, "[")?;
                join(f, values, ", ")?;
                write!(f, "]")
            }
            Ast::ImplicitArrayDeclaration {
                item,
                iterable,
                expression,
            } => write!(f, "[{expression} || {} in {iterable}]", item.value),
            Ast::ArrayCall {
                expression,
                indexer,
            } => write!(f, "{expression}[{indexer}]"),
            Ast::AssignmentArray {
                expression,
                indexer,
                value,
            } => write!(f, "{expression}[{indexer}] := {value}"),

            Ast::Type { name } => write!(f, "{}", name.value),
            Ast::VectorType { name } => write!(f, "[{}]", name.value),
            Ast::NoInheritance | Ast::NoExtension | Ast::NoType => Ok(()),
        }
    }
}

fn join(f: &mut fmt::Formatter<'_>, items: &[Ast], separator: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{separator}")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Print `: T` for a present annotation, nothing for [`Ast::NoType`].
fn annotation(f: &mut fmt::Formatter<'_>, ann: &Ast) -> fmt::Result {
    match ann {
        Ast::NoType => Ok(()),
        other => write!(f, " : {other}"),
    }
}
