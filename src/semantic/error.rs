//! Semantic error taxonomy.

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::Position;

use super::context::Context;

/// Everything the analyzer can complain about. Each variant carries
/// the position of the originating token where one exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    #[error("Type with the same name ({name}) already in context. Error at {position}")]
    DuplicateType { name: SmolStr, position: Position },

    #[error("Protocol with the same name ({name}) already in context. Error at {position}")]
    DuplicateProtocol { name: SmolStr, position: Position },

    #[error("Function with the same name ({name}) already in context. Error at {position}")]
    DuplicateFunction { name: SmolStr, position: Position },

    #[error("Type \"{name}\" is not defined. Error at {position}")]
    UndefinedType { name: SmolStr, position: Position },

    #[error("Variable {name} is not defined. Error at {position}")]
    UndefinedVariable { name: SmolStr, position: Position },

    #[error("Function {name} is not defined. Error at {position}")]
    UndefinedFunction { name: SmolStr, position: Position },

    #[error("Method \"{name}\" is not defined in {owner}. Error at {position}")]
    UndefinedMethod {
        name: SmolStr,
        owner: SmolStr,
        position: Position,
    },

    #[error("Attribute \"{name}\" is not defined in {owner}. Error at {position}")]
    UndefinedAttribute {
        name: SmolStr,
        owner: SmolStr,
        position: Position,
    },

    #[error("Circular inheritance detected in class {name}")]
    CircularInheritance { name: SmolStr },

    #[error("Circular inheritance detected in protocol {name}")]
    CircularExtension { name: SmolStr },

    #[error("Incorrect extends in protocol {name}: method \"{method}\" is already declared")]
    ProtocolRedeclaration { name: SmolStr, method: SmolStr },

    #[error("Inheriting from {name} is not allowed. Error at {position}")]
    ForbiddenInheritance { name: SmolStr, position: Position },

    #[error("Incorrect type declaration")]
    InconsistentInference,

    #[error("Incorrect overriding of method \"{method}\" in type {owner}")]
    OverrideMismatch { method: SmolStr, owner: SmolStr },

    #[error("Invalid amount of arguments while calling function \"{name}\". Error at {position}")]
    ArityMismatch { name: SmolStr, position: Position },
}

/// Outcome of semantic analysis: `ok` iff the error list is empty.
#[derive(Debug)]
pub struct SemanticResult {
    pub ok: bool,
    pub context: Context,
    pub errors: Vec<SemanticError>,
}

impl SemanticResult {
    pub fn new(context: Context, errors: Vec<SemanticError>) -> Self {
        Self {
            ok: errors.is_empty(),
            context,
            errors,
        }
    }
}
