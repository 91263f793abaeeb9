//! Lexical scopes for the checking pass.
//!
//! Scopes form a tree stored in one arena (`Vec<Scope>` with parent
//! indices); lookups walk parents, definitions are local. Each scope
//! carries variables, functions, and type views: the per-type method
//! and attribute tables whose graph nodes inference resolves.

use smol_str::SmolStr;

use crate::base::Position;
use crate::lexer::Token;

use super::error::SemanticError;
use super::graph::NodeId;

/// Index of a scope within its tree.
pub type ScopeId = usize;

/// A variable bound to its graph node.
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: SmolStr,
    pub node: NodeId,
}

/// A function (free or method) bound to its return node and its
/// parameter nodes.
#[derive(Debug, Clone)]
pub struct FunctionSem {
    pub name: SmolStr,
    pub node: NodeId,
    pub args: Vec<NodeId>,
}

impl FunctionSem {
    /// Arity check at a call site.
    pub fn check_arity(&self, name: &Token, supplied: usize) -> Result<(), SemanticError> {
        if self.args.len() != supplied {
            return Err(SemanticError::ArityMismatch {
                name: name.value.clone(),
                position: name.position,
            });
        }
        Ok(())
    }
}

/// The checking pass's view of one type: its attribute and method
/// nodes plus the parent view's name.
#[derive(Debug, Clone)]
pub struct TypeView {
    pub name: SmolStr,
    pub functions: Vec<FunctionSem>,
    pub attributes: Vec<Variable>,
    pub parent: Option<SmolStr>,
}

#[derive(Debug, Default)]
struct Scope {
    parent: Option<ScopeId>,
    variables: Vec<Variable>,
    functions: Vec<FunctionSem>,
    types: Vec<TypeView>,
}

/// Arena of scopes; scope 0 is the root.
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    pub fn root(&self) -> ScopeId {
        0
    }

    pub fn child(&mut self, parent: ScopeId) -> ScopeId {
        self.scopes.push(Scope {
            parent: Some(parent),
            ..Scope::default()
        });
        self.scopes.len() - 1
    }

    // ------------------------------------------------------------------
    // Definitions (always local)
    // ------------------------------------------------------------------

    pub fn define_variable(&mut self, scope: ScopeId, name: &str, node: NodeId) {
        self.scopes[scope].variables.push(Variable {
            name: SmolStr::new(name),
            node,
        });
    }

    pub fn define_function(&mut self, scope: ScopeId, name: &str, node: NodeId, args: Vec<NodeId>) {
        self.scopes[scope].functions.push(FunctionSem {
            name: SmolStr::new(name),
            node,
            args,
        });
    }

    pub fn define_type(&mut self, scope: ScopeId, view: TypeView) {
        self.scopes[scope].types.push(view);
    }

    /// Wire a type view's parent after all views exist.
    pub fn set_type_parent(&mut self, scope: ScopeId, name: &str, parent: &str) {
        if let Some(view) = self.scopes[scope]
            .types
            .iter_mut()
            .find(|view| view.name == name)
        {
            view.parent = Some(SmolStr::new(parent));
        }
    }

    // ------------------------------------------------------------------
    // Lookups (walk parents)
    // ------------------------------------------------------------------

    pub fn variable(&self, scope: ScopeId, name: &Token) -> Result<NodeId, SemanticError> {
        let mut current = Some(scope);
        while let Some(id) = current {
            // Later definitions shadow earlier ones in the same scope.
            if let Some(found) = self.scopes[id]
                .variables
                .iter()
                .rev()
                .find(|v| v.name == name.value)
            {
                return Ok(found.node);
            }
            current = self.scopes[id].parent;
        }
        Err(SemanticError::UndefinedVariable {
            name: name.value.clone(),
            position: name.position,
        })
    }

    pub fn function(&self, scope: ScopeId, name: &Token) -> Result<&FunctionSem, SemanticError> {
        self.function_named(scope, &name.value)
            .ok_or_else(|| SemanticError::UndefinedFunction {
                name: name.value.clone(),
                position: name.position,
            })
    }

    pub fn function_named(&self, scope: ScopeId, name: &str) -> Option<&FunctionSem> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(found) = self.scopes[id]
                .functions
                .iter()
                .rev()
                .find(|f| f.name == name)
            {
                return Some(found);
            }
            current = self.scopes[id].parent;
        }
        None
    }

    pub fn type_view(&self, scope: ScopeId, name: &str) -> Option<&TypeView> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(found) = self.scopes[id].types.iter().find(|t| t.name == name) {
                return Some(found);
            }
            current = self.scopes[id].parent;
        }
        None
    }

    /// Upper bound for view-parent walks, mirroring the context's
    /// chain budget.
    fn view_budget(&self) -> usize {
        self.scopes.iter().map(|s| s.types.len()).sum::<usize>() + 1
    }

    /// A type's method node set, walking the view inheritance chain.
    pub fn type_function(
        &self,
        scope: ScopeId,
        type_name: &str,
        method: &str,
        position: Position,
    ) -> Result<&FunctionSem, SemanticError> {
        let mut current = SmolStr::new(type_name);
        for _ in 0..self.view_budget() {
            let Some(view) = self.type_view(scope, &current) else {
                return Err(SemanticError::UndefinedMethod {
                    name: SmolStr::new(method),
                    owner: SmolStr::new(type_name),
                    position,
                });
            };
            if let Some(found) = view.functions.iter().find(|f| f.name == method) {
                return Ok(found);
            }
            match &view.parent {
                Some(parent) => current = parent.clone(),
                None => break,
            }
        }
        Err(SemanticError::UndefinedMethod {
            name: SmolStr::new(method),
            owner: SmolStr::new(type_name),
            position,
        })
    }

    /// A type's attribute node, walking the view inheritance chain so
    /// inherited attributes stay accessible.
    pub fn type_attribute(
        &self,
        scope: ScopeId,
        type_name: &str,
        attribute: &Token,
    ) -> Result<NodeId, SemanticError> {
        let mut current = SmolStr::new(type_name);
        for _ in 0..self.view_budget() {
            let Some(view) = self.type_view(scope, &current) else {
                break;
            };
            if let Some(found) = view.attributes.iter().find(|a| a.name == attribute.value) {
                return Ok(found.node);
            }
            match &view.parent {
                Some(parent) => current = parent.clone(),
                None => break,
            }
        }
        Err(SemanticError::UndefinedAttribute {
            name: attribute.value.clone(),
            owner: SmolStr::new(type_name),
            position: attribute.position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;

    fn token(name: &str) -> Token {
        Token::new(TokenKind::Identifier, name, Position::new(2, 7))
    }

    #[test]
    fn lookup_walks_parent_scopes() {
        let mut scopes = ScopeTree::new();
        scopes.define_variable(scopes.root(), "x", 3);
        let inner = scopes.child(scopes.root());
        assert_eq!(scopes.variable(inner, &token("x")).unwrap(), 3);
    }

    #[test]
    fn inner_definitions_shadow_outer_ones() {
        let mut scopes = ScopeTree::new();
        scopes.define_variable(scopes.root(), "x", 1);
        let inner = scopes.child(scopes.root());
        scopes.define_variable(inner, "x", 2);
        assert_eq!(scopes.variable(inner, &token("x")).unwrap(), 2);
        assert_eq!(scopes.variable(scopes.root(), &token("x")).unwrap(), 1);
    }

    #[test]
    fn missing_variable_reports_its_position() {
        let scopes = ScopeTree::new();
        let err = scopes.variable(scopes.root(), &token("ghost")).unwrap_err();
        assert!(matches!(err, SemanticError::UndefinedVariable { position, .. }
            if position == Position::new(2, 7)));
    }

    #[test]
    fn type_functions_resolve_through_view_parents() {
        let mut scopes = ScopeTree::new();
        let root = scopes.root();
        scopes.define_type(
            root,
            TypeView {
                name: SmolStr::new("A"),
                functions: vec![FunctionSem {
                    name: SmolStr::new("hash"),
                    node: 10,
                    args: vec![],
                }],
                attributes: vec![],
                parent: None,
            },
        );
        scopes.define_type(
            root,
            TypeView {
                name: SmolStr::new("B"),
                functions: vec![],
                attributes: vec![],
                parent: Some(SmolStr::new("A")),
            },
        );
        let found = scopes
            .type_function(root, "B", "hash", Position::start())
            .unwrap();
        assert_eq!(found.node, 10);
    }
}
