//! The semantic context: every type, protocol, and free function known
//! to a compilation, plus conformance and lowest-common-ancestor
//! queries over the combined hierarchy.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::Position;
use crate::lexer::Token;

use super::error::SemanticError;
use super::types::{
    Attribute, Class, ERROR, Method, OBJECT, Protocol, TypeName, is_vector, predefined_classes,
    predefined_methods, predefined_protocols, vector_methods, vector_of,
};

/// Registries are `IndexMap`s: passes iterate them in declaration
/// order, which keeps error order and inference order stable.
#[derive(Debug, Default)]
pub struct Context {
    pub types: IndexMap<SmolStr, Class>,
    pub protocols: IndexMap<SmolStr, Protocol>,
    pub methods: IndexMap<SmolStr, Method>,
}

impl Context {
    /// A context pre-loaded with the predefined snapshot.
    pub fn bootstrap() -> Self {
        let mut context = Context::default();
        for class in predefined_classes() {
            context.types.insert(class.name.clone(), class);
        }
        for protocol in predefined_protocols() {
            context.protocols.insert(protocol.name.clone(), protocol);
        }
        for method in predefined_methods() {
            context.methods.insert(method.name.clone(), method);
        }
        context
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    pub fn create_type(&mut self, name: &Token) -> Result<(), SemanticError> {
        if self.types.contains_key(name.value.as_str()) {
            return Err(SemanticError::DuplicateType {
                name: name.value.clone(),
                position: name.position,
            });
        }
        self.types
            .insert(name.value.clone(), Class::new(&name.value));
        Ok(())
    }

    pub fn create_protocol(&mut self, name: &Token) -> Result<(), SemanticError> {
        if self.protocols.contains_key(name.value.as_str()) {
            return Err(SemanticError::DuplicateProtocol {
                name: name.value.clone(),
                position: name.position,
            });
        }
        self.protocols
            .insert(name.value.clone(), Protocol::new(&name.value));
        Ok(())
    }

    pub fn create_method(
        &mut self,
        name: &Token,
        parameters: Vec<Attribute>,
        return_type: Option<TypeName>,
    ) -> Result<(), SemanticError> {
        if self.methods.contains_key(name.value.as_str()) {
            return Err(SemanticError::DuplicateFunction {
                name: name.value.clone(),
                position: name.position,
            });
        }
        self.methods.insert(
            name.value.clone(),
            Method {
                name: name.value.clone(),
                return_type,
                parameters,
            },
        );
        Ok(())
    }

    /// Register the vector type over `element`, with its fixed method
    /// set, if it is not present yet.
    pub fn materialize_vector(&mut self, element: &str) -> TypeName {
        let name = vector_of(element);
        if !self.types.contains_key(name.as_str()) {
            let mut class = Class::with_parent(&name, OBJECT);
            class.methods = vector_methods(element);
            self.types.insert(name.clone(), class);
        }
        name
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Whether `name` is a known class or protocol.
    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains_key(name) || self.protocols.contains_key(name)
    }

    /// Existence check that reports an error at the naming token.
    pub fn require_type(&self, name: &Token) -> Result<(), SemanticError> {
        if self.has_type(name.value.as_str()) {
            Ok(())
        } else {
            Err(SemanticError::UndefinedType {
                name: name.value.clone(),
                position: name.position,
            })
        }
    }

    pub fn class(&self, name: &str) -> Option<&Class> {
        self.types.get(name)
    }

    pub fn class_mut(&mut self, name: &str) -> Option<&mut Class> {
        self.types.get_mut(name)
    }

    pub fn protocol(&self, name: &str) -> Option<&Protocol> {
        self.protocols.get(name)
    }

    /// Upper bound for parent-chain walks: a well-formed chain never
    /// revisits a type, so walks longer than the registry are cycles
    /// that slipped past the start-anchored detection.
    fn chain_budget(&self) -> usize {
        self.types.len() + self.protocols.len() + 1
    }

    /// Look up a method on a class or protocol, walking the parent
    /// chain.
    pub fn method_of(&self, type_name: &str, method: &str) -> Option<&Method> {
        let mut current = type_name;
        for _ in 0..self.chain_budget() {
            if let Some(class) = self.types.get(current) {
                if let Some(found) = class.method(method) {
                    return Some(found);
                }
                match &class.parent {
                    Some(parent) => current = parent.as_str(),
                    None => return None,
                }
            } else if let Some(protocol) = self.protocols.get(current) {
                if let Some(found) = protocol.method(method) {
                    return Some(found);
                }
                match &protocol.parent {
                    Some(parent) => current = parent.as_str(),
                    None => return None,
                }
            } else {
                return None;
            }
        }
        None
    }

    /// Method lookup that reports an error naming the owner type.
    pub fn require_method(
        &self,
        type_name: &str,
        method: &str,
        position: Position,
    ) -> Result<&Method, SemanticError> {
        self.method_of(type_name, method)
            .ok_or_else(|| SemanticError::UndefinedMethod {
                name: SmolStr::new(method),
                owner: SmolStr::new(type_name),
                position,
            })
    }

    /// The closest ancestor of `name` (starting at its parent) that
    /// declares `method`; `name` itself when no ancestor does. This is
    /// what a method body's `base` refers to.
    pub fn ancestor_with_method(&self, name: &str, method: &str) -> TypeName {
        let mut current = self.class(name).and_then(|c| c.parent.clone());
        for _ in 0..self.chain_budget() {
            let Some(ancestor) = current else {
                break;
            };
            if let Some(class) = self.class(&ancestor) {
                if class.method(method).is_some() {
                    return ancestor;
                }
                current = class.parent.clone();
            } else {
                break;
            }
        }
        SmolStr::new(name)
    }

    // ------------------------------------------------------------------
    // Conformance and LCA
    // ------------------------------------------------------------------

    /// `a` conforms to `b` iff they are equal, `a`'s parent chain
    /// reaches `b`, or `b` is a protocol some type on that chain
    /// implements (protocol extension included).
    pub fn conforms(&self, a: &str, b: &str) -> bool {
        if a == b || b == OBJECT {
            return true;
        }
        let mut current = a;
        for _ in 0..self.chain_budget() {
            if current == b {
                return true;
            }
            if let Some(class) = self.types.get(current) {
                for protocol in &class.protocols {
                    if protocol == b || self.protocol_extends(protocol, b) {
                        return true;
                    }
                }
                match &class.parent {
                    Some(parent) => current = parent.as_str(),
                    None => return false,
                }
            } else if let Some(protocol) = self.protocols.get(current) {
                match &protocol.parent {
                    Some(parent) => current = parent.as_str(),
                    None => return false,
                }
            } else {
                return false;
            }
        }
        false
    }

    fn protocol_extends(&self, child: &str, ancestor: &str) -> bool {
        let mut current = child;
        for _ in 0..self.chain_budget() {
            if current == ancestor {
                return true;
            }
            match self.protocols.get(current).and_then(|p| p.parent.as_ref()) {
                Some(parent) => current = parent.as_str(),
                None => return false,
            }
        }
        false
    }

    /// Lowest common ancestor along the combined hierarchy. `Error`
    /// absorbs; a protocol and a class implementing it meet at the
    /// protocol; everything bottoms out at `Object`.
    pub fn lca(&self, a: &str, b: &str) -> TypeName {
        if a == ERROR || b == ERROR {
            return SmolStr::new(ERROR);
        }
        if a == b {
            return SmolStr::new(a);
        }

        let mut current = SmolStr::new(a);
        for _ in 0..self.chain_budget() {
            if self.conforms(b, &current) {
                return current;
            }
            if let Some(class) = self.types.get(current.as_str()) {
                for protocol in &class.protocols {
                    if self.conforms(b, protocol) {
                        return protocol.clone();
                    }
                }
                match &class.parent {
                    Some(parent) => current = parent.clone(),
                    None => break,
                }
            } else if let Some(protocol) = self.protocols.get(current.as_str()) {
                match &protocol.parent {
                    Some(parent) => current = parent.clone(),
                    None => break,
                }
            } else {
                break;
            }
        }
        SmolStr::new(OBJECT)
    }

    /// Names of every non-vector user class, in declaration order.
    pub fn user_class_names(&self) -> Vec<SmolStr> {
        self.types
            .keys()
            .filter(|name| !is_vector(name))
            .cloned()
            .collect()
    }
}
