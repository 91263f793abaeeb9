//! Pass 3: semantic check and graph type inference.
//!
//! Walks every expression, building the constraint graph, then runs
//! full inference, materializes inferred method signatures back into
//! the context, and checks overrides. Each visit either yields the
//! expression's graph node or records an error and substitutes a
//! fresh unknown node, so one failure never aborts the walk.

use smol_str::SmolStr;
use tracing::debug;

use crate::base::Position;
use crate::syntax::{Ast, ConstantKind};

use super::builder::resolve_annotation;
use super::context::Context;
use super::error::SemanticError;
use super::graph::{NodeId, SemanticGraph};
use super::scope::{FunctionSem, ScopeId, ScopeTree, TypeView, Variable};
use super::types::{Attribute, BOOLEAN, Method, NUMBER, OBJECT, STRING, TypeName, VECTOR};

pub(super) fn check(ast: &Ast, context: &mut Context, errors: &mut Vec<SemanticError>) {
    let mut checker = Checker {
        graph: SemanticGraph::new(),
        scopes: ScopeTree::new(),
        context,
        errors,
    };
    checker.run(ast);
}

struct Checker<'a> {
    graph: SemanticGraph,
    scopes: ScopeTree,
    context: &'a mut Context,
    errors: &'a mut Vec<SemanticError>,
}

impl Checker<'_> {
    fn run(&mut self, ast: &Ast) {
        let root = self.scopes.root();

        let pi = self.known(NUMBER);
        let e = self.known(NUMBER);
        self.scopes.define_variable(root, "PI", pi);
        self.scopes.define_variable(root, "E", e);

        self.add_context_types(root);
        self.add_context_functions(root);

        let Ast::Program {
            types,
            functions,
            expression,
        } = ast
        else {
            return;
        };

        for declaration in types {
            if let Ast::ClassDeclaration { .. } = declaration {
                self.visit_class(declaration, root);
            }
        }
        for declaration in functions {
            self.visit_function(declaration, root);
        }

        let program_node = self.graph.add_node(None);
        let expression_node = self.visit(expression, root);
        self.graph.add_edge(program_node, expression_node);

        if self.errors.is_empty() {
            match self.graph.infer(&mut *self.context) {
                Ok(()) => {
                    self.materialize_signatures(root);
                    self.check_overriding();
                }
                Err(error) => self.errors.push(error),
            }
        }

        debug!(nodes = self.graph.len(), "semantic graph inferred");
    }

    // ------------------------------------------------------------------
    // Context import: one graph node per declared slot
    // ------------------------------------------------------------------

    fn function_views(&mut self, methods: &[Method]) -> Vec<FunctionSem> {
        methods
            .iter()
            .map(|method| FunctionSem {
                name: method.name.clone(),
                node: self.graph.add_node(method.return_type.clone()),
                args: method
                    .parameters
                    .iter()
                    .map(|parameter| self.graph.add_node(parameter.ty.clone()))
                    .collect(),
            })
            .collect()
    }

    fn add_context_types(&mut self, root: ScopeId) {
        let classes: Vec<_> = self.context.types.values().cloned().collect();
        for class in &classes {
            let attributes = class
                .attributes
                .iter()
                .map(|attribute| Variable {
                    name: attribute.name.clone(),
                    node: self.graph.add_node(attribute.ty.clone()),
                })
                .collect();
            let functions = self.function_views(&class.methods);
            self.scopes.define_type(
                root,
                TypeView {
                    name: class.name.clone(),
                    functions,
                    attributes,
                    parent: None,
                },
            );
        }
        let protocols: Vec<_> = self.context.protocols.values().cloned().collect();
        for protocol in &protocols {
            let functions = self.function_views(&protocol.methods);
            self.scopes.define_type(
                root,
                TypeView {
                    name: protocol.name.clone(),
                    functions,
                    attributes: Vec::new(),
                    parent: None,
                },
            );
        }

        for class in &classes {
            if let Some(parent) = &class.parent {
                self.scopes.set_type_parent(root, &class.name, parent);
            }
        }
        for protocol in &protocols {
            if let Some(parent) = &protocol.parent {
                self.scopes.set_type_parent(root, &protocol.name, parent);
            }
        }
    }

    fn add_context_functions(&mut self, root: ScopeId) {
        let methods: Vec<_> = self.context.methods.values().cloned().collect();
        for method in methods {
            let node = self.graph.add_node(method.return_type.clone());
            let args = method
                .parameters
                .iter()
                .map(|parameter| self.graph.add_node(parameter.ty.clone()))
                .collect();
            self.scopes.define_function(root, &method.name, node, args);
        }
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn visit_function(&mut self, declaration: &Ast, root: ScopeId) {
        let Ast::FunctionDeclaration {
            name,
            parameters,
            body,
            ..
        } = declaration
        else {
            return;
        };
        let function = match self.scopes.function(root, name) {
            Ok(function) => function.clone(),
            Err(error) => {
                self.errors.push(error);
                return;
            }
        };
        let child = self.scopes.child(root);
        for (&arg, parameter) in function.args.iter().zip(parameters) {
            if let Ast::Parameter { name, .. } = parameter {
                self.scopes.define_variable(child, &name.value, arg);
            }
        }
        let body_node = self.visit(body, child);
        self.graph.add_edge(function.node, body_node);
    }

    fn visit_class(&mut self, declaration: &Ast, root: ScopeId) {
        let Ast::ClassDeclaration {
            class_type,
            inheritance,
            body,
        } = declaration
        else {
            return;
        };
        let (name, head_parameters) = match class_type.as_ref() {
            Ast::ClassType { name } => (name, None),
            Ast::ClassTypeParameter { name, parameters } => (name, Some(parameters)),
            _ => return,
        };
        let class_name = name.value.clone();

        let scope = self.scopes.child(root);
        let init_scope = self.scopes.child(scope);
        let self_node = self.known(&class_name);
        self.scopes.define_variable(scope, "self", self_node);

        let init = match self
            .scopes
            .type_function(root, &class_name, "init", name.position)
        {
            Ok(init) => init.clone(),
            Err(error) => {
                self.errors.push(error);
                return;
            }
        };

        if let Some(parameters) = head_parameters {
            for (&arg, parameter) in init.args.iter().zip(parameters) {
                if let Ast::Parameter { name, .. } = parameter {
                    self.scopes.define_variable(init_scope, &name.value, arg);
                }
            }
        }

        self.wire_parent_constructor(inheritance, init_scope);

        for member in body {
            match member {
                Ast::ClassFunction { .. } => self.visit_method(member, &class_name, scope),
                Ast::ClassProperty {
                    name: attribute,
                    expression,
                    ..
                } => {
                    let value_node = self.visit(expression, init_scope);
                    match self.scopes.type_attribute(scope, &class_name, attribute) {
                        Ok(attribute_node) => {
                            self.graph.add_edge(attribute_node, value_node);
                        }
                        Err(error) => self.errors.push(error),
                    }
                }
                _ => {}
            }
        }
    }

    /// An `inherits` clause with arguments feeds them into the parent
    /// constructor's parameter nodes; a bare clause still checks the
    /// parent constructor takes no arguments.
    fn wire_parent_constructor(&mut self, inheritance: &Ast, init_scope: ScopeId) {
        match inheritance {
            Ast::InheritanceParameter { name, arguments } => {
                match self
                    .scopes
                    .type_function(init_scope, &name.value, "init", name.position)
                {
                    Ok(parent_init) => {
                        let parent_init = parent_init.clone();
                        if let Err(error) = parent_init.check_arity(name, arguments.len()) {
                            self.errors.push(error);
                            return;
                        }
                        for (&formal, actual) in parent_init.args.iter().zip(arguments) {
                            let actual_node = self.visit(actual, init_scope);
                            self.graph.add_edge(formal, actual_node);
                        }
                    }
                    Err(error) => self.errors.push(error),
                }
            }
            Ast::Inheritance { name } => {
                match self
                    .scopes
                    .type_function(init_scope, &name.value, "init", name.position)
                {
                    Ok(parent_init) => {
                        if let Err(error) = parent_init.check_arity(name, 0) {
                            self.errors.push(error);
                        }
                    }
                    Err(error) => self.errors.push(error),
                }
            }
            _ => {}
        }
    }

    fn visit_method(&mut self, member: &Ast, type_name: &str, scope: ScopeId) {
        let Ast::ClassFunction {
            name,
            parameters,
            body,
            ..
        } = member
        else {
            return;
        };
        let function = match self
            .scopes
            .type_function(scope, type_name, &name.value, name.position)
        {
            Ok(function) => function.clone(),
            Err(error) => {
                self.errors.push(error);
                return;
            }
        };

        // `base` refers to the closest ancestor's version of this
        // method (the method itself at the top of the chain).
        let base_type = self.context.ancestor_with_method(type_name, &name.value);
        let base = match self
            .scopes
            .type_function(scope, &base_type, &name.value, name.position)
        {
            Ok(base) => base.clone(),
            Err(error) => {
                self.errors.push(error);
                return;
            }
        };

        let child = self.scopes.child(scope);
        self.scopes
            .define_function(child, "base", base.node, base.args);
        for (&arg, parameter) in function.args.iter().zip(parameters) {
            if let Ast::Parameter { name, .. } = parameter {
                self.scopes.define_variable(child, &name.value, arg);
            }
        }
        let body_node = self.visit(body, child);
        self.graph.add_edge(function.node, body_node);
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn known(&mut self, ty: &str) -> NodeId {
        self.graph.add_node(Some(SmolStr::new(ty)))
    }

    fn fail(&mut self, error: SemanticError) -> NodeId {
        self.errors.push(error);
        self.graph.add_node(None)
    }

    /// Pin `node` to `ty` by collecting a known child into it.
    fn pin(&mut self, node: NodeId, ty: &str) {
        let known = self.known(ty);
        self.graph.add_edge(node, known);
    }

    fn local_type(&mut self, node: NodeId) -> Result<TypeName, SemanticError> {
        self.graph.local_inference(node, &mut *self.context)
    }

    /// Resolve an `is`/`as` target to a type name, materializing the
    /// vector type for vector targets.
    fn target_type(&mut self, target: &Ast) -> Result<TypeName, SemanticError> {
        match target {
            Ast::Type { name } => {
                self.context.require_type(name)?;
                Ok(name.value.clone())
            }
            Ast::VectorType { name } => {
                self.context.require_type(name)?;
                Ok(self.context.materialize_vector(&name.value))
            }
            other => Err(SemanticError::UndefinedType {
                name: SmolStr::new("<type>"),
                position: other.position(),
            }),
        }
    }

    fn visit(&mut self, node: &Ast, scope: ScopeId) -> NodeId {
        match node {
            Ast::Atomic { name } => match self.scopes.variable(scope, name) {
                Ok(node) => node,
                Err(error) => self.fail(error),
            },

            Ast::Constant { kind, .. } => match kind {
                ConstantKind::Number => self.known(NUMBER),
                ConstantKind::String => self.known(STRING),
                ConstantKind::Boolean => self.known(BOOLEAN),
            },

            Ast::ExpressionBlock { instructions } => {
                let block = self.graph.add_node(None);
                let Some((last, rest)) = instructions.split_last() else {
                    return block;
                };
                for instruction in rest {
                    self.visit(instruction, scope);
                }
                let last_node = self.visit(last, scope);
                self.graph.add_edge(block, last_node)
            }

            Ast::If {
                condition,
                body,
                elifs,
                else_body,
            } => {
                let if_node = self.graph.add_node(None);
                let condition_node = self.visit(condition, scope);
                self.pin(condition_node, BOOLEAN);

                let then_node = self.graph.add_node(None);
                let body_node = self.visit(body, scope);
                self.graph.add_edge(then_node, body_node);
                self.graph.add_edge(if_node, then_node);

                for elif in elifs {
                    let elif_node = self.visit(elif, scope);
                    self.graph.add_edge(if_node, elif_node);
                }

                let else_node = self.graph.add_node(None);
                let else_value = self.visit(else_body, scope);
                self.graph.add_edge(else_node, else_value);
                self.graph.add_edge(if_node, else_node)
            }

            Ast::Elif { condition, body } => {
                let elif_node = self.graph.add_node(None);
                let condition_node = self.visit(condition, scope);
                self.pin(condition_node, BOOLEAN);
                let body_node = self.visit(body, scope);
                self.graph.add_edge(elif_node, body_node)
            }

            Ast::While { condition, body } => {
                let while_node = self.graph.add_node(None);
                let condition_node = self.visit(condition, scope);
                self.pin(condition_node, BOOLEAN);
                let body_node = self.visit(body, scope);
                self.graph.add_edge(while_node, body_node)
            }

            Ast::For {
                variable,
                iterable,
                body,
            } => {
                let for_node = self.graph.add_node(None);
                let iterable_node = self.visit(iterable, scope);
                let iterable_ty = match self.local_type(iterable_node) {
                    Ok(ty) => ty,
                    Err(error) => return self.fail(error),
                };
                let current = match self
                    .context
                    .require_method(&iterable_ty, "current", variable.position)
                {
                    Ok(method) => method.return_type.clone(),
                    Err(error) => return self.fail(error),
                };
                let variable_node = self.graph.add_node(current);
                let child = self.scopes.child(scope);
                self.scopes
                    .define_variable(child, &variable.value, variable_node);
                let body_node = self.visit(body, child);
                self.graph.add_edge(for_node, body_node)
            }

            Ast::Let { bindings, body } => {
                let let_node = self.graph.add_node(None);
                let mut current = self.scopes.child(scope);
                for binding in bindings {
                    self.visit(binding, current);
                    current = self.scopes.child(current);
                }
                let body_node = self.visit(body, current);
                self.graph.add_edge(let_node, body_node)
            }

            Ast::Declaration {
                name,
                annotation,
                value,
            } => {
                let value_node = self.visit(value, scope);
                let ty = resolve_annotation(&mut *self.context, annotation, &mut *self.errors);
                let variable_node = self.graph.add_node(ty);
                self.scopes.define_variable(scope, &name.value, variable_node);
                self.graph.add_edge(variable_node, value_node);
                variable_node
            }

            Ast::Assignment { name, value } => {
                let variable_node = match self.scopes.variable(scope, name) {
                    Ok(node) => node,
                    Err(error) => return self.fail(error),
                };
                let value_node = self.visit(value, scope);
                self.graph.add_edge(variable_node, value_node);
                value_node
            }

            Ast::ArithmeticBinary { left, right, .. } => {
                let result = self.known(NUMBER);
                let left_node = self.visit(left, scope);
                self.pin(left_node, NUMBER);
                let right_node = self.visit(right, scope);
                self.pin(right_node, NUMBER);
                result
            }

            Ast::ArithmeticUnary { child, .. } => {
                let child_node = self.visit(child, scope);
                self.pin(child_node, NUMBER);
                child_node
            }

            Ast::BooleanBinary { op, left, right } => {
                let result = self.known(BOOLEAN);
                let operand = if op.is_connective() { BOOLEAN } else { NUMBER };
                let left_node = self.visit(left, scope);
                self.pin(left_node, operand);
                let right_node = self.visit(right, scope);
                self.pin(right_node, operand);
                result
            }

            Ast::BooleanUnary { child, .. } => {
                let child_node = self.visit(child, scope);
                self.pin(child_node, BOOLEAN);
                child_node
            }

            Ast::StringBinary { left, right, .. } => {
                let result = self.known(STRING);
                let object = self.known(OBJECT);
                let left_node = self.visit(left, scope);
                let right_node = self.visit(right, scope);
                self.graph.add_edge(object, left_node);
                self.graph.add_edge(object, right_node);
                result
            }

            Ast::ExpressionCall { name, arguments } => {
                let function = match self.scopes.function(scope, name) {
                    Ok(function) => function.clone(),
                    Err(error) => return self.fail(error),
                };
                if let Err(error) = function.check_arity(name, arguments.len()) {
                    return self.fail(error);
                }
                let call = self.graph.add_node(None);
                self.graph.add_edge(call, function.node);
                for (&formal, actual) in function.args.iter().zip(arguments) {
                    let child = self.scopes.child(scope);
                    let actual_node = self.visit(actual, child);
                    self.graph.add_edge(formal, actual_node);
                }
                call
            }

            Ast::New { name, arguments } => {
                if !self.context.has_type(&name.value) {
                    return self.fail(SemanticError::UndefinedType {
                        name: name.value.clone(),
                        position: name.position,
                    });
                }
                let init = match self
                    .scopes
                    .type_function(scope, &name.value, "init", name.position)
                {
                    Ok(init) => init.clone(),
                    Err(error) => return self.fail(error),
                };
                if let Err(error) = init.check_arity(name, arguments.len()) {
                    return self.fail(error);
                }
                for (&formal, actual) in init.args.iter().zip(arguments) {
                    let actual_node = self.visit(actual, scope);
                    self.graph.add_edge(formal, actual_node);
                }
                let ty = self.graph.ty(init.node).cloned();
                self.graph.add_node(ty)
            }

            Ast::Is { expression, target } => {
                let result = self.known(BOOLEAN);
                if let Err(error) = self.target_type(target) {
                    self.errors.push(error);
                }
                self.visit(expression, scope);
                result
            }

            Ast::As { expression, target } => {
                let ty = match self.target_type(target) {
                    Ok(ty) => ty,
                    Err(error) => return self.fail(error),
                };
                let expression_node = self.visit(expression, scope);
                if let Err(error) = self.local_type(expression_node) {
                    return self.fail(error);
                }
                self.graph.set_ty(expression_node, ty.clone());
                self.known(&ty)
            }

            Ast::ExplicitArrayDeclaration { values, .. } => {
                let vector_node = self.known(VECTOR);
                for value in values {
                    let value_node = self.visit(value, scope);
                    self.graph.add_edge(vector_node, value_node);
                }
                match self.local_type(vector_node) {
                    Ok(_) => vector_node,
                    Err(error) => self.fail(error),
                }
            }

            Ast::ImplicitArrayDeclaration {
                item,
                iterable,
                expression,
            } => {
                let vector_node = self.known(VECTOR);
                let iterable_node = self.visit(iterable, scope);
                let iterable_ty = match self.local_type(iterable_node) {
                    Ok(ty) => ty,
                    Err(error) => return self.fail(error),
                };
                let current = match self
                    .context
                    .require_method(&iterable_ty, "current", item.position)
                {
                    Ok(method) => method.return_type.clone(),
                    Err(error) => return self.fail(error),
                };
                let item_node = self.graph.add_node(current);
                let child = self.scopes.child(scope);
                self.scopes.define_variable(child, &item.value, item_node);
                let expression_node = self.visit(expression, child);
                if let Err(error) = self.local_type(expression_node) {
                    return self.fail(error);
                }
                self.graph.add_edge(vector_node, expression_node)
            }

            Ast::ArrayCall {
                expression,
                indexer,
            } => {
                let indexer_node = self.visit(indexer, scope);
                self.pin(indexer_node, NUMBER);
                let receiver_node = self.visit(expression, scope);
                let receiver_ty = match self.local_type(receiver_node) {
                    Ok(ty) => ty,
                    Err(error) => return self.fail(error),
                };
                let get = match self
                    .context
                    .require_method(&receiver_ty, "get", expression.position())
                {
                    Ok(method) => method.return_type.clone(),
                    Err(error) => return self.fail(error),
                };
                self.graph.add_node(get)
            }

            Ast::AssignmentArray {
                expression,
                indexer,
                value,
            } => {
                let indexer_node = self.visit(indexer, scope);
                self.pin(indexer_node, NUMBER);
                let receiver_node = self.visit(expression, scope);
                let value_node = self.visit(value, scope);
                let receiver_ty = match self.local_type(receiver_node) {
                    Ok(ty) => ty,
                    Err(error) => return self.fail(error),
                };
                let set_ty = match self
                    .context
                    .require_method(&receiver_ty, "set", expression.position())
                {
                    Ok(method) => method.parameters.get(1).and_then(|p| p.ty.clone()),
                    Err(error) => return self.fail(error),
                };
                let set_node = self.graph.add_node(set_ty);
                self.graph.add_edge(set_node, value_node)
            }

            Ast::InstanceProperty { receiver, property } => {
                let receiver_node = self.visit(receiver, scope);
                let receiver_ty = match self.local_type(receiver_node) {
                    Ok(ty) => ty,
                    Err(error) => return self.fail(error),
                };
                match self.scopes.type_attribute(scope, &receiver_ty, property) {
                    Ok(node) => node,
                    Err(error) => self.fail(error),
                }
            }

            Ast::AssignmentProperty {
                receiver,
                property,
                value,
            } => {
                let receiver_node = self.visit(receiver, scope);
                let receiver_ty = match self.local_type(receiver_node) {
                    Ok(ty) => ty,
                    Err(error) => return self.fail(error),
                };
                let attribute_node =
                    match self.scopes.type_attribute(scope, &receiver_ty, property) {
                        Ok(node) => node,
                        Err(error) => return self.fail(error),
                    };
                let value_node = self.visit(value, scope);
                self.graph.add_edge(attribute_node, value_node);
                value_node
            }

            Ast::InstanceFunction {
                receiver,
                name,
                arguments,
            } => {
                let receiver_node = self.visit(receiver, scope);
                let receiver_ty = match self.local_type(receiver_node) {
                    Ok(ty) => ty,
                    Err(error) => return self.fail(error),
                };
                let function = match self
                    .scopes
                    .type_function(scope, &receiver_ty, &name.value, name.position)
                {
                    Ok(function) => function.clone(),
                    Err(error) => return self.fail(error),
                };
                if let Err(error) = function.check_arity(name, arguments.len()) {
                    return self.fail(error);
                }
                for (&formal, actual) in function.args.iter().zip(arguments) {
                    let actual_node = self.visit(actual, scope);
                    self.graph.add_edge(formal, actual_node);
                }
                function.node
            }

            _ => self.graph.add_node(None),
        }
    }

    // ------------------------------------------------------------------
    // Post-inference
    // ------------------------------------------------------------------

    /// Rewrite every class method's stored signature with the inferred
    /// types of its parameter and return nodes.
    fn materialize_signatures(&mut self, root: ScopeId) {
        for class_name in self.context.user_class_names() {
            let methods = match self.context.class(&class_name) {
                Some(class) => class.methods.clone(),
                None => continue,
            };
            let mut rewritten = Vec::with_capacity(methods.len());
            for method in methods {
                match self
                    .scopes
                    .type_function(root, &class_name, &method.name, Position::start())
                {
                    Ok(function) => {
                        let return_type = self.graph.ty(function.node).cloned();
                        let parameters = function
                            .args
                            .iter()
                            .enumerate()
                            .map(|(i, &arg)| {
                                Attribute::untyped(
                                    &format!("{}_{}", method.name, i),
                                    self.graph.ty(arg).cloned(),
                                )
                            })
                            .collect();
                        rewritten.push(Method {
                            name: method.name.clone(),
                            return_type,
                            parameters,
                        });
                    }
                    Err(_) => rewritten.push(method),
                }
            }
            if let Some(class) = self.context.class_mut(&class_name) {
                class.methods = rewritten;
            }
        }

        // Free functions get the same treatment: inferred parameter
        // and return types flow back into the context signature.
        let names: Vec<SmolStr> = self.context.methods.keys().cloned().collect();
        for name in names {
            let Some(function) = self.scopes.function_named(root, &name) else {
                continue;
            };
            let function = function.clone();
            let return_type = self.graph.ty(function.node).cloned();
            if let Some(method) = self.context.methods.get_mut(&name) {
                method.return_type = return_type;
                for (parameter, &arg) in method.parameters.iter_mut().zip(&function.args) {
                    if parameter.ty.is_none() {
                        parameter.ty = self.graph.ty(arg).cloned();
                    }
                }
            }
        }
    }

    /// An override must keep the base method's arity and parameter
    /// types and return something conforming to the base's return.
    /// Constructors are not overrides.
    fn check_overriding(&mut self) {
        for class_name in self.context.user_class_names() {
            let Some(class) = self.context.class(&class_name) else {
                continue;
            };
            let Some(parent) = class.parent.clone() else {
                continue;
            };
            let mut mismatches = Vec::new();
            for method in &class.methods {
                if method.name == "init" {
                    continue;
                }
                let Some(base) = self.context.method_of(&parent, &method.name) else {
                    continue;
                };
                let ok = base.parameters.len() == method.parameters.len()
                    && method
                        .parameters
                        .iter()
                        .zip(&base.parameters)
                        .all(|(have, want)| have.ty == want.ty)
                    && match (&method.return_type, &base.return_type) {
                        (Some(have), Some(want)) => self.context.conforms(have, want),
                        _ => false,
                    };
                if !ok {
                    mismatches.push(method.name.clone());
                }
            }
            for method in mismatches {
                self.errors.push(SemanticError::OverrideMismatch {
                    method,
                    owner: class_name.clone(),
                });
            }
        }
    }
}
