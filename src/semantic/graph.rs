//! The semantic constraint graph.
//!
//! Every value-producing AST position owns a node. A directed edge
//! parent → child means "the parent's slot collects the child's
//! value": unknown parents take the lowest common ancestor of their
//! children, known parents propagate their type down and demand
//! conformance from every child.
//!
//! Nodes live in an arena and edges are index adjacency lists, so the
//! cyclic constraint structure carries no ownership cycles.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::context::Context;
use super::error::SemanticError;
use super::types::{ERROR, OBJECT, TypeName, VECTOR, is_vector};

/// Index of a node within its graph.
pub type NodeId = usize;

#[derive(Debug, Clone, Default)]
struct SemanticNode {
    ty: Option<TypeName>,
    visited: bool,
}

#[derive(Debug, Default)]
pub struct SemanticGraph {
    nodes: Vec<SemanticNode>,
    adj: Vec<Vec<NodeId>>,
}

impl SemanticGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_node(&mut self, ty: Option<TypeName>) -> NodeId {
        self.nodes.push(SemanticNode { ty, visited: false });
        self.adj.push(Vec::new());
        self.nodes.len() - 1
    }

    /// Edge parent → child. Re-opens the parent for inference if it
    /// was already resolved.
    pub fn add_edge(&mut self, parent: NodeId, child: NodeId) -> NodeId {
        self.adj[parent].push(child);
        if self.nodes[parent].visited {
            self.nodes[parent].visited = false;
        }
        parent
    }

    pub fn ty(&self, node: NodeId) -> Option<&TypeName> {
        self.nodes[node].ty.as_ref()
    }

    /// Force a node's type (used by `as` casts).
    pub fn set_ty(&mut self, node: NodeId, ty: TypeName) {
        self.nodes[node].ty = Some(ty);
    }

    // ------------------------------------------------------------------
    // Inference
    // ------------------------------------------------------------------

    /// Single-sink propagation from `node` downward.
    fn dfs(&mut self, node: NodeId, context: &mut Context) -> Option<TypeName> {
        self.nodes[node].visited = true;

        if self.adj[node].is_empty() {
            if self.nodes[node].ty.as_deref() == Some(VECTOR) {
                self.nodes[node].ty = Some(context.materialize_vector(OBJECT));
            }
            return self.nodes[node].ty.clone();
        }

        match self.nodes[node].ty.clone() {
            None => {
                let inferred = self.children_type(node, context);
                self.nodes[node].ty = inferred;
            }
            Some(marker) if marker == VECTOR => {
                let element = self.children_type(node, context);
                self.nodes[node].ty = Some(match element {
                    Some(element) if is_vector(&element) => SmolStr::new(ERROR),
                    Some(element) => context.materialize_vector(&element),
                    None => context.materialize_vector(OBJECT),
                });
            }
            Some(ty) => {
                for i in 0..self.adj[node].len() {
                    let child = self.adj[node][i];
                    if !self.nodes[child].visited {
                        self.dfs(child, context);
                    }
                    match self.nodes[child].ty.clone() {
                        None => self.nodes[child].ty = Some(ty.clone()),
                        Some(child_ty) => {
                            if child_ty == ERROR || !context.conforms(&child_ty, &ty) {
                                self.nodes[node].ty = Some(SmolStr::new(ERROR));
                                break;
                            }
                        }
                    }
                }
            }
        }

        self.nodes[node].ty.clone()
    }

    /// Lowest common ancestor of all children's types.
    fn children_type(&mut self, node: NodeId, context: &mut Context) -> Option<TypeName> {
        let mut result: Option<TypeName> = None;
        for i in 0..self.adj[node].len() {
            let child = self.adj[node][i];
            if !self.nodes[child].visited {
                self.dfs(child, context);
            }
            result = match (result, self.nodes[child].ty.clone()) {
                (None, child_ty) => child_ty,
                (acc, None) => acc,
                (Some(acc), Some(child_ty)) => Some(context.lca(&acc, &child_ty)),
            };
        }
        result
    }

    /// Resolve just the subgraph below `node`; used when an expression
    /// is consumed as a receiver before the whole program is inferred.
    pub fn local_inference(
        &mut self,
        node: NodeId,
        context: &mut Context,
    ) -> Result<TypeName, SemanticError> {
        let ty = if self.nodes[node].visited {
            self.nodes[node].ty.clone()
        } else {
            self.dfs(node, context)
        };
        match ty {
            Some(ty) if ty != ERROR => Ok(ty),
            _ => Err(SemanticError::InconsistentInference),
        }
    }

    /// Full inference: SCC consistency first, then propagation over
    /// every node in index order.
    pub fn infer(&mut self, context: &mut Context) -> Result<(), SemanticError> {
        let components = self.components();
        let mut component_types: FxHashMap<usize, TypeName> = FxHashMap::default();
        for (node, component) in components.iter().enumerate() {
            let Some(ty) = self.nodes[node].ty.clone() else {
                continue;
            };
            match component_types.get(component) {
                Some(existing) if *existing != ty => {
                    return Err(SemanticError::InconsistentInference);
                }
                Some(_) => {}
                None => {
                    component_types.insert(*component, ty);
                }
            }
        }

        for node in 0..self.nodes.len() {
            if self.nodes[node].visited {
                continue;
            }
            match self.dfs(node, context) {
                Some(ty) if ty != ERROR => {}
                _ => return Err(SemanticError::InconsistentInference),
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Strongly connected components (two-pass DFS over the graph and
    // its transpose)
    // ------------------------------------------------------------------

    fn transpose(&self) -> Vec<Vec<NodeId>> {
        let mut transposed = vec![Vec::new(); self.adj.len()];
        for (from, targets) in self.adj.iter().enumerate() {
            for &to in targets {
                transposed[to].push(from);
            }
        }
        transposed
    }

    /// Component index per node; nodes in one strongly connected
    /// component share an index.
    pub fn components(&self) -> Vec<usize> {
        let count = self.nodes.len();
        let transposed = self.transpose();

        let mut mask = vec![false; count];
        let mut order = Vec::with_capacity(count);
        for node in 0..count {
            if !mask[node] {
                Self::post_order(node, &self.adj, &mut mask, &mut order);
            }
        }

        let mut mask = vec![false; count];
        let mut components = vec![0usize; count];
        let mut next = 0;
        while let Some(node) = order.pop() {
            if !mask[node] {
                Self::assign(node, &transposed, &mut mask, next, &mut components);
                next += 1;
            }
        }
        components
    }

    fn post_order(node: NodeId, adj: &[Vec<NodeId>], mask: &mut [bool], order: &mut Vec<NodeId>) {
        mask[node] = true;
        for &next in &adj[node] {
            if !mask[next] {
                Self::post_order(next, adj, mask, order);
            }
        }
        order.push(node);
    }

    fn assign(
        node: NodeId,
        adj: &[Vec<NodeId>],
        mask: &mut [bool],
        component: usize,
        components: &mut [usize],
    ) {
        mask[node] = true;
        components[node] = component;
        for &next in &adj[node] {
            if !mask[next] {
                Self::assign(next, adj, mask, component, components);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::types::{BOOLEAN, NUMBER, STRING};

    fn ctx() -> Context {
        Context::bootstrap()
    }

    fn known(graph: &mut SemanticGraph, name: &str) -> NodeId {
        graph.add_node(Some(SmolStr::new(name)))
    }

    #[test]
    fn unknown_parent_takes_lub_of_children() {
        let mut context = ctx();
        let mut graph = SemanticGraph::new();
        let parent = graph.add_node(None);
        let a = known(&mut graph, NUMBER);
        let b = known(&mut graph, STRING);
        graph.add_edge(parent, a);
        graph.add_edge(parent, b);
        graph.infer(&mut context).unwrap();
        assert_eq!(graph.ty(parent).unwrap(), "Object");
    }

    #[test]
    fn known_parent_fills_unknown_children() {
        let mut context = ctx();
        let mut graph = SemanticGraph::new();
        let parent = known(&mut graph, NUMBER);
        let child = graph.add_node(None);
        graph.add_edge(parent, child);
        graph.infer(&mut context).unwrap();
        assert_eq!(graph.ty(child).unwrap(), NUMBER);
    }

    #[test]
    fn nonconforming_child_is_an_inference_error() {
        let mut context = ctx();
        let mut graph = SemanticGraph::new();
        let parent = known(&mut graph, BOOLEAN);
        let child = known(&mut graph, NUMBER);
        graph.add_edge(parent, child);
        assert!(graph.infer(&mut context).is_err());
    }

    #[test]
    fn cycle_members_must_agree_on_their_type() {
        let mut context = ctx();
        let mut graph = SemanticGraph::new();
        let a = known(&mut graph, NUMBER);
        let b = known(&mut graph, STRING);
        graph.add_edge(a, b);
        graph.add_edge(b, a);
        assert!(graph.infer(&mut context).is_err());
    }

    #[test]
    fn agreeing_cycle_resolves() {
        let mut context = ctx();
        let mut graph = SemanticGraph::new();
        let a = known(&mut graph, NUMBER);
        let b = graph.add_node(None);
        graph.add_edge(a, b);
        graph.add_edge(b, a);
        graph.infer(&mut context).unwrap();
        assert_eq!(graph.ty(b).unwrap(), NUMBER);
    }

    #[test]
    fn vector_marker_resolves_to_element_lub() {
        let mut context = ctx();
        let mut graph = SemanticGraph::new();
        let vector = known(&mut graph, VECTOR);
        let a = known(&mut graph, NUMBER);
        let b = known(&mut graph, NUMBER);
        graph.add_edge(vector, a);
        graph.add_edge(vector, b);
        graph.infer(&mut context).unwrap();
        assert_eq!(graph.ty(vector).unwrap(), "[Number]");
    }

    #[test]
    fn empty_vector_leaf_resolves_to_object_vector() {
        let mut context = ctx();
        let mut graph = SemanticGraph::new();
        let vector = known(&mut graph, VECTOR);
        graph.infer(&mut context).unwrap();
        assert_eq!(graph.ty(vector).unwrap(), "[Object]");
    }

    #[test]
    fn nested_vector_lub_is_an_error() {
        let mut context = ctx();
        let mut graph = SemanticGraph::new();
        context.materialize_vector(NUMBER);
        let outer = known(&mut graph, VECTOR);
        let inner = known(&mut graph, "[Number]");
        graph.add_edge(outer, inner);
        assert!(graph.infer(&mut context).is_err());
    }

    #[test]
    fn components_identify_cycles() {
        let mut graph = SemanticGraph::new();
        let a = graph.add_node(None);
        let b = graph.add_node(None);
        let c = graph.add_node(None);
        graph.add_edge(a, b);
        graph.add_edge(b, a);
        graph.add_edge(b, c);
        let components = graph.components();
        assert_eq!(components[a], components[b]);
        assert_ne!(components[a], components[c]);
    }

    #[test]
    fn redundant_conformance_edge_leaves_types_unchanged() {
        let mut context = ctx();
        let mut graph = SemanticGraph::new();
        let parent = graph.add_node(None);
        let a = known(&mut graph, NUMBER);
        graph.add_edge(parent, a);
        graph.infer(&mut context).unwrap();
        let before = graph.ty(parent).cloned();

        // Adding an already-satisfied edge and re-running leaves every
        // type as it was.
        let b = known(&mut graph, NUMBER);
        graph.add_edge(parent, b);
        graph.infer(&mut context).unwrap();
        assert_eq!(graph.ty(parent).cloned(), before);
        assert_eq!(graph.ty(a).unwrap(), NUMBER);
    }
}
