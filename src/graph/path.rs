use core::fmt::Debug;
use std::fmt::Display;

use smallvec::SmallVec;

use crate::graph::{Edge, EdgeIndex, Graph, Node, NodeIndex};
use crate::metagraph::MetaPath;

/// The edges of a path, metapaths rarely have more than 4 edges
pub(crate) type EdgeSequence = SmallVec<[EdgeIndex; 4]>;

/// A concrete path through the [`Graph`] that follows a [`MetaPath`]
///
/// The target of each edge is the source of the next one. Paths are
/// created fresh by every search and borrow the [`Graph`].
#[derive(Clone)]
pub struct Path<'a> {
    edges: EdgeSequence,
    graph: &'a Graph,
}

impl<'a> Path<'a> {
    pub(crate) fn new(graph: &'a Graph, edges: EdgeSequence) -> Self {
        Self { edges, graph }
    }

    /// Returns the number of edges
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the path has no edges
    ///
    /// Paths returned by searches always have at least one edge
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns the [`EdgeIndex`]es of the path
    pub fn edge_indices(&self) -> &[EdgeIndex] {
        &self.edges
    }

    /// Returns an iterator of the [`Edge`]s of the path
    pub fn edges(&self) -> impl Iterator<Item = Edge<'a>> + '_ {
        self.edges.iter().map(|idx| self.graph.edge(*idx))
    }

    /// Returns the first [`Node`] of the path
    ///
    /// # Panics
    ///
    /// Panics if the path is empty
    pub fn source(&self) -> Node<'a> {
        self.graph.edge(self.edges[0]).source()
    }

    /// Returns the last [`Node`] of the path
    ///
    /// # Panics
    ///
    /// Panics if the path is empty
    pub fn target(&self) -> Node<'a> {
        self.graph.edge(self.edges[self.edges.len() - 1]).target()
    }

    /// Returns the [`NodeIndex`]es of all nodes, from source to target
    pub fn node_indices(&self) -> Vec<NodeIndex> {
        let mut nodes = Vec::with_capacity(self.edges.len() + 1);
        for (i, idx) in self.edges.iter().enumerate() {
            let edge = self.graph.edge_internal(*idx);
            if i == 0 {
                nodes.push(edge.source());
            }
            nodes.push(edge.target());
        }
        nodes
    }

    /// Returns all [`Node`]s, from source to target
    pub fn nodes(&self) -> Vec<Node<'a>> {
        self.node_indices()
            .into_iter()
            .map(|idx| self.graph.node(idx))
            .collect()
    }

    /// Returns `true` if the node is part of the path
    pub fn contains_node(&self, node: NodeIndex) -> bool {
        self.node_indices().contains(&node)
    }

    /// Returns `true` if any node or edge of the path is masked
    pub fn is_masked(&self) -> bool {
        self.edges().any(|edge| edge.is_masked())
            || self.nodes().iter().any(Node::is_masked)
    }

    /// Returns the same path traversed from target to source
    pub fn inverse(&self) -> Path<'a> {
        let edges = self
            .edges
            .iter()
            .rev()
            .map(|idx| self.graph.edge_internal(*idx).inverse())
            .collect();
        Path::new(self.graph, edges)
    }

    /// Returns the [`MetaPath`] the path follows
    pub fn metapath(&self) -> MetaPath {
        let metaedges: Vec<_> = self
            .edges
            .iter()
            .map(|idx| self.graph.edge_internal(*idx).metaedge())
            .collect();
        self.graph.metagraph().intern(&metaedges)
    }

    /// Returns the product of the endpoint degrees of all edges, damped by `damping`
    ///
    /// For every edge, the degree of its source along the edge's metaedge and
    /// the degree of its target along the inverse metaedge are raised to the
    /// power of `damping`. Only unmasked edges count towards a degree.
    pub fn degree_product(&self, damping: f64) -> f64 {
        self.edges()
            .map(|edge| {
                let metaedge = edge.metaedge();
                let source_degree = edge.source().degree(metaedge.index());
                let target_degree = edge.target().degree(metaedge.inverse_index());
                degree_to_f64(source_degree).powf(damping) * degree_to_f64(target_degree).powf(damping)
            })
            .product()
    }
}

#[allow(clippy::cast_precision_loss)]
fn degree_to_f64(degree: usize) -> f64 {
    degree as f64
}

impl PartialEq for Path<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.edges == other.edges
    }
}

impl Display for Path<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<&str> = self.nodes().iter().map(Node::id).collect();
        write!(f, "{}", ids.join(" -> "))
    }
}

impl Debug for Path<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Path({self})")
    }
}
