use core::fmt::Debug;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::metagraph::{Direction, MetaEdgeIndex, MetaGraph};
use crate::{HetnetError, HetnetResult};

mod data;
mod edge;
mod node;
mod path;
mod traversal;
pub use data::{Data, Value};
pub use edge::Edge;
use edge::EdgeInternal;
pub use node::Node;
use node::NodeInternal;
pub(crate) use path::EdgeSequence;
pub use path::Path;
pub use traversal::PathOptions;

static GRAPH_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Handle of a [`Node`] inside its [`Graph`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Returns the position of the node in the graph
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl Display for NodeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node#{}", self.0)
    }
}

/// Handle of an [`Edge`] inside its [`Graph`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeIndex(usize);

impl EdgeIndex {
    /// Returns the position of the edge in the graph
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl Display for EdgeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Edge#{}", self.0)
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct EdgeKey {
    source: NodeIndex,
    target: NodeIndex,
    metaedge: MetaEdgeIndex,
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// A heterogeneous network of typed nodes and edges
///
/// The `Graph` is built against a [`MetaGraph`]: every [`Node`] is of a
/// metanode kind and every [`Edge`] of a declared metaedge. Nodes and
/// edges are never removed. To hide them from path searches, they are
/// masked instead, e.g. to hold out the edge that is being predicted.
///
/// Every added edge is created together with its inverse and both are
/// registered in the adjacency of their source node.
///
/// ```mermaid
/// erDiagram
///     GRAPH ||--|| METAGRAPH : shares
///     GRAPH ||--|{ NODE : contains
///     GRAPH ||--|{ EDGE : contains
///     NODE }|--|| METANODE : kind
///     EDGE }|--|| METAEDGE : kind
///     EDGE ||--|| EDGE : inverse
///     NODE {
///         str id
///         Data data
///         bool masked
///     }
///     EDGE {
///         NodeIndex source
///         NodeIndex target
///         Data data
///         bool masked
///     }
/// ```
///
/// # Examples
///
/// ```
/// use hetnet::{Data, Direction, Graph, MetaGraph};
///
/// let metagraph = MetaGraph::from_edge_tuples(&[
///     ("gene", "disease", "association", "both"),
/// ]).unwrap();
///
/// let mut graph = Graph::new(metagraph);
/// graph.add_node("IL17", "gene", Data::new()).unwrap();
/// graph.add_node("MS", "disease", Data::new()).unwrap();
/// graph.add_edge("IL17", "MS", "association", "both", Data::new()).unwrap();
///
/// assert_eq!(graph.len(), 2);
/// assert_eq!(graph.edge_count(), 1);
///
/// let edge = graph.find_edge("MS", "IL17", "association", Direction::Both).unwrap();
/// assert!(edge.inverted());
/// assert_eq!(edge.to_string(), "MS - association - IL17");
/// ```
pub struct Graph {
    uid: u64,
    metagraph: Arc<MetaGraph>,
    nodes: Vec<NodeInternal>,
    node_lookup: HashMap<String, NodeIndex>,
    edges: Vec<EdgeInternal>,
    edge_lookup: HashMap<EdgeKey, EdgeIndex>,
    mask_generation: u64,
}

impl Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Graph with {} nodes and {} edges",
            self.nodes.len(),
            self.edge_count()
        )
    }
}

impl Graph {
    /// Constructs an empty `Graph` of the [`MetaGraph`]
    pub fn new(metagraph: MetaGraph) -> Self {
        Self::with_metagraph(Arc::new(metagraph))
    }

    /// Constructs an empty `Graph` sharing the [`MetaGraph`] with other graphs
    pub fn with_metagraph(metagraph: Arc<MetaGraph>) -> Self {
        Self {
            uid: GRAPH_COUNTER.fetch_add(1, Ordering::Relaxed),
            metagraph,
            nodes: Vec::new(),
            node_lookup: HashMap::new(),
            edges: Vec::new(),
            edge_lookup: HashMap::new(),
            mask_generation: 0,
        }
    }

    /// Returns the [`MetaGraph`]
    pub fn metagraph(&self) -> &MetaGraph {
        &self.metagraph
    }

    /// Returns the shared [`MetaGraph`]
    pub fn shared_metagraph(&self) -> Arc<MetaGraph> {
        Arc::clone(&self.metagraph)
    }

    /// Returns the number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of added edges, not counting the implicit inverses
    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|edge| !edge.inverted()).count()
    }

    /// Adds a node of the metanode `kind`
    ///
    /// # Errors
    ///
    /// - [`HetnetError::DuplicateNode`] if a node with the id already exists
    /// - [`HetnetError::UnknownMetaNode`] if the kind is not part of the metagraph
    pub fn add_node(&mut self, id: &str, kind: &str, data: Data) -> HetnetResult<NodeIndex> {
        if self.node_lookup.contains_key(id) {
            return Err(HetnetError::DuplicateNode(id.to_string()));
        }
        let metanode = self.metagraph.get_metanode(kind)?;
        let idx = NodeIndex(self.nodes.len());
        self.nodes.push(NodeInternal::new(
            id,
            metanode.index(),
            metanode.edge_indices(),
            data,
        ));
        self.node_lookup.insert(id.to_string(), idx);
        Ok(idx)
    }

    /// Adds an edge and its inverse and returns both
    ///
    /// The metaedge is looked up from the kinds of both nodes, the edge kind
    /// and the direction.
    ///
    /// # Errors
    ///
    /// - [`HetnetError::NodeDoesNotExist`] if one of the nodes does not exist
    /// - [`HetnetError::InvalidDirection`] if the direction is invalid
    /// - [`HetnetError::UnknownMetaEdge`] if no such metaedge was declared
    /// - [`HetnetError::DuplicateEdge`] if the edge (or its inverse) already exists
    pub fn add_edge(
        &mut self,
        source_id: &str,
        target_id: &str,
        kind: &str,
        direction: &str,
        data: Data,
    ) -> HetnetResult<(EdgeIndex, EdgeIndex)> {
        let (source, target, metaedge) =
            self.resolve_edge(source_id, target_id, kind, direction)?;
        self.insert_edge(source, target, metaedge, data, false)
    }

    /// Adds an edge and its inverse, even if the same edge already exists
    ///
    /// This turns the graph into a multigraph. Parallel edges are traversed
    /// like any other edge, but [`Graph::find_edge`] only returns the first one.
    ///
    /// # Errors
    ///
    /// Same as [`Graph::add_edge`], except for [`HetnetError::DuplicateEdge`]
    pub fn add_parallel_edge(
        &mut self,
        source_id: &str,
        target_id: &str,
        kind: &str,
        direction: &str,
        data: Data,
    ) -> HetnetResult<(EdgeIndex, EdgeIndex)> {
        let (source, target, metaedge) =
            self.resolve_edge(source_id, target_id, kind, direction)?;
        self.insert_edge(source, target, metaedge, data, true)
    }

    /// Adds an edge of the metaedge between two nodes given by their handles
    ///
    /// # Errors
    ///
    /// - [`HetnetError::UnknownMetaEdge`] if the metaedge does not connect the kinds of both nodes
    /// - [`HetnetError::DuplicateEdge`] if the edge (or its inverse) already exists
    ///
    /// # Panics
    ///
    /// Panics if any of the handles belongs to a different graph or metagraph
    pub fn add_edge_between(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        metaedge: MetaEdgeIndex,
        data: Data,
    ) -> HetnetResult<(EdgeIndex, EdgeIndex)> {
        self.connect(source, target, metaedge, data, false)
    }

    /// Adds an edge of the metaedge between two nodes, even if the same edge already exists
    ///
    /// See [`Graph::add_parallel_edge`]
    ///
    /// # Errors
    ///
    /// [`HetnetError::UnknownMetaEdge`] if the metaedge does not connect the kinds of both nodes
    ///
    /// # Panics
    ///
    /// Panics if any of the handles belongs to a different graph or metagraph
    pub fn add_parallel_edge_between(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        metaedge: MetaEdgeIndex,
        data: Data,
    ) -> HetnetResult<(EdgeIndex, EdgeIndex)> {
        self.connect(source, target, metaedge, data, true)
    }

    fn connect(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        metaedge: MetaEdgeIndex,
        data: Data,
        parallel: bool,
    ) -> HetnetResult<(EdgeIndex, EdgeIndex)> {
        let edge = self.metagraph.metaedge(metaedge);
        if edge.source().index() != self.nodes[source.0].metanode()
            || edge.target().index() != self.nodes[target.0].metanode()
        {
            return Err(HetnetError::UnknownMetaEdge(format!(
                "{} between {} and {}",
                edge.label(),
                self.nodes[source.0].id(),
                self.nodes[target.0].id()
            )));
        }
        self.insert_edge(source, target, metaedge, data, parallel)
    }

    /// Returns the [`NodeIndex`] of the node with the id
    ///
    /// # Errors
    ///
    /// [`HetnetError::NodeDoesNotExist`] if no such node exists
    pub fn node_index(&self, id: &str) -> HetnetResult<NodeIndex> {
        self.node_lookup
            .get(id)
            .copied()
            .ok_or_else(|| HetnetError::NodeDoesNotExist(id.to_string()))
    }

    /// Returns the [`Node`] with the id, if it exists
    pub fn node_by_id(&self, id: &str) -> Option<Node<'_>> {
        self.node_lookup.get(id).map(|idx| self.node(*idx))
    }

    /// Returns the [`Node`] of the handle
    ///
    /// # Panics
    ///
    /// Panics if the handle belongs to a different graph
    pub fn node(&self, index: NodeIndex) -> Node<'_> {
        Node::new(index, &self.nodes[index.0], self)
    }

    /// Returns the [`Node`] of the handle, or `None` if the handle is out of range
    ///
    /// A handle of a different graph that happens to be in range is not detected.
    pub fn get_node(&self, index: NodeIndex) -> Option<Node<'_>> {
        self.nodes
            .get(index.0)
            .map(|internal| Node::new(index, internal, self))
    }

    /// Returns the [`Node`] of the handle
    ///
    /// # Errors
    ///
    /// [`HetnetError::NodeDoesNotExist`] if the handle is out of range
    pub(crate) fn checked_node(&self, index: NodeIndex) -> HetnetResult<Node<'_>> {
        self.get_node(index)
            .ok_or_else(|| HetnetError::NodeDoesNotExist(index.to_string()))
    }

    /// Returns the [`Edge`] of the handle
    ///
    /// # Panics
    ///
    /// Panics if the handle belongs to a different graph
    pub fn edge(&self, index: EdgeIndex) -> Edge<'_> {
        Edge::new(index, &self.edges[index.0], self)
    }

    /// Returns the edge from `source_id` to `target_id`
    ///
    /// Inverse edges are found as well, e.g. `(disease, gene)` for an
    /// added `(gene, disease)` edge.
    ///
    /// # Errors
    ///
    /// - [`HetnetError::NodeDoesNotExist`] if one of the nodes does not exist
    /// - [`HetnetError::UnknownMetaEdge`] if no such metaedge was declared
    /// - [`HetnetError::EdgeDoesNotExist`] if no such edge exists
    pub fn find_edge(
        &self,
        source_id: &str,
        target_id: &str,
        kind: &str,
        direction: Direction,
    ) -> HetnetResult<Edge<'_>> {
        let (source, target, metaedge) =
            self.resolve_edge(source_id, target_id, kind, direction.as_str())?;
        self.edge_lookup
            .get(&EdgeKey {
                source,
                target,
                metaedge,
            })
            .map(|idx| self.edge(*idx))
            .ok_or_else(|| {
                HetnetError::EdgeDoesNotExist(format!(
                    "({source_id}, {target_id}, {kind}, {direction})"
                ))
            })
    }

    /// Returns an iterator of all [`Node`]s, in the order they were added
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> {
        (0..self.nodes.len()).map(|idx| self.node(NodeIndex(idx)))
    }

    /// Returns an iterator of all [`Edge`]s, including the implicit inverses
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> {
        (0..self.edges.len()).map(|idx| self.edge(EdgeIndex(idx)))
    }

    /// Returns the number of edges of the metaedge for every node, in node order
    ///
    /// Masks are ignored. Nodes of other kinds have a degree of 0.
    pub fn degree_sequence(&self, metaedge: MetaEdgeIndex) -> Vec<usize> {
        self.nodes().map(|node| node.edge_count(metaedge)).collect()
    }
}

/// Masking
///
/// Masked nodes and edges stay in the graph but are skipped by path searches
/// that respect masks. Masking requires exclusive access to the graph, so
/// searches and mask changes can never overlap.
impl Graph {
    /// Masks the node
    pub fn mask_node(&mut self, node: NodeIndex) {
        *self.nodes[node.0].masked_mut() = true;
        self.mask_generation += 1;
    }

    /// Unmasks the node
    pub fn unmask_node(&mut self, node: NodeIndex) {
        *self.nodes[node.0].masked_mut() = false;
        self.mask_generation += 1;
    }

    /// Masks the edge and its inverse
    pub fn mask_edge(&mut self, edge: EdgeIndex) {
        self.set_edge_mask(edge, true);
    }

    /// Unmasks the edge and its inverse
    pub fn unmask_edge(&mut self, edge: EdgeIndex) {
        self.set_edge_mask(edge, false);
    }

    /// Masks all nodes that match the predicate and returns their number
    pub fn mask_nodes_where<F: FnMut(&Node) -> bool>(&mut self, mut predicate: F) -> usize {
        let matches: Vec<NodeIndex> = self
            .nodes()
            .filter(|node| predicate(node))
            .map(|node| node.index())
            .collect();
        for idx in &matches {
            self.mask_node(*idx);
        }
        debug!("Masked {} nodes", matches.len());
        matches.len()
    }

    /// Masks all edges (and their inverses) that match the predicate
    ///
    /// Only added edges are passed to the predicate, not their implicit inverses.
    /// Returns the number of matching edges.
    ///
    /// # Examples
    ///
    /// ```
    /// use hetnet::{Data, Graph, MetaGraph, Value};
    ///
    /// let metagraph = MetaGraph::from_edge_tuples(&[("gene", "gene", "interaction", "both")]).unwrap();
    /// let mut graph = Graph::new(metagraph);
    /// for gene in ["A", "B", "C"] {
    ///     graph.add_node(gene, "gene", Data::new()).unwrap();
    /// }
    /// let weak = Data::from([("score".to_string(), Value::from(0.1))]);
    /// let strong = Data::from([("score".to_string(), Value::from(0.9))]);
    /// graph.add_edge("A", "B", "interaction", "both", weak).unwrap();
    /// graph.add_edge("B", "C", "interaction", "both", strong).unwrap();
    ///
    /// let masked = graph.mask_edges_where(|edge| {
    ///     edge.data().get("score").and_then(Value::as_f64).map_or(false, |s| s < 0.5)
    /// });
    /// assert_eq!(masked, 1);
    /// ```
    pub fn mask_edges_where<F: FnMut(&Edge) -> bool>(&mut self, mut predicate: F) -> usize {
        let matches: Vec<EdgeIndex> = self
            .edges()
            .filter(|edge| !edge.inverted() && predicate(edge))
            .map(|edge| edge.index())
            .collect();
        for idx in &matches {
            self.mask_edge(*idx);
        }
        debug!("Masked {} edges", matches.len());
        matches.len()
    }

    /// Unmasks all nodes and edges
    pub fn unmask(&mut self) {
        for node in &mut self.nodes {
            *node.masked_mut() = false;
        }
        for edge in &mut self.edges {
            *edge.masked_mut() = false;
        }
        self.mask_generation += 1;
    }

    /// Returns a counter that changes whenever a mask changes
    pub fn mask_generation(&self) -> u64 {
        self.mask_generation
    }

    fn set_edge_mask(&mut self, edge: EdgeIndex, masked: bool) {
        let inverse = self.edges[edge.0].inverse();
        *self.edges[edge.0].masked_mut() = masked;
        *self.edges[inverse.0].masked_mut() = masked;
        self.mask_generation += 1;
    }
}

/// Crate-only accessors
impl Graph {
    /// Returns a process-unique identifier of the graph
    pub(crate) fn uid(&self) -> u64 {
        self.uid
    }

    pub(crate) fn node_internal(&self, index: NodeIndex) -> &NodeInternal {
        &self.nodes[index.0]
    }

    pub(crate) fn edge_internal(&self, index: EdgeIndex) -> &EdgeInternal {
        &self.edges[index.0]
    }

    /// Adds a node with the same id, kind and payload as `node`
    pub(crate) fn copy_node(&mut self, node: &Node) -> HetnetResult<NodeIndex> {
        self.add_node(node.id(), node.kind(), node.data().clone())
    }

    fn resolve_edge(
        &self,
        source_id: &str,
        target_id: &str,
        kind: &str,
        direction: &str,
    ) -> HetnetResult<(NodeIndex, NodeIndex, MetaEdgeIndex)> {
        let direction: Direction = direction.parse()?;
        let source = self.node_index(source_id)?;
        let target = self.node_index(target_id)?;
        let source_kind = self.nodes[source.0].metanode();
        let target_kind = self.nodes[target.0].metanode();
        let metaedge = self
            .metagraph
            .metaedge_between(source_kind, target_kind, kind, direction)
            .ok_or_else(|| {
                HetnetError::UnknownMetaEdge(format!(
                    "({}, {}, {kind}, {direction})",
                    self.metagraph.metanode(source_kind).kind(),
                    self.metagraph.metanode(target_kind).kind(),
                ))
            })?;
        Ok((source, target, metaedge))
    }

    fn insert_edge(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        metaedge: MetaEdgeIndex,
        data: Data,
        parallel: bool,
    ) -> HetnetResult<(EdgeIndex, EdgeIndex)> {
        let key = EdgeKey {
            source,
            target,
            metaedge,
        };
        if !parallel && self.edge_lookup.contains_key(&key) {
            return Err(HetnetError::DuplicateEdge(format!(
                "({}, {}, {})",
                self.nodes[source.0].id(),
                self.nodes[target.0].id(),
                self.metagraph.metaedge(metaedge).label()
            )));
        }

        let inverse_metaedge = self.metagraph.metaedge(metaedge).inverse_index();
        let idx = EdgeIndex(self.edges.len());
        let self_inverse = source == target && inverse_metaedge == metaedge;
        let inverse_idx = if self_inverse {
            idx
        } else {
            EdgeIndex(idx.0 + 1)
        };

        self.edges.push(EdgeInternal::new(
            source,
            target,
            metaedge,
            inverse_idx,
            parallel,
            data,
        ));
        self.nodes[source.0].add_edge(metaedge, idx);
        self.edge_lookup.entry(key).or_insert(idx);

        if !self_inverse {
            self.edges.push(EdgeInternal::new_inverse(
                target,
                source,
                inverse_metaedge,
                idx,
                parallel,
            ));
            self.nodes[target.0].add_edge(inverse_metaedge, inverse_idx);
            self.edge_lookup
                .entry(EdgeKey {
                    source: target,
                    target: source,
                    metaedge: inverse_metaedge,
                })
                .or_insert(inverse_idx);
        }
        Ok((idx, inverse_idx))
    }
}
