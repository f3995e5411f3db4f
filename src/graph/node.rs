use core::fmt::Debug;
use std::collections::HashMap;
use std::fmt::Display;

use crate::graph::{Data, Edge, EdgeIndex, Graph, NodeIndex};
use crate::metagraph::{MetaEdgeIndex, MetaNode, MetaNodeIndex};

#[derive(Debug)]
pub(crate) struct NodeInternal {
    id: String,
    metanode: MetaNodeIndex,
    data: Data,
    masked: bool,
    edges: HashMap<MetaEdgeIndex, Vec<EdgeIndex>>,
}

impl NodeInternal {
    /// Creates a node with one empty adjacency bucket per metaedge
    pub fn new(id: &str, metanode: MetaNodeIndex, metaedges: &[MetaEdgeIndex], data: Data) -> Self {
        Self {
            id: id.to_string(),
            metanode,
            data,
            masked: false,
            edges: metaedges.iter().map(|idx| (*idx, Vec::new())).collect(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn metanode(&self) -> MetaNodeIndex {
        self.metanode
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn masked(&self) -> bool {
        self.masked
    }

    pub fn masked_mut(&mut self) -> &mut bool {
        &mut self.masked
    }

    pub fn edges(&self, metaedge: MetaEdgeIndex) -> &[EdgeIndex] {
        self.edges.get(&metaedge).map_or(&[], Vec::as_slice)
    }

    pub fn add_edge(&mut self, metaedge: MetaEdgeIndex, edge: EdgeIndex) {
        self.edges.entry(metaedge).or_default().push(edge);
    }
}

/// A single node of the [`Graph`], e.g. the gene `IL17`
///
/// `Node` borrows the [`Graph`] and gives access to the node's kind,
/// payload and adjacency.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    index: NodeIndex,
    internal: &'a NodeInternal,
    graph: &'a Graph,
}

impl<'a> Node<'a> {
    pub(crate) fn new(index: NodeIndex, internal: &'a NodeInternal, graph: &'a Graph) -> Self {
        Self {
            index,
            internal,
            graph,
        }
    }

    /// Returns the [`NodeIndex`] handle
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Returns the caller supplied id, e.g. `IL17`
    pub fn id(&self) -> &'a str {
        self.internal.id()
    }

    /// Returns the [`MetaNode`] of the node
    pub fn metanode(&self) -> MetaNode<'a> {
        self.graph.metagraph().metanode(self.internal.metanode())
    }

    /// Returns the kind of the node, e.g. `gene`
    pub fn kind(&self) -> &'a str {
        self.metanode().kind()
    }

    /// Returns the payload
    pub fn data(&self) -> &'a Data {
        self.internal.data()
    }

    /// Returns `true` if the node is masked
    pub fn is_masked(&self) -> bool {
        self.internal.masked()
    }

    /// Returns the [`EdgeIndex`]es of all edges of the metaedge that start at this node
    pub fn edge_indices(&self, metaedge: MetaEdgeIndex) -> &'a [EdgeIndex] {
        self.internal.edges(metaedge)
    }

    /// Returns an iterator of all [`Edge`]s of the metaedge that start at this node
    pub fn edges(&self, metaedge: MetaEdgeIndex) -> impl Iterator<Item = Edge<'a>> + 'a {
        let graph = self.graph;
        self.internal
            .edges(metaedge)
            .iter()
            .map(move |idx| graph.edge(*idx))
    }

    /// Returns the number of unmasked edges of the metaedge
    ///
    /// This is the degree used for degree-weighted path counts
    pub fn degree(&self, metaedge: MetaEdgeIndex) -> usize {
        self.edges(metaedge).filter(|edge| !edge.is_masked()).count()
    }

    /// Returns the number of edges of the metaedge, masked or not
    pub fn edge_count(&self, metaedge: MetaEdgeIndex) -> usize {
        self.internal.edges(metaedge).len()
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Display for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}
