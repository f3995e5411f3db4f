use core::fmt::Debug;
use std::fmt::Display;

use crate::graph::{Data, EdgeIndex, Graph, Node, NodeIndex};
use crate::metagraph::{MetaEdge, MetaEdgeIndex};

#[derive(Debug)]
pub(crate) struct EdgeInternal {
    source: NodeIndex,
    target: NodeIndex,
    metaedge: MetaEdgeIndex,
    inverse: EdgeIndex,
    inverted: bool,
    parallel: bool,
    masked: bool,
    data: Data,
}

impl EdgeInternal {
    /// Creates the edge that was added explicitly
    ///
    /// The payload is only stored here, never in the inverse edge
    pub fn new(
        source: NodeIndex,
        target: NodeIndex,
        metaedge: MetaEdgeIndex,
        inverse: EdgeIndex,
        parallel: bool,
        data: Data,
    ) -> Self {
        Self {
            source,
            target,
            metaedge,
            inverse,
            inverted: false,
            parallel,
            masked: false,
            data,
        }
    }

    /// Creates the implicit inverse of an explicitly added edge
    pub fn new_inverse(
        source: NodeIndex,
        target: NodeIndex,
        metaedge: MetaEdgeIndex,
        inverse: EdgeIndex,
        parallel: bool,
    ) -> Self {
        Self {
            source,
            target,
            metaedge,
            inverse,
            inverted: true,
            parallel,
            masked: false,
            data: Data::new(),
        }
    }

    pub fn source(&self) -> NodeIndex {
        self.source
    }

    pub fn target(&self) -> NodeIndex {
        self.target
    }

    pub fn metaedge(&self) -> MetaEdgeIndex {
        self.metaedge
    }

    pub fn inverse(&self) -> EdgeIndex {
        self.inverse
    }

    pub fn inverted(&self) -> bool {
        self.inverted
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn masked(&self) -> bool {
        self.masked
    }

    pub fn masked_mut(&mut self) -> &mut bool {
        &mut self.masked
    }

    pub fn data(&self) -> &Data {
        &self.data
    }
}

/// A single edge of the [`Graph`], e.g. `IL17 - interaction - BRCA1`
///
/// Every edge exists together with its inverse, which connects the same
/// nodes in the opposite direction.
#[derive(Debug, Clone, Copy)]
pub struct Edge<'a> {
    index: EdgeIndex,
    internal: &'a EdgeInternal,
    graph: &'a Graph,
}

impl<'a> Edge<'a> {
    pub(crate) fn new(index: EdgeIndex, internal: &'a EdgeInternal, graph: &'a Graph) -> Self {
        Self {
            index,
            internal,
            graph,
        }
    }

    /// Returns the [`EdgeIndex`] handle
    pub fn index(&self) -> EdgeIndex {
        self.index
    }

    /// Returns the source [`Node`]
    pub fn source(&self) -> Node<'a> {
        self.graph.node(self.internal.source())
    }

    /// Returns the target [`Node`]
    pub fn target(&self) -> Node<'a> {
        self.graph.node(self.internal.target())
    }

    /// Returns the [`MetaEdge`] of the edge
    pub fn metaedge(&self) -> MetaEdge<'a> {
        self.graph.metagraph().metaedge(self.internal.metaedge())
    }

    /// Returns the edge in the opposite direction
    pub fn inverse(&self) -> Edge<'a> {
        self.graph.edge(self.internal.inverse())
    }

    /// Returns `true` if the edge was created implicitly as the inverse of an added edge
    pub fn inverted(&self) -> bool {
        self.internal.inverted()
    }

    /// Returns `true` if the edge was added via [`Graph::add_parallel_edge`]
    pub fn parallel(&self) -> bool {
        self.internal.parallel()
    }

    /// Returns `true` if the edge is masked
    pub fn is_masked(&self) -> bool {
        self.internal.masked()
    }

    /// Returns the payload
    ///
    /// An edge and its inverse share the same payload
    pub fn data(&self) -> &'a Data {
        if self.internal.inverted() {
            self.graph.edge_internal(self.internal.inverse()).data()
        } else {
            self.internal.data()
        }
    }
}

impl PartialEq for Edge<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Display for Edge<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {} - {}",
            self.source().id(),
            self.metaedge().kind(),
            self.target().id()
        )
    }
}
