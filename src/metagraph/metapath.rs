use core::fmt::Debug;
use std::sync::Arc;

use crate::metagraph::{MetaEdge, MetaEdgeIndex, MetaGraph, MetaNode};

/// A typed path template: a chain of [`MetaEdge`]s
///
/// The target of each metaedge is the source of the next one. A `MetaPath`
/// only holds [`MetaEdgeIndex`] handles, all methods that need the kinds
/// or abbreviations take the owning [`MetaGraph`].
///
/// `MetaPath`s are cheap to clone, the edge sequence is shared. Two metapaths
/// are equal if they consist of the same metaedges, which is the same as
/// having the same [`MetaGraph::metapath_abbreviation`].
///
/// # Examples
///
/// ```
/// use hetnet::MetaGraph;
///
/// let metagraph = MetaGraph::from_edge_tuples(&[
///     ("gene", "disease", "association", "both"),
///     ("gene", "gene", "interaction", "both"),
/// ]).unwrap();
///
/// let metapath = metagraph.parse_metapath("GiGaD").unwrap();
/// assert_eq!(metapath.len(), 2);
/// assert_eq!(metapath.source(&metagraph).kind(), "gene");
/// assert_eq!(metapath.target(&metagraph).kind(), "disease");
/// assert_eq!(metapath.inverse(&metagraph).abbreviation(&metagraph), "DaGiG");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct MetaPath {
    edges: Arc<[MetaEdgeIndex]>,
}

impl MetaPath {
    /// Constructs a new `MetaPath` without checking that the edges compose
    ///
    /// Use [`MetaGraph::get_metapath`] to create checked and interned metapaths
    pub(crate) fn new_unchecked(edges: &[MetaEdgeIndex]) -> Self {
        Self {
            edges: Arc::from(edges),
        }
    }

    /// Returns the number of metaedges
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the metapath has no edges
    ///
    /// Metapaths created via the [`MetaGraph`] are never empty
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns the [`MetaEdgeIndex`] sequence of the metapath
    pub fn edge_indices(&self) -> &[MetaEdgeIndex] {
        &self.edges
    }

    /// Returns an iterator of the [`MetaEdge`]s of the metapath
    pub fn edges<'a>(&'a self, metagraph: &'a MetaGraph) -> impl Iterator<Item = MetaEdge<'a>> {
        self.edges.iter().map(move |idx| metagraph.metaedge(*idx))
    }

    /// Returns the [`MetaNode`] the metapath starts from
    ///
    /// # Panics
    ///
    /// Panics if the metapath is empty or belongs to a different [`MetaGraph`]
    pub fn source<'a>(&self, metagraph: &'a MetaGraph) -> MetaNode<'a> {
        metagraph.metaedge(self.edges[0]).source()
    }

    /// Returns the [`MetaNode`] the metapath ends at
    ///
    /// # Panics
    ///
    /// Panics if the metapath is empty or belongs to a different [`MetaGraph`]
    pub fn target<'a>(&self, metagraph: &'a MetaGraph) -> MetaNode<'a> {
        metagraph.metaedge(self.edges[self.edges.len() - 1]).target()
    }

    /// Returns the metapath traversed in the opposite direction
    ///
    /// The order of the edges is reversed and every edge is replaced by its inverse.
    pub fn inverse(&self, metagraph: &MetaGraph) -> MetaPath {
        let edges: Vec<MetaEdgeIndex> = self
            .edges
            .iter()
            .rev()
            .map(|idx| metagraph.metaedge(*idx).inverse_index())
            .collect();
        metagraph.intern(&edges)
    }

    /// Returns the abbreviation of the metapath, e.g. `GiGaD`
    pub fn abbreviation(&self, metagraph: &MetaGraph) -> String {
        metagraph.metapath_abbreviation(self)
    }

    /// Returns the metapath without its first metaedge
    ///
    /// The remaining metapath might be empty
    pub(crate) fn tail(&self) -> &[MetaEdgeIndex] {
        &self.edges[1..]
    }
}

impl Debug for MetaPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MetaPath(")?;
        for (i, edge) in self.edges.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{edge}")?;
        }
        write!(f, ")")
    }
}
