use core::fmt::Debug;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::{HetnetError, HetnetResult, DEFAULT_NUM_METAEDGES};

mod abbreviation;
mod direction;
mod metapath;
use abbreviation::{unique_prefixes, Case};
pub use direction::Direction;
pub use metapath::MetaPath;

/// Handle of a [`MetaNode`] inside its [`MetaGraph`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetaNodeIndex(usize);

impl MetaNodeIndex {
    /// Returns the position of the metanode in the metagraph
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl Display for MetaNodeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MetaNode#{}", self.0)
    }
}

/// Handle of a [`MetaEdge`] inside its [`MetaGraph`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetaEdgeIndex(usize);

impl MetaEdgeIndex {
    /// Returns the position of the metaedge in the metagraph
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl Display for MetaEdgeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MetaEdge#{}", self.0)
    }
}

#[derive(Debug)]
pub(crate) struct MetaNodeInternal {
    kind: String,
    abbreviation: String,
    edges: Vec<MetaEdgeIndex>,
}

#[derive(Debug)]
pub(crate) struct MetaEdgeInternal {
    source: MetaNodeIndex,
    target: MetaNodeIndex,
    kind: String,
    direction: Direction,
    inverse: MetaEdgeIndex,
    inverted: bool,
    abbreviation: String,
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct MetaEdgeKey {
    source: MetaNodeIndex,
    target: MetaNodeIndex,
    kind: String,
    direction: Direction,
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// The schema of a heterogeneous network
///
/// A `MetaGraph` holds all node kinds ([`MetaNode`]) and edge kinds ([`MetaEdge`]).
/// It is built once from a list of `(source_kind, target_kind, edge_kind, direction)`
/// tuples and is read-only afterwards.
///
/// Every declared metaedge has an inverse that is created implicitly: declaring
/// `(gene, disease, association, both)` also creates
/// `(disease, gene, association, both)`. Undirected self-loops, such as
/// `(gene, gene, interaction, both)`, are their own inverse.
///
/// ```mermaid
/// erDiagram
///     METAGRAPH ||--|{ METANODE : contains
///     METAGRAPH ||--|{ METAEDGE : contains
///     METAEDGE }|--|| METANODE : source
///     METAEDGE }|--|| METANODE : target
///     METAEDGE ||--|| METAEDGE : inverse
///     METANODE {
///         str kind
///         str abbreviation
///     }
///     METAEDGE {
///         str kind
///         Direction direction
///         str abbreviation
///     }
/// ```
///
/// # Examples
///
/// ```
/// use hetnet::{Direction, MetaGraph};
///
/// let metagraph = MetaGraph::from_edge_tuples(&[
///     ("gene", "disease", "association", "both"),
///     ("gene", "gene", "interaction", "both"),
///     ("compound", "gene", "target", "forward"),
/// ]).unwrap();
///
/// assert_eq!(metagraph.metanodes().count(), 3);
/// // association and target are declared with their inverse
/// assert_eq!(metagraph.metaedges().count(), 5);
///
/// let gene = metagraph.get_metanode("gene").unwrap();
/// assert_eq!(gene.abbreviation(), "G");
///
/// let target = metagraph.get_metaedge("gene", "compound", "target", Direction::Backward).unwrap();
/// assert_eq!(target.label(), "G<tC");
/// assert_eq!(target.inverse().label(), "Ct>G");
/// ```
#[derive(Default)]
pub struct MetaGraph {
    metanodes: Vec<MetaNodeInternal>,
    metanode_lookup: HashMap<String, MetaNodeIndex>,
    metaedges: Vec<MetaEdgeInternal>,
    metaedge_lookup: HashMap<MetaEdgeKey, MetaEdgeIndex>,
    metapaths: RwLock<HashMap<Vec<MetaEdgeIndex>, MetaPath>>,
}

impl Debug for MetaGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MetaGraph with {} metanodes and {} metaedges",
            self.metanodes.len(),
            self.metaedges.len()
        )
    }
}

impl MetaGraph {
    /// Builds the `MetaGraph` from `(source_kind, target_kind, edge_kind, direction)` tuples
    ///
    /// Metanodes are created on first sight. Every metaedge is created together
    /// with its inverse. Once all metaedges are added, the abbreviations of all
    /// metanodes and metaedges are derived.
    ///
    /// # Errors
    ///
    /// - `direction` is not one of `forward`, `backward`, `both`: [`HetnetError::InvalidDirection`]
    /// - a kind is empty: [`HetnetError::InvalidKind`]
    /// - a tuple (or its implicit inverse) is declared twice: [`HetnetError::DuplicateMetaEdge`]
    ///
    /// # Examples
    ///
    /// ```
    /// use hetnet::{HetnetError, MetaGraph};
    ///
    /// let result = MetaGraph::from_edge_tuples(&[("gene", "disease", "association", "up")]);
    /// assert!(matches!(result, Err(HetnetError::InvalidDirection(_))));
    ///
    /// let result = MetaGraph::from_edge_tuples(&[
    ///     ("gene", "disease", "association", "both"),
    ///     ("disease", "gene", "association", "both"),
    /// ]);
    /// assert!(matches!(result, Err(HetnetError::DuplicateMetaEdge(_))));
    /// ```
    pub fn from_edge_tuples<S: AsRef<str>>(tuples: &[(S, S, S, S)]) -> HetnetResult<Self> {
        Self::from_metanodes_and_edge_tuples::<&str, S>(&[], tuples)
    }

    /// Builds the `MetaGraph` from metanode kinds and metaedge tuples
    ///
    /// The metanodes of `kinds` are created first, in the given order, so
    /// kinds without any metaedge are part of the metagraph as well. All
    /// other metanodes are created on first sight in `tuples`, like in
    /// [`MetaGraph::from_edge_tuples`].
    ///
    /// # Errors
    ///
    /// Same as [`MetaGraph::from_edge_tuples`]
    ///
    /// # Examples
    ///
    /// ```
    /// use hetnet::MetaGraph;
    ///
    /// let metagraph = MetaGraph::from_metanodes_and_edge_tuples(
    ///     &["gene", "disease", "tissue"],
    ///     &[("gene", "disease", "association", "both")],
    /// ).unwrap();
    ///
    /// let tissue = metagraph.get_metanode("tissue").unwrap();
    /// assert_eq!(tissue.abbreviation(), "T");
    /// assert_eq!(tissue.edges().count(), 0);
    /// ```
    pub fn from_metanodes_and_edge_tuples<K: AsRef<str>, S: AsRef<str>>(
        kinds: &[K],
        tuples: &[(S, S, S, S)],
    ) -> HetnetResult<Self> {
        let mut metagraph = MetaGraph::default();
        for kind in kinds {
            metagraph.add_metanode(kind.as_ref())?;
        }
        for (source, target, kind, direction) in tuples {
            let direction: Direction = direction.as_ref().parse()?;
            metagraph.add_metaedge(source.as_ref(), target.as_ref(), kind.as_ref(), direction)?;
        }
        metagraph.assign_abbreviations();
        debug!("Built {:?}", metagraph);
        Ok(metagraph)
    }

    /// Returns the [`MetaNode`] of the given kind
    ///
    /// # Errors
    ///
    /// [`HetnetError::UnknownMetaNode`] if the kind does not exist
    pub fn get_metanode(&self, kind: &str) -> HetnetResult<MetaNode<'_>> {
        Ok(self.metanode(self.metanode_index(kind)?))
    }

    /// Returns the [`MetaNodeIndex`] of the given kind
    ///
    /// # Errors
    ///
    /// [`HetnetError::UnknownMetaNode`] if the kind does not exist
    pub fn metanode_index(&self, kind: &str) -> HetnetResult<MetaNodeIndex> {
        self.metanode_lookup
            .get(kind)
            .copied()
            .ok_or_else(|| HetnetError::UnknownMetaNode(kind.to_string()))
    }

    /// Returns the [`MetaEdge`] identified by its 4-tuple
    ///
    /// # Errors
    ///
    /// - [`HetnetError::UnknownMetaNode`] if one of the node kinds does not exist
    /// - [`HetnetError::UnknownMetaEdge`] if no such metaedge was declared
    pub fn get_metaedge(
        &self,
        source_kind: &str,
        target_kind: &str,
        kind: &str,
        direction: Direction,
    ) -> HetnetResult<MetaEdge<'_>> {
        let key = MetaEdgeKey {
            source: self.metanode_index(source_kind)?,
            target: self.metanode_index(target_kind)?,
            kind: kind.to_string(),
            direction,
        };
        self.metaedge_by_key(&key)
            .map(|idx| self.metaedge(idx))
            .ok_or_else(|| {
                HetnetError::UnknownMetaEdge(format!(
                    "({source_kind}, {target_kind}, {kind}, {direction})"
                ))
            })
    }

    /// Returns the [`MetaNode`] of the handle
    ///
    /// # Panics
    ///
    /// Panics if the handle belongs to a different `MetaGraph`
    pub fn metanode(&self, index: MetaNodeIndex) -> MetaNode<'_> {
        MetaNode {
            index,
            internal: &self.metanodes[index.0],
            metagraph: self,
        }
    }

    /// Returns the [`MetaEdge`] of the handle
    ///
    /// # Panics
    ///
    /// Panics if the handle belongs to a different `MetaGraph`
    pub fn metaedge(&self, index: MetaEdgeIndex) -> MetaEdge<'_> {
        MetaEdge {
            index,
            internal: &self.metaedges[index.0],
            metagraph: self,
        }
    }

    /// Returns an iterator of all [`MetaNode`]s, in the order of their creation
    pub fn metanodes(&self) -> impl Iterator<Item = MetaNode<'_>> {
        (0..self.metanodes.len()).map(|idx| self.metanode(MetaNodeIndex(idx)))
    }

    /// Returns an iterator of all [`MetaEdge`]s, including the implicit inverses
    pub fn metaedges(&self) -> impl Iterator<Item = MetaEdge<'_>> {
        (0..self.metaedges.len()).map(|idx| self.metaedge(MetaEdgeIndex(idx)))
    }

    /// Returns the declared `(source_kind, target_kind, edge_kind, direction)` tuples
    ///
    /// Implicit inverses are not part of the result. Building a new `MetaGraph`
    /// from the tuples gives an identical metagraph.
    pub fn metaedge_tuples(&self) -> Vec<(String, String, String, Direction)> {
        self.metaedges()
            .filter(|edge| !edge.inverted())
            .map(|edge| {
                (
                    edge.source().kind().to_string(),
                    edge.target().kind().to_string(),
                    edge.kind().to_string(),
                    edge.direction(),
                )
            })
            .collect()
    }

    /// Returns the [`MetaPath`] consisting of the given metaedges
    ///
    /// Metapaths are memoized, requesting the same sequence of metaedges
    /// again returns a clone of the same metapath.
    ///
    /// # Errors
    ///
    /// [`HetnetError::InvalidMetaPath`] if the sequence is empty or
    /// the metaedges are not a composable chain.
    pub fn get_metapath(&self, edges: &[MetaEdgeIndex]) -> HetnetResult<MetaPath> {
        if edges.is_empty() {
            return Err(HetnetError::InvalidMetaPath(
                "a metapath requires at least one metaedge".to_string(),
            ));
        }
        if let Some(idx) = edges.iter().find(|idx| idx.0 >= self.metaedges.len()) {
            return Err(HetnetError::InvalidMetaPath(format!(
                "{idx} is not part of the metagraph"
            )));
        }
        for pair in edges.windows(2) {
            let first = self.metaedge(pair[0]);
            let second = self.metaedge(pair[1]);
            if first.target().index() != second.source().index() {
                return Err(HetnetError::InvalidMetaPath(format!(
                    "{} does not continue {}",
                    second.label(),
                    first.label()
                )));
            }
        }
        Ok(self.intern(edges))
    }

    /// Returns all metapaths from `source_kind` to `target_kind` with `1..=max_length` edges
    ///
    /// The metapaths are expanded breadth-first, shorter metapaths come first.
    /// Metapaths may visit the same metanode more than once.
    ///
    /// # Errors
    ///
    /// [`HetnetError::UnknownMetaNode`] if one of the kinds does not exist
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
    /// let metapaths: Vec<String> = metagraph
    ///     .extract_metapaths("gene", "disease", 2)
    ///     .unwrap()
    ///     .iter()
    ///     .map(|metapath| metapath.abbreviation(&metagraph))
    ///     .collect();
    ///
    /// assert_eq!(metapaths, vec!["GaD", "GiGaD"]);
    /// ```
    pub fn extract_metapaths(
        &self,
        source_kind: &str,
        target_kind: &str,
        max_length: usize,
    ) -> HetnetResult<Vec<MetaPath>> {
        let source = self.metanode_index(source_kind)?;
        let target = self.metanode_index(target_kind)?;

        let mut metapaths: Vec<MetaPath> = Vec::new();
        let mut current: Vec<MetaPath> = Vec::new();
        for depth in 1..=max_length {
            current = if depth == 1 {
                self.metanodes[source.0]
                    .edges
                    .iter()
                    .map(|edge| self.intern(&[*edge]))
                    .collect()
            } else {
                let mut next = Vec::with_capacity(current.len() * DEFAULT_NUM_METAEDGES);
                for metapath in &current {
                    let last = metapath.target(self).index();
                    for edge in &self.metanodes[last.0].edges {
                        let mut edges = metapath.edge_indices().to_vec();
                        edges.push(*edge);
                        next.push(self.intern(&edges));
                    }
                }
                next
            };
            metapaths.extend(current.iter().cloned());
        }

        metapaths.retain(|metapath| metapath.target(self).index() == target);
        debug!(
            "Extracted {} metapaths from {} to {} (max length {})",
            metapaths.len(),
            source_kind,
            target_kind,
            max_length
        );
        Ok(metapaths)
    }

    /// Returns the abbreviation of the metapath, e.g. `GiGaD`
    ///
    /// The abbreviation starts with the abbreviation of the source metanode,
    /// followed by the abbreviation of each metaedge (with direction marker)
    /// and its target metanode.
    pub fn metapath_abbreviation(&self, metapath: &MetaPath) -> String {
        let mut abbreviation = String::new();
        for (i, edge) in metapath.edges(self).enumerate() {
            if i == 0 {
                abbreviation.push_str(edge.source().abbreviation());
            }
            abbreviation.push_str(&edge.decorated_abbreviation());
            abbreviation.push_str(edge.target().abbreviation());
        }
        abbreviation
    }

    /// Parses a metapath abbreviation, e.g. `GiGaD`, into a [`MetaPath`]
    ///
    /// # Errors
    ///
    /// [`HetnetError::InvalidMetaPath`] if the abbreviation does not describe a metapath
    pub fn parse_metapath(&self, abbreviation: &str) -> HetnetResult<MetaPath> {
        let mut edges = Vec::new();
        for metanode in self.metanodes() {
            if let Some(rest) = abbreviation.strip_prefix(metanode.abbreviation()) {
                if self.parse_edges(metanode.index(), rest, &mut edges) {
                    return Ok(self.intern(&edges));
                }
            }
        }
        Err(HetnetError::InvalidMetaPath(abbreviation.to_string()))
    }
}

/// Crate-only methods to build and query the `MetaGraph`
impl MetaGraph {
    /// Returns the interned [`MetaPath`] of the edges without checking them
    pub(crate) fn intern(&self, edges: &[MetaEdgeIndex]) -> MetaPath {
        if let Some(metapath) = self
            .metapaths
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(edges)
        {
            return metapath.clone();
        }
        self.metapaths
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(edges.to_vec())
            .or_insert_with(|| MetaPath::new_unchecked(edges))
            .clone()
    }

    /// Returns the number of interned metapaths
    #[cfg(test)]
    pub(crate) fn interned_metapaths(&self) -> usize {
        self.metapaths
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns the [`MetaEdgeIndex`] of the metaedge from `source` to `target`
    pub(crate) fn metaedge_between(
        &self,
        source: MetaNodeIndex,
        target: MetaNodeIndex,
        kind: &str,
        direction: Direction,
    ) -> Option<MetaEdgeIndex> {
        self.metaedge_by_key(&MetaEdgeKey {
            source,
            target,
            kind: kind.to_string(),
            direction,
        })
    }

    fn metaedge_by_key(&self, key: &MetaEdgeKey) -> Option<MetaEdgeIndex> {
        self.metaedge_lookup.get(key).copied()
    }

    fn add_metanode(&mut self, kind: &str) -> HetnetResult<MetaNodeIndex> {
        if kind.is_empty() {
            return Err(HetnetError::InvalidKind(
                "metanode kinds must not be empty".to_string(),
            ));
        }
        if let Some(idx) = self.metanode_lookup.get(kind) {
            return Ok(*idx);
        }
        let idx = MetaNodeIndex(self.metanodes.len());
        self.metanodes.push(MetaNodeInternal {
            kind: kind.to_string(),
            abbreviation: String::new(),
            edges: Vec::with_capacity(DEFAULT_NUM_METAEDGES),
        });
        self.metanode_lookup.insert(kind.to_string(), idx);
        Ok(idx)
    }

    fn add_metaedge(
        &mut self,
        source_kind: &str,
        target_kind: &str,
        kind: &str,
        direction: Direction,
    ) -> HetnetResult<MetaEdgeIndex> {
        if kind.is_empty() {
            return Err(HetnetError::InvalidKind(
                "metaedge kinds must not be empty".to_string(),
            ));
        }
        let source = self.add_metanode(source_kind)?;
        let target = self.add_metanode(target_kind)?;

        let key = MetaEdgeKey {
            source,
            target,
            kind: kind.to_string(),
            direction,
        };
        if self.metaedge_lookup.contains_key(&key) {
            return Err(HetnetError::DuplicateMetaEdge(format!(
                "({source_kind}, {target_kind}, {kind}, {direction})"
            )));
        }

        let idx = MetaEdgeIndex(self.metaedges.len());
        let self_inverse = source == target && direction == Direction::Both;
        let inverse_idx = if self_inverse {
            idx
        } else {
            MetaEdgeIndex(idx.0 + 1)
        };

        self.metaedges.push(MetaEdgeInternal {
            source,
            target,
            kind: kind.to_string(),
            direction,
            inverse: inverse_idx,
            inverted: false,
            abbreviation: String::new(),
        });
        self.metaedge_lookup.insert(key, idx);
        self.metanodes[source.0].edges.push(idx);

        if !self_inverse {
            self.metaedges.push(MetaEdgeInternal {
                source: target,
                target: source,
                kind: kind.to_string(),
                direction: direction.inverse(),
                inverse: idx,
                inverted: true,
                abbreviation: String::new(),
            });
            self.metaedge_lookup.insert(
                MetaEdgeKey {
                    source: target,
                    target: source,
                    kind: kind.to_string(),
                    direction: direction.inverse(),
                },
                inverse_idx,
            );
            self.metanodes[target.0].edges.push(inverse_idx);
        }
        Ok(idx)
    }

    /// Derives the abbreviations of all metanodes and metaedges
    ///
    /// Metanode abbreviations are unique among all metanodes. Metaedge
    /// abbreviations are unique among the metaedge kinds that connect the
    /// same (unordered) pair of metanodes.
    fn assign_abbreviations(&mut self) {
        let kinds: Vec<&str> = self.metanodes.iter().map(|n| n.kind.as_str()).collect();
        let abbreviations = unique_prefixes(&kinds, Case::Upper);
        for (metanode, abbreviation) in self.metanodes.iter_mut().zip(abbreviations) {
            metanode.abbreviation = abbreviation;
        }

        let mut pairs: BTreeMap<(MetaNodeIndex, MetaNodeIndex), Vec<String>> = BTreeMap::new();
        for edge in &self.metaedges {
            let kinds = pairs.entry(unordered(edge.source, edge.target)).or_default();
            if !kinds.contains(&edge.kind) {
                kinds.push(edge.kind.clone());
            }
        }

        let mut lookup: HashMap<(MetaNodeIndex, MetaNodeIndex, String), String> = HashMap::new();
        for (pair, kinds) in pairs {
            let names: Vec<&str> = kinds.iter().map(String::as_str).collect();
            for (kind, abbreviation) in kinds.iter().zip(unique_prefixes(&names, Case::Lower)) {
                lookup.insert((pair.0, pair.1, kind.clone()), abbreviation);
            }
        }

        // a metaedge and its inverse share the abbreviation
        for edge in &mut self.metaedges {
            let (a, b) = unordered(edge.source, edge.target);
            if let Some(abbreviation) = lookup.get(&(a, b, edge.kind.clone())) {
                edge.abbreviation = abbreviation.clone();
            }
        }
    }

    fn parse_edges(&self, node: MetaNodeIndex, rest: &str, edges: &mut Vec<MetaEdgeIndex>) -> bool {
        if rest.is_empty() {
            return !edges.is_empty();
        }
        for idx in &self.metanodes[node.0].edges {
            let edge = self.metaedge(*idx);
            let token = format!(
                "{}{}",
                edge.decorated_abbreviation(),
                edge.target().abbreviation()
            );
            if let Some(next) = rest.strip_prefix(token.as_str()) {
                edges.push(*idx);
                if self.parse_edges(edge.target().index(), next, edges) {
                    return true;
                }
                edges.pop();
            }
        }
        false
    }
}

fn unordered(a: MetaNodeIndex, b: MetaNodeIndex) -> (MetaNodeIndex, MetaNodeIndex) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A node kind of the [`MetaGraph`], e.g. `gene`
#[derive(Debug, Clone, Copy)]
pub struct MetaNode<'a> {
    index: MetaNodeIndex,
    internal: &'a MetaNodeInternal,
    metagraph: &'a MetaGraph,
}

impl<'a> MetaNode<'a> {
    /// Returns the [`MetaNodeIndex`] handle
    pub fn index(&self) -> MetaNodeIndex {
        self.index
    }

    /// Returns the kind, e.g. `gene`
    pub fn kind(&self) -> &'a str {
        &self.internal.kind
    }

    /// Returns the unique abbreviation, e.g. `G`
    pub fn abbreviation(&self) -> &'a str {
        &self.internal.abbreviation
    }

    /// Returns an iterator of all [`MetaEdge`]s that start at this metanode
    pub fn edges(&self) -> impl Iterator<Item = MetaEdge<'a>> + 'a {
        let metagraph = self.metagraph;
        self.internal
            .edges
            .iter()
            .map(move |idx| metagraph.metaedge(*idx))
    }

    pub(crate) fn edge_indices(&self) -> &'a [MetaEdgeIndex] {
        &self.internal.edges
    }
}

impl PartialEq for MetaNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Display for MetaNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind())
    }
}

/// An edge kind of the [`MetaGraph`], e.g. `gene - association - disease`
#[derive(Debug, Clone, Copy)]
pub struct MetaEdge<'a> {
    index: MetaEdgeIndex,
    internal: &'a MetaEdgeInternal,
    metagraph: &'a MetaGraph,
}

impl<'a> MetaEdge<'a> {
    /// Returns the [`MetaEdgeIndex`] handle
    pub fn index(&self) -> MetaEdgeIndex {
        self.index
    }

    /// Returns the kind, e.g. `association`
    pub fn kind(&self) -> &'a str {
        &self.internal.kind
    }

    /// Returns the [`Direction`]
    pub fn direction(&self) -> Direction {
        self.internal.direction
    }

    /// Returns the source [`MetaNode`]
    pub fn source(&self) -> MetaNode<'a> {
        self.metagraph.metanode(self.internal.source)
    }

    /// Returns the target [`MetaNode`]
    pub fn target(&self) -> MetaNode<'a> {
        self.metagraph.metanode(self.internal.target)
    }

    /// Returns the metaedge traversed in the opposite direction
    ///
    /// Undirected self-loops (e.g. `gene - interaction - gene`) are their own inverse
    pub fn inverse(&self) -> MetaEdge<'a> {
        self.metagraph.metaedge(self.internal.inverse)
    }

    /// Returns the [`MetaEdgeIndex`] of the inverse metaedge
    pub fn inverse_index(&self) -> MetaEdgeIndex {
        self.internal.inverse
    }

    /// Returns `true` if the metaedge was created implicitly as the inverse of a declared one
    pub fn inverted(&self) -> bool {
        self.internal.inverted
    }

    /// Returns the abbreviation of the kind, e.g. `a`
    pub fn abbreviation(&self) -> &'a str {
        &self.internal.abbreviation
    }

    /// Returns the abbreviation with direction marker, e.g. `r>`
    pub fn decorated_abbreviation(&self) -> String {
        self.direction().decorate(self.abbreviation())
    }

    /// Returns the full abbreviation including both metanodes, e.g. `GaD`
    pub fn label(&self) -> String {
        format!(
            "{}{}{}",
            self.source().abbreviation(),
            self.decorated_abbreviation(),
            self.target().abbreviation()
        )
    }
}

impl PartialEq for MetaEdge<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Display for MetaEdge<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {} - {} ({})",
            self.source().kind(),
            self.kind(),
            self.target().kind(),
            self.direction()
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn metagraph() -> MetaGraph {
        MetaGraph::from_edge_tuples(&[
            ("gene", "disease", "association", "both"),
            ("gene", "gene", "interaction", "both"),
            ("gene", "gene", "regulation", "forward"),
            ("gene", "tissue", "expression", "both"),
            ("disease", "tissue", "localization", "both"),
        ])
        .unwrap()
    }

    #[test]
    fn inverse_pairs() {
        let mg = metagraph();
        for edge in mg.metaedges() {
            let inverse = edge.inverse();
            assert_eq!(inverse.inverse(), edge);
            assert_eq!(inverse.source(), edge.target());
            assert_eq!(inverse.target(), edge.source());
            assert_eq!(inverse.kind(), edge.kind());
            assert_eq!(inverse.direction(), edge.direction().inverse());
            if inverse == edge {
                assert_eq!(edge.source(), edge.target());
                assert_eq!(edge.direction(), Direction::Both);
            }
        }
        // 4 undirected/directed pairs + one self-inverse
        assert_eq!(mg.metaedges().count(), 9);
    }

    #[test]
    fn unique_abbreviations() {
        let mg = metagraph();
        let mut seen: Vec<&str> = mg.metanodes().map(|n| n.abbreviation()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 3);

        for a in mg.metaedges() {
            for b in mg.metaedges() {
                if a.kind() != b.kind()
                    && unordered(a.source().index(), a.target().index())
                        == unordered(b.source().index(), b.target().index())
                {
                    assert_ne!(a.abbreviation(), b.abbreviation());
                }
            }
        }
        let interaction = mg.get_metaedge("gene", "gene", "interaction", Direction::Both).unwrap();
        assert_eq!(interaction.abbreviation(), "i");
        let expression = mg.get_metaedge("tissue", "gene", "expression", Direction::Both).unwrap();
        assert_eq!(expression.abbreviation(), "e");
        assert_eq!(expression.label(), "TeG");
    }

    #[test]
    fn colliding_edge_abbreviations() {
        let mg = MetaGraph::from_edge_tuples(&[
            ("gene", "gene", "regulation", "forward"),
            ("gene", "gene", "repression", "both"),
            ("gene", "disease", "risk", "both"),
        ])
        .unwrap();
        let regulation = mg.get_metaedge("gene", "gene", "regulation", Direction::Backward).unwrap();
        assert_eq!(regulation.decorated_abbreviation(), "<reg");
        assert_eq!(regulation.inverse().decorated_abbreviation(), "reg>");
        let repression = mg.get_metaedge("gene", "gene", "repression", Direction::Both).unwrap();
        assert_eq!(repression.abbreviation(), "rep");
        // different node pair, no collision
        let risk = mg.get_metaedge("disease", "gene", "risk", Direction::Both).unwrap();
        assert_eq!(risk.abbreviation(), "r");
    }

    #[test]
    fn schema_errors() {
        assert!(matches!(
            MetaGraph::from_edge_tuples(&[("gene", "", "x", "both")]),
            Err(HetnetError::InvalidKind(_))
        ));
        assert!(matches!(
            MetaGraph::from_edge_tuples(&[("gene", "gene", "", "both")]),
            Err(HetnetError::InvalidKind(_))
        ));
        assert!(matches!(
            MetaGraph::from_edge_tuples(&[
                ("gene", "gene", "regulation", "forward"),
                ("gene", "gene", "regulation", "backward"),
            ]),
            Err(HetnetError::DuplicateMetaEdge(_))
        ));
        assert!(matches!(
            MetaGraph::from_edge_tuples(&[
                ("gene", "disease", "association", "both"),
                ("gene", "disease", "association", "both"),
            ]),
            Err(HetnetError::DuplicateMetaEdge(_))
        ));
    }

    #[test]
    fn lookups() {
        let mg = metagraph();
        assert!(matches!(
            mg.get_metanode("compound"),
            Err(HetnetError::UnknownMetaNode(_))
        ));
        assert!(matches!(
            mg.get_metaedge("gene", "disease", "association", Direction::Forward),
            Err(HetnetError::UnknownMetaEdge(_))
        ));
        let edge = mg
            .get_metaedge("disease", "gene", "association", Direction::Both)
            .unwrap();
        assert!(edge.inverted());
        assert_eq!(edge.to_string(), "disease - association - gene (both)");
    }

    #[test]
    fn extract_metapaths_endpoints() {
        let mg = metagraph();
        for max_length in 0..4 {
            let metapaths = mg.extract_metapaths("gene", "disease", max_length).unwrap();
            if max_length == 0 {
                assert!(metapaths.is_empty());
            }
            for metapath in &metapaths {
                assert_eq!(metapath.source(&mg).kind(), "gene");
                assert_eq!(metapath.target(&mg).kind(), "disease");
                assert!(metapath.len() >= 1 && metapath.len() <= max_length);
            }
            // shorter metapaths come first
            assert!(metapaths.windows(2).all(|w| w[0].len() <= w[1].len()));
        }
    }

    #[test]
    fn extract_metapaths_order() {
        let mg = metagraph();
        let metapaths: Vec<String> = mg
            .extract_metapaths("gene", "disease", 2)
            .unwrap()
            .iter()
            .map(|m| m.abbreviation(&mg))
            .collect();
        assert_eq!(metapaths, vec!["GaD", "GiGaD", "Gr>GaD", "G<rGaD", "GeTlD"]);
    }

    #[test]
    fn metapaths_are_interned() {
        let mg = metagraph();
        let first = mg.extract_metapaths("gene", "disease", 3).unwrap();
        let interned = mg.interned_metapaths();
        let second = mg.extract_metapaths("gene", "disease", 3).unwrap();
        assert_eq!(first, second);
        assert_eq!(mg.interned_metapaths(), interned);
    }

    #[test]
    fn get_metapath_checks_chain() {
        let mg = metagraph();
        let gad = mg.get_metaedge("gene", "disease", "association", Direction::Both).unwrap();
        let gig = mg.get_metaedge("gene", "gene", "interaction", Direction::Both).unwrap();
        assert!(mg.get_metapath(&[gig.index(), gad.index()]).is_ok());
        assert!(matches!(
            mg.get_metapath(&[gad.index(), gig.index()]),
            Err(HetnetError::InvalidMetaPath(_))
        ));
        assert!(matches!(
            mg.get_metapath(&[]),
            Err(HetnetError::InvalidMetaPath(_))
        ));
        assert!(matches!(
            mg.get_metapath(&[MetaEdgeIndex(999)]),
            Err(HetnetError::InvalidMetaPath(_))
        ));
    }

    #[test]
    fn parse_roundtrip() {
        let mg = metagraph();
        for metapath in mg.extract_metapaths("gene", "tissue", 3).unwrap() {
            let abbreviation = metapath.abbreviation(&mg);
            assert_eq!(mg.parse_metapath(&abbreviation).unwrap(), metapath);
        }
        assert!(matches!(
            mg.parse_metapath("GxD"),
            Err(HetnetError::InvalidMetaPath(_))
        ));
        assert!(mg.parse_metapath("G").is_err());
    }

    #[test]
    fn isolated_metanodes() {
        let mg = MetaGraph::from_metanodes_and_edge_tuples(
            &["gene", "disease", "genotype"],
            &[("gene", "disease", "association", "both")],
        )
        .unwrap();
        assert_eq!(mg.metanodes().count(), 3);
        // genotype collides with gene
        assert_eq!(mg.get_metanode("gene").unwrap().abbreviation(), "GENE");
        assert_eq!(mg.get_metanode("genotype").unwrap().abbreviation(), "GENO");
        assert!(mg.extract_metapaths("genotype", "disease", 3).unwrap().is_empty());

        assert!(matches!(
            MetaGraph::from_metanodes_and_edge_tuples(&[""], &[("gene", "disease", "association", "both")]),
            Err(HetnetError::InvalidKind(_))
        ));
    }

    #[test]
    fn tuples_rebuild_identical_metagraph() {
        let mg = metagraph();
        let tuples: Vec<(String, String, String, String)> = mg
            .metaedge_tuples()
            .into_iter()
            .map(|(s, t, k, d)| (s, t, k, d.to_string()))
            .collect();
        assert_eq!(tuples.len(), 5);
        let rebuilt = MetaGraph::from_edge_tuples(tuples.as_slice()).unwrap();
        let labels = |mg: &MetaGraph| mg.metaedges().map(|e| e.label()).collect::<Vec<_>>();
        assert_eq!(labels(&mg), labels(&rebuilt));
    }
}
