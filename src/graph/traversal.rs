//! Enumeration of the concrete paths that follow a metapath

use std::collections::HashSet;

use smallvec::SmallVec;
use tracing::debug;

use crate::graph::path::EdgeSequence;
use crate::graph::{EdgeIndex, Graph, NodeIndex, Path};
use crate::metagraph::MetaPath;
use crate::{HetnetError, HetnetResult, DEFAULT_MAX_PATHS};

/// Options for path searches
///
/// By default, paths never visit a node twice, masked nodes and edges are
/// not traversed, nothing is excluded and a search may return at most
/// [`DEFAULT_MAX_PATHS`] paths.
///
/// # Examples
///
/// ```
/// use hetnet::PathOptions;
///
/// let options = PathOptions::default()
///     .respect_masks(false)
///     .max_paths(Some(1000));
/// assert!(!options.respects_masks());
/// ```
#[derive(Debug, Clone)]
pub struct PathOptions {
    allow_duplicate_nodes: bool,
    respect_masks: bool,
    exclude_nodes: HashSet<NodeIndex>,
    exclude_edges: HashSet<EdgeIndex>,
    max_paths: Option<usize>,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            allow_duplicate_nodes: false,
            respect_masks: true,
            exclude_nodes: HashSet::new(),
            exclude_edges: HashSet::new(),
            max_paths: Some(DEFAULT_MAX_PATHS),
        }
    }
}

impl PathOptions {
    /// Allow walks that visit the same node more than once
    #[must_use]
    pub fn allow_duplicate_nodes(mut self, allow: bool) -> Self {
        self.allow_duplicate_nodes = allow;
        self
    }

    /// Skip masked nodes and edges (`true`) or ignore masks (`false`)
    #[must_use]
    pub fn respect_masks(mut self, respect: bool) -> Self {
        self.respect_masks = respect;
        self
    }

    /// Never traverse to the node
    #[must_use]
    pub fn exclude_node(mut self, node: NodeIndex) -> Self {
        self.exclude_nodes.insert(node);
        self
    }

    /// Never traverse the edge or its inverse
    #[must_use]
    pub fn exclude_edge(mut self, edge: EdgeIndex) -> Self {
        self.exclude_edges.insert(edge);
        self
    }

    /// Never traverse to any of the nodes
    #[must_use]
    pub fn exclude_nodes<I: IntoIterator<Item = NodeIndex>>(mut self, nodes: I) -> Self {
        self.exclude_nodes.extend(nodes);
        self
    }

    /// Never traverse any of the edges or their inverses
    #[must_use]
    pub fn exclude_edges<I: IntoIterator<Item = EdgeIndex>>(mut self, edges: I) -> Self {
        self.exclude_edges.extend(edges);
        self
    }

    /// Upper bound of paths a search may return, `None` for no bound
    ///
    /// The bound applies to the paths from the source, after exclusions and
    /// before [`Graph::paths_between`] filters by target.
    #[must_use]
    pub fn max_paths(mut self, limit: Option<usize>) -> Self {
        self.max_paths = limit;
        self
    }

    /// Returns `true` if paths may visit a node more than once
    pub fn allows_duplicate_nodes(&self) -> bool {
        self.allow_duplicate_nodes
    }

    /// Returns `true` if masked nodes and edges are skipped
    pub fn respects_masks(&self) -> bool {
        self.respect_masks
    }

    /// Returns the excluded nodes
    pub fn excluded_nodes(&self) -> &HashSet<NodeIndex> {
        &self.exclude_nodes
    }

    /// Returns the excluded edges
    pub fn excluded_edges(&self) -> &HashSet<EdgeIndex> {
        &self.exclude_edges
    }

    /// Returns the bound of paths
    pub fn path_limit(&self) -> Option<usize> {
        self.max_paths
    }

    /// Returns an error if `count` exceeds the bound of paths
    pub(crate) fn check_limit(&self, count: usize) -> HetnetResult<()> {
        match self.max_paths {
            Some(limit) if count > limit => Err(HetnetError::ResourceExhausted { limit }),
            _ => Ok(()),
        }
    }
}

/// Path searches
impl Graph {
    /// Returns all paths that start at `source` and follow `metapath`
    ///
    /// Paths are built breadth-first along the metapath. A candidate edge
    /// is skipped if
    ///
    /// - its target is excluded
    /// - the edge or its inverse is excluded
    /// - masks are respected and the edge or its target is masked
    /// - duplicate nodes are not allowed and the target is already part of the path
    ///
    /// The result is empty if the source is masked (and masks are respected),
    /// excluded or not of the metapath's source kind.
    ///
    /// # Errors
    ///
    /// - [`HetnetError::InvalidMetaPath`] if the metapath is empty
    /// - [`HetnetError::NodeDoesNotExist`] if the source handle is out of range
    /// - [`HetnetError::ResourceExhausted`] if there are more paths than allowed
    ///
    /// # Examples
    ///
    /// ```
    /// use hetnet::{Graph, MetaGraph, PathOptions};
    ///
    /// let metagraph = MetaGraph::from_edge_tuples(&[
    ///     ("gene", "disease", "association", "both"),
    ///     ("gene", "gene", "interaction", "both"),
    /// ]).unwrap();
    /// let mut graph = Graph::new(metagraph);
    /// graph.add_node("IL17", "gene", Default::default()).unwrap();
    /// graph.add_node("BRCA1", "gene", Default::default()).unwrap();
    /// graph.add_node("MS", "disease", Default::default()).unwrap();
    /// graph.add_edge("MS", "IL17", "association", "both", Default::default()).unwrap();
    /// graph.add_edge("IL17", "BRCA1", "interaction", "both", Default::default()).unwrap();
    ///
    /// let metapath = graph.metagraph().parse_metapath("GiGaD").unwrap();
    /// let brca1 = graph.node_index("BRCA1").unwrap();
    ///
    /// let paths = graph.paths_from(brca1, &metapath, &PathOptions::default()).unwrap();
    /// assert_eq!(paths.len(), 1);
    /// assert_eq!(paths[0].to_string(), "BRCA1 -> IL17 -> MS");
    /// ```
    pub fn paths_from(
        &self,
        source: NodeIndex,
        metapath: &MetaPath,
        options: &PathOptions,
    ) -> HetnetResult<Vec<Path<'_>>> {
        if metapath.is_empty() {
            return Err(HetnetError::InvalidMetaPath(
                "cannot search paths of an empty metapath".to_string(),
            ));
        }
        let node = self.checked_node(source)?;
        if node.metanode().index() != metapath.source(self.metagraph()).index() {
            debug!(
                "{} is a {}, but the metapath starts at {}",
                node.id(),
                node.kind(),
                metapath.source(self.metagraph()).kind()
            );
            return Ok(Vec::new());
        }
        if options.respects_masks() && node.is_masked() {
            debug!("Skipping masked source {}", node.id());
            return Ok(Vec::new());
        }
        if options.excluded_nodes().contains(&source) {
            debug!("Skipping excluded source {}", node.id());
            return Ok(Vec::new());
        }

        let mut frontier: Vec<EdgeSequence> = vec![SmallVec::new()];
        for metaedge in metapath.edge_indices() {
            let mut next: Vec<EdgeSequence> = Vec::with_capacity(frontier.len());
            for partial in &frontier {
                let current = partial
                    .last()
                    .map_or(source, |idx| self.edge_internal(*idx).target());
                for &edge in self.node_internal(current).edges(*metaedge) {
                    if !self.traversable(edge, source, partial, options) {
                        continue;
                    }
                    let mut extended = partial.clone();
                    extended.push(edge);
                    next.push(extended);
                }
            }
            frontier = next;
            if frontier.is_empty() {
                break;
            }
        }
        options.check_limit(frontier.len())?;

        Ok(frontier
            .into_iter()
            .map(|edges| Path::new(self, edges))
            .collect())
    }

    /// Returns all paths from `source` to `target` that follow `metapath`
    ///
    /// This is [`Graph::paths_from`], restricted to paths ending at `target`.
    ///
    /// # Errors
    ///
    /// See [`Graph::paths_from`]
    pub fn paths_between(
        &self,
        source: NodeIndex,
        target: NodeIndex,
        metapath: &MetaPath,
        options: &PathOptions,
    ) -> HetnetResult<Vec<Path<'_>>> {
        let mut paths = self.paths_from(source, metapath, options)?;
        paths.retain(|path| path.target().index() == target);
        Ok(paths)
    }

    /// Returns `true` if the search may extend `partial` by `edge`
    pub(crate) fn traversable(
        &self,
        edge: EdgeIndex,
        source: NodeIndex,
        partial: &[EdgeIndex],
        options: &PathOptions,
    ) -> bool {
        let internal = self.edge_internal(edge);
        let target = internal.target();

        if options.excluded_nodes().contains(&target) {
            return false;
        }
        if options.excluded_edges().contains(&edge)
            || options.excluded_edges().contains(&internal.inverse())
        {
            return false;
        }
        if options.respects_masks() && (internal.masked() || self.node_internal(target).masked()) {
            return false;
        }
        if !options.allows_duplicate_nodes()
            && (target == source
                || partial
                    .iter()
                    .any(|idx| self.edge_internal(*idx).target() == target))
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Data, MetaGraph};

    /// Small hetnet of 4 genes and 2 diseases
    ///
    /// ```text
    /// MS --- IL17 --- BRCA1
    ///         |        |
    ///        TP53 --- EGFR --- T2D
    /// ```
    fn graph() -> Graph {
        let metagraph = MetaGraph::from_edge_tuples(&[
            ("gene", "disease", "association", "both"),
            ("gene", "gene", "interaction", "both"),
        ])
        .unwrap();
        let mut graph = Graph::new(metagraph);
        for gene in ["IL17", "BRCA1", "TP53", "EGFR"] {
            graph.add_node(gene, "gene", Data::new()).unwrap();
        }
        for disease in ["MS", "T2D"] {
            graph.add_node(disease, "disease", Data::new()).unwrap();
        }
        graph.add_edge("MS", "IL17", "association", "both", Data::new()).unwrap();
        graph.add_edge("T2D", "EGFR", "association", "both", Data::new()).unwrap();
        for (a, b) in [("IL17", "BRCA1"), ("IL17", "TP53"), ("TP53", "EGFR"), ("BRCA1", "EGFR")] {
            graph.add_edge(a, b, "interaction", "both", Data::new()).unwrap();
        }
        graph
    }

    fn targets(paths: &[Path]) -> Vec<String> {
        let mut ids: Vec<String> = paths.iter().map(|p| p.target().id().to_string()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn single_edge() {
        let g = graph();
        let metapath = g.metagraph().parse_metapath("GiG").unwrap();
        let il17 = g.node_index("IL17").unwrap();
        let paths = g.paths_from(il17, &metapath, &PathOptions::default()).unwrap();
        assert_eq!(targets(&paths), vec!["BRCA1", "TP53"]);
    }

    #[test]
    fn self_avoiding() {
        let g = graph();
        let metapath = g.metagraph().parse_metapath("GiGiGiG").unwrap();
        let il17 = g.node_index("IL17").unwrap();
        let paths = g.paths_from(il17, &metapath, &PathOptions::default()).unwrap();
        // IL17-BRCA1-EGFR-TP53 and IL17-TP53-EGFR-BRCA1
        assert_eq!(paths.len(), 2);
        for path in &paths {
            let mut nodes = path.node_indices();
            let n = nodes.len();
            nodes.sort();
            nodes.dedup();
            assert_eq!(nodes.len(), n);
        }
    }

    #[test]
    fn duplicate_nodes_allowed() {
        let g = graph();
        let metapath = g.metagraph().parse_metapath("GiGiG").unwrap();
        let il17 = g.node_index("IL17").unwrap();
        let strict = g.paths_from(il17, &metapath, &PathOptions::default()).unwrap();
        let walks = g
            .paths_from(il17, &metapath, &PathOptions::default().allow_duplicate_nodes(true))
            .unwrap();
        assert_eq!(targets(&strict), vec!["EGFR", "EGFR"]);
        // walks may return to IL17
        assert_eq!(walks.len(), 4);
        assert_eq!(
            walks.iter().filter(|p| p.target().id() == "IL17").count(),
            2
        );
    }

    #[test]
    fn paths_between_filters_target() {
        let g = graph();
        let metapath = g.metagraph().parse_metapath("GiGiGaD").unwrap();
        let il17 = g.node_index("IL17").unwrap();
        let t2d = g.node_index("T2D").unwrap();
        let ms = g.node_index("MS").unwrap();
        let options = PathOptions::default();
        assert_eq!(g.paths_between(il17, t2d, &metapath, &options).unwrap().len(), 2);
        assert!(g.paths_between(il17, ms, &metapath, &options).unwrap().is_empty());
    }

    #[test]
    fn inverse_metapath_yields_same_paths() {
        let g = graph();
        let metapath = g.metagraph().parse_metapath("GiGiGaD").unwrap();
        let inverse = metapath.inverse(g.metagraph());
        let options = PathOptions::default();
        for source in g.nodes().filter(|n| n.kind() == "gene") {
            for target in g.nodes().filter(|n| n.kind() == "disease") {
                let forward = g
                    .paths_between(source.index(), target.index(), &metapath, &options)
                    .unwrap();
                let mut backward: Vec<Path> = g
                    .paths_between(target.index(), source.index(), &inverse, &options)
                    .unwrap()
                    .iter()
                    .map(Path::inverse)
                    .collect();
                assert_eq!(forward.len(), backward.len());
                for path in &forward {
                    let pos = backward.iter().position(|other| other == path).unwrap();
                    backward.remove(pos);
                }
            }
        }
    }

    #[test]
    fn excluded_edge_blocks_both_directions() {
        let g = graph();
        let metapath = g.metagraph().parse_metapath("GiGaD").unwrap();
        let brca1 = g.node_index("BRCA1").unwrap();
        let ms = g.node_index("MS").unwrap();
        let association = g
            .find_edge("MS", "IL17", "association", crate::Direction::Both)
            .unwrap()
            .index();

        // the search traverses IL17 -> MS, the inverse of the excluded edge
        let options = PathOptions::default().exclude_edge(association);
        assert!(g.paths_between(brca1, ms, &metapath, &options).unwrap().is_empty());
        assert_eq!(
            g.paths_between(brca1, ms, &metapath, &PathOptions::default())
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn excluded_nodes() {
        let g = graph();
        let metapath = g.metagraph().parse_metapath("GiGiGaD").unwrap();
        let il17 = g.node_index("IL17").unwrap();
        let tp53 = g.node_index("TP53").unwrap();
        let options = PathOptions::default().exclude_node(tp53);
        let paths = g.paths_from(il17, &metapath, &options).unwrap();
        assert_eq!(paths.len(), 1);
        assert!(!paths[0].contains_node(tp53));

        let options = PathOptions::default().exclude_node(il17);
        assert!(g.paths_from(il17, &metapath, &options).unwrap().is_empty());
    }

    #[test]
    fn masks() {
        let mut g = graph();
        let metapath = g.metagraph().parse_metapath("GiGiGaD").unwrap();
        let il17 = g.node_index("IL17").unwrap();
        let egfr = g.node_index("EGFR").unwrap();

        g.mask_node(egfr);
        assert!(g.paths_from(il17, &metapath, &PathOptions::default()).unwrap().is_empty());
        let unmasked = g
            .paths_from(il17, &metapath, &PathOptions::default().respect_masks(false))
            .unwrap();
        assert_eq!(unmasked.len(), 2);
        assert!(unmasked.iter().all(Path::is_masked));

        g.unmask();
        g.mask_node(il17);
        assert!(g.paths_from(il17, &metapath, &PathOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn wrong_source_kind() {
        let g = graph();
        let metapath = g.metagraph().parse_metapath("GaD").unwrap();
        let ms = g.node_index("MS").unwrap();
        assert!(g.paths_from(ms, &metapath, &PathOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn path_limit() {
        let g = graph();
        let metapath = g.metagraph().parse_metapath("GiGiG").unwrap();
        let il17 = g.node_index("IL17").unwrap();
        let options = PathOptions::default().max_paths(Some(1));
        assert!(matches!(
            g.paths_from(il17, &metapath, &options),
            Err(HetnetError::ResourceExhausted { limit: 1 })
        ));
        let options = PathOptions::default().max_paths(None);
        assert_eq!(g.paths_from(il17, &metapath, &options).unwrap().len(), 2);
        let options = PathOptions::default().max_paths(Some(2));
        assert_eq!(g.paths_from(il17, &metapath, &options).unwrap().len(), 2);
    }

    #[test]
    fn path_limit_counts_returned_paths() {
        let g = graph();
        let il17 = g.node_index("IL17").unwrap();
        let brca1 = g.node_index("BRCA1").unwrap();
        // two partial paths, but neither BRCA1 nor TP53 is associated with a disease
        let metapath = g.metagraph().parse_metapath("GiGaD").unwrap();
        let options = PathOptions::default().max_paths(Some(0));
        assert!(g.paths_from(il17, &metapath, &options).unwrap().is_empty());

        // excluded paths do not count
        let metapath = g.metagraph().parse_metapath("GiGiG").unwrap();
        let options = PathOptions::default().max_paths(Some(1)).exclude_node(brca1);
        let paths = g.paths_from(il17, &metapath, &options).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].to_string(), "IL17 -> TP53 -> EGFR");
    }

    #[test]
    fn foreign_source_handle() {
        let g = graph();
        let mut larger = graph();
        let foreign = larger.add_node("APOE", "gene", Data::new()).unwrap();
        let metapath = g.metagraph().parse_metapath("GiG").unwrap();
        assert!(matches!(
            g.paths_from(foreign, &metapath, &PathOptions::default()),
            Err(HetnetError::NodeDoesNotExist(_))
        ));
    }
}
