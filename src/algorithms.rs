//! Path count statistics between a source and a target node
//!
//! All statistics are derived from the paths that follow one metapath:
//!
//! - **PC**: number of paths from source to target
//! - **PCs**: number of paths from the source to any node
//! - **PCt**: number of paths of the inverse metapath from the target to any node
//! - **NPC**: `2 * PC / (PCs + PCt)`, undefined if both are 0
//! - **DWPC**: sum of the inverse degree products of all paths, see [`Path::degree_product`]
//!
//! [`PathStatistic`] is the seam for custom statistics; [`StandardStatistic`]
//! implements the ones above.

use tracing::warn;

use crate::pathtools::{MemoryUsage, PathSearchCache};
use crate::{Graph, HetnetError, HetnetResult, MetaPath, NodeIndex, Path, PathOptions};

pub mod features;

/// The paths between a source and a target, together with the number of
/// paths leaving the source and the target
///
/// # Examples
///
/// ```
/// use hetnet::{Graph, MetaGraph, PathCounts, PathOptions};
///
/// let metagraph = MetaGraph::from_edge_tuples(&[
///     ("gene", "disease", "association", "both"),
///     ("gene", "gene", "interaction", "both"),
/// ]).unwrap();
/// let mut graph = Graph::new(metagraph);
/// for gene in ["IL17", "BRCA1", "TP53"] {
///     graph.add_node(gene, "gene", Default::default()).unwrap();
/// }
/// graph.add_node("MS", "disease", Default::default()).unwrap();
/// graph.add_edge("MS", "IL17", "association", "both", Default::default()).unwrap();
/// graph.add_edge("IL17", "BRCA1", "interaction", "both", Default::default()).unwrap();
/// graph.add_edge("IL17", "TP53", "interaction", "both", Default::default()).unwrap();
///
/// let metapath = graph.metagraph().parse_metapath("GiGaD").unwrap();
/// let brca1 = graph.node_index("BRCA1").unwrap();
/// let ms = graph.node_index("MS").unwrap();
///
/// let counts = PathCounts::compute(&graph, brca1, ms, &metapath, &PathOptions::default()).unwrap();
/// assert_eq!(counts.path_count(), 1);
/// assert_eq!(counts.source_count(), 1);
/// // MS -> IL17 -> BRCA1 and MS -> IL17 -> TP53
/// assert_eq!(counts.target_count(), 2);
/// assert_eq!(counts.npc(), Some(2.0 / 3.0));
/// // IL17 interacts with BRCA1 and TP53
/// assert!((counts.dwpc(0.5) - 1.0 / 2.0_f64.sqrt()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct PathCounts<'a> {
    paths: Vec<Path<'a>>,
    source_count: usize,
    target_count: usize,
}

impl<'a> PathCounts<'a> {
    /// Searches all paths needed for the statistics of `source` and `target`
    ///
    /// # Errors
    ///
    /// See [`Graph::paths_from`]
    pub fn compute(
        graph: &'a Graph,
        source: NodeIndex,
        target: NodeIndex,
        metapath: &MetaPath,
        options: &PathOptions,
    ) -> HetnetResult<Self> {
        let from_source = graph.paths_from(source, metapath, options)?;
        let inverse = metapath.inverse(graph.metagraph());
        let target_count = graph.paths_from(target, &inverse, options)?.len();
        Ok(Self::from_source_paths(from_source, target, target_count))
    }

    /// Same as [`PathCounts::compute`], but uses the cache for the path search
    ///
    /// # Errors
    ///
    /// See [`PathSearchCache::paths_from`]
    pub fn compute_cached<M: MemoryUsage>(
        cache: &mut PathSearchCache<M>,
        graph: &'a Graph,
        source: NodeIndex,
        target: NodeIndex,
        metapath: &MetaPath,
        options: &PathOptions,
    ) -> HetnetResult<Self> {
        let from_source = cache.paths_from(graph, source, metapath, options)?;
        let inverse = metapath.inverse(graph.metagraph());
        let target_count = cache.paths_from(graph, target, &inverse, options)?.len();
        Ok(Self::from_source_paths(from_source, target, target_count))
    }

    fn from_source_paths(from_source: Vec<Path<'a>>, target: NodeIndex, target_count: usize) -> Self {
        let source_count = from_source.len();
        let paths = from_source
            .into_iter()
            .filter(|path| path.target().index() == target)
            .collect();
        Self {
            paths,
            source_count,
            target_count,
        }
    }

    /// Returns the paths from source to target
    pub fn paths(&self) -> &[Path<'a>] {
        &self.paths
    }

    /// Returns the number of paths from source to target (PC)
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Returns the number of paths from the source to any node (PCs)
    pub fn source_count(&self) -> usize {
        self.source_count
    }

    /// Returns the number of paths from the target to any node along the inverse metapath (PCt)
    pub fn target_count(&self) -> usize {
        self.target_count
    }

    /// Returns the normalized path count (NPC)
    ///
    /// `None` if neither source nor target have any path
    pub fn npc(&self) -> Option<f64> {
        normalized_path_count(self.path_count(), self.source_count, self.target_count)
    }

    /// Returns the degree-weighted path count (DWPC)
    pub fn dwpc(&self, damping: f64) -> f64 {
        degree_weighted_path_count(&self.paths, damping)
    }
}

/// Returns the number of paths (PC)
pub fn path_count(paths: &[Path]) -> usize {
    paths.len()
}

/// Returns the number of paths that start at `source` (PCs)
///
/// # Errors
///
/// See [`Graph::paths_from`]
pub fn source_path_count(
    graph: &Graph,
    source: NodeIndex,
    metapath: &MetaPath,
    options: &PathOptions,
) -> HetnetResult<usize> {
    Ok(graph.paths_from(source, metapath, options)?.len())
}

/// Returns the number of paths of the inverse metapath that start at `target` (PCt)
///
/// # Errors
///
/// See [`Graph::paths_from`]
pub fn target_path_count(
    graph: &Graph,
    target: NodeIndex,
    metapath: &MetaPath,
    options: &PathOptions,
) -> HetnetResult<usize> {
    let inverse = metapath.inverse(graph.metagraph());
    Ok(graph.paths_from(target, &inverse, options)?.len())
}

/// Returns `2 * pc / (pcs + pct)`, or `None` if `pcs + pct` is 0
#[allow(clippy::cast_precision_loss)]
pub fn normalized_path_count(pc: usize, pcs: usize, pct: usize) -> Option<f64> {
    let denominator = pcs + pct;
    if denominator == 0 {
        return None;
    }
    Some(2.0 * pc as f64 / denominator as f64)
}

/// Returns the sum of the inverse degree products of all paths
///
/// With a `damping` of `0.0`, every degree product is 1 and the DWPC equals the PC.
///
/// Paths that traverse masked edges (only possible if masks are ignored)
/// can have a degree of 0. They do not contribute.
pub fn degree_weighted_path_count(paths: &[Path], damping: f64) -> f64 {
    paths
        .iter()
        .map(|path| path.degree_product(damping))
        .filter(|product| *product > 0.0)
        .map(f64::recip)
        .sum()
}

/// Returns the PC from source to target, after verifying it against the
/// PC of the inverse metapath from target to source
///
/// # Errors
///
/// - [`HetnetError::InvariantViolation`] if both counts differ
/// - everything [`Graph::paths_from`] returns
pub fn checked_path_count(
    graph: &Graph,
    source: NodeIndex,
    target: NodeIndex,
    metapath: &MetaPath,
    options: &PathOptions,
) -> HetnetResult<usize> {
    let forward = graph.paths_between(source, target, metapath, options)?.len();
    let inverse = metapath.inverse(graph.metagraph());
    let backward = graph.paths_between(target, source, &inverse, options)?.len();
    if forward != backward {
        warn!(
            "PC({}, {}) = {forward}, but PC({}, {}) = {backward}",
            graph.node(source),
            graph.node(target),
            graph.node(target),
            graph.node(source)
        );
        return Err(HetnetError::InvariantViolation(format!(
            "path count {forward} from {} to {} along {}, but {backward} in the inverse direction",
            graph.node(source),
            graph.node(target),
            metapath.abbreviation(graph.metagraph())
        )));
    }
    Ok(forward)
}

/// Trait for statistics that are derived from [`PathCounts`]
///
/// `hetnet` comes with the standard path count statistics in
/// [`StandardStatistic`]. Custom statistics implement this trait
/// and can be used for feature generation as well.
pub trait PathStatistic {
    /// Returns the name of the statistic, used as column prefix, e.g. `DWPC_0.4`
    fn name(&self) -> String;

    /// Calculates the statistic, `None` if it is undefined
    fn calculate(&self, counts: &PathCounts) -> Option<f64>;
}

/// The default path count statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StandardStatistic {
    /// PC
    PathCount,
    /// PCs
    SourcePathCount,
    /// PCt
    TargetPathCount,
    /// NPC
    NormalizedPathCount,
    /// DWPC with the damping exponent
    Dwpc(f64),
}

impl PathStatistic for StandardStatistic {
    fn name(&self) -> String {
        match self {
            Self::PathCount => "PC".to_string(),
            Self::SourcePathCount => "PCs".to_string(),
            Self::TargetPathCount => "PCt".to_string(),
            Self::NormalizedPathCount => "NPC".to_string(),
            Self::Dwpc(damping) => format!("DWPC_{damping}"),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn calculate(&self, counts: &PathCounts) -> Option<f64> {
        match self {
            Self::PathCount => Some(counts.path_count() as f64),
            Self::SourcePathCount => Some(counts.source_count() as f64),
            Self::TargetPathCount => Some(counts.target_count() as f64),
            Self::NormalizedPathCount => counts.npc(),
            Self::Dwpc(damping) => Some(counts.dwpc(*damping)),
        }
    }
}

/// Returns PC, PCs, PCt, NPC and DWPC for every damping exponent of
/// [`DEFAULT_DAMPING_EXPONENTS`](crate::DEFAULT_DAMPING_EXPONENTS)
pub fn default_statistics() -> Vec<StandardStatistic> {
    let mut statistics = vec![
        StandardStatistic::PathCount,
        StandardStatistic::SourcePathCount,
        StandardStatistic::TargetPathCount,
        StandardStatistic::NormalizedPathCount,
    ];
    statistics.extend(
        crate::DEFAULT_DAMPING_EXPONENTS
            .iter()
            .map(|damping| StandardStatistic::Dwpc(*damping)),
    );
    statistics
}
