//! Degree preserving randomization of a [`Graph`]
//!
//! Permuted graphs keep every node and, per metaedge, the degree of every
//! node, but connect the nodes at random. Statistics computed on permuted
//! graphs form the null distribution of a statistic, see [`crate::stats`].

use std::collections::{BTreeMap, HashSet};

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::metagraph::MetaEdgeIndex;
use crate::{Data, Graph, HetnetError, HetnetResult, NodeIndex, DEFAULT_PERMUTATION_ATTEMPTS};

/// Settings of [`permute_graph`]
///
/// # Examples
///
/// ```
/// use hetnet::PermutationConfig;
///
/// let config = PermutationConfig::new(42).max_attempts(10);
/// assert_eq!(config.seed(), 42);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PermutationConfig {
    seed: u64,
    max_attempts: usize,
}

impl Default for PermutationConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

impl PermutationConfig {
    /// Constructs a config with the seed and the default number of attempts
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            max_attempts: DEFAULT_PERMUTATION_ATTEMPTS,
        }
    }

    /// Number of attempts to rewire a single metaedge before giving up
    #[must_use]
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Returns the seed
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of attempts per metaedge
    pub fn attempts(&self) -> usize {
        self.max_attempts
    }
}

/// Returns a randomized copy of `graph` that preserves all degrees
///
/// The permuted graph shares the [`MetaGraph`](crate::MetaGraph) and has
/// the same nodes (ids, kinds, payloads and [`NodeIndex`]es). Its edges are
/// rewired independently for every metaedge: each source node draws as many
/// distinct targets as it had before, weighted by the targets' remaining degree.
///
/// Self loops are kept unchanged, including parallel ones. Permuted edges
/// have no payload and no node or edge is masked. Each source draws distinct
/// targets, so rewired edges are never parallel.
///
/// # Errors
///
/// [`HetnetError::PermutationInfeasible`] if a metaedge cannot be rewired
/// within the configured number of attempts. Another seed may succeed.
///
/// # Examples
///
/// ```
/// use hetnet::{permute_graph, Data, Direction, Graph, MetaGraph, PermutationConfig};
///
/// let metagraph = MetaGraph::from_edge_tuples(&[
///     ("gene", "disease", "association", "both"),
/// ]).unwrap();
/// let mut graph = Graph::new(metagraph);
/// for gene in ["IL17", "BRCA1", "TP53"] {
///     graph.add_node(gene, "gene", Data::new()).unwrap();
/// }
/// for disease in ["MS", "T2D"] {
///     graph.add_node(disease, "disease", Data::new()).unwrap();
/// }
/// graph.add_edge("IL17", "MS", "association", "both", Data::new()).unwrap();
/// graph.add_edge("BRCA1", "T2D", "association", "both", Data::new()).unwrap();
/// graph.add_edge("TP53", "T2D", "association", "both", Data::new()).unwrap();
///
/// let permuted = permute_graph(&graph, &PermutationConfig::new(7)).unwrap();
///
/// let association = graph
///     .metagraph()
///     .get_metaedge("gene", "disease", "association", Direction::Both)
///     .unwrap()
///     .index();
/// assert_eq!(permuted.edge_count(), 3);
/// assert_eq!(
///     permuted.degree_sequence(association),
///     graph.degree_sequence(association),
/// );
/// ```
pub fn permute_graph(graph: &Graph, config: &PermutationConfig) -> HetnetResult<Graph> {
    let mut permuted = Graph::with_metagraph(graph.shared_metagraph());
    for node in graph.nodes() {
        permuted.copy_node(&node)?;
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    for (metaedge, pairs) in declared_edges(graph) {
        let edge = graph.metagraph().metaedge(metaedge);
        let self_inverse = edge.inverse_index() == metaedge;

        let (loops, pairs): (Vec<_>, Vec<_>) =
            pairs.into_iter().partition(|edge| edge.source == edge.target);
        let pairs: Vec<(NodeIndex, NodeIndex)> =
            pairs.iter().map(|edge| (edge.source, edge.target)).collect();
        let rewired = rewire(&pairs, self_inverse, config.max_attempts, &mut rng).ok_or_else(|| {
            HetnetError::PermutationInfeasible {
                seed: config.seed,
                metaedge: edge.label(),
                attempts: config.max_attempts,
            }
        })?;
        debug!("Rewired {} edges of {}", rewired.len(), edge.label());

        for edge in loops {
            if edge.parallel {
                permuted.add_parallel_edge_between(edge.source, edge.target, metaedge, Data::new())?;
            } else {
                permuted.add_edge_between(edge.source, edge.target, metaedge, Data::new())?;
            }
        }
        for (source, target) in rewired {
            permuted.add_edge_between(source, target, metaedge, Data::new())?;
        }
    }
    info!("Permuted {:?} with seed {}", graph, config.seed);
    Ok(permuted)
}

/// An added edge, oriented along its declared metaedge
struct DeclaredEdge {
    source: NodeIndex,
    target: NodeIndex,
    parallel: bool,
}

/// Returns all added edges, grouped by the declared (not inverted) metaedge
fn declared_edges(graph: &Graph) -> BTreeMap<MetaEdgeIndex, Vec<DeclaredEdge>> {
    let mut edges: BTreeMap<MetaEdgeIndex, Vec<DeclaredEdge>> = BTreeMap::new();
    for edge in graph.edges().filter(|edge| !edge.inverted()) {
        let metaedge = edge.metaedge();
        let (metaedge, source, target) = if metaedge.inverted() {
            (metaedge.inverse_index(), edge.target(), edge.source())
        } else {
            (metaedge.index(), edge.source(), edge.target())
        };
        edges.entry(metaedge).or_default().push(DeclaredEdge {
            source: source.index(),
            target: target.index(),
            parallel: edge.parallel(),
        });
    }
    edges
}

/// Draws new targets for all sources, preserving source and target degrees
///
/// Returns `None` if no attempt succeeded
fn rewire(
    pairs: &[(NodeIndex, NodeIndex)],
    self_inverse: bool,
    max_attempts: usize,
    rng: &mut StdRng,
) -> Option<Vec<(NodeIndex, NodeIndex)>> {
    let mut source_degree: BTreeMap<NodeIndex, usize> = BTreeMap::new();
    let mut target_degree: BTreeMap<NodeIndex, usize> = BTreeMap::new();
    for (source, target) in pairs {
        *source_degree.entry(*source).or_default() += 1;
        *target_degree.entry(*target).or_default() += 1;
    }

    for attempt in 1..=max_attempts {
        if let Some(rewired) = draw(&source_degree, &target_degree, self_inverse, rng) {
            return Some(rewired);
        }
        warn!("Rewiring attempt {attempt} of {max_attempts} failed");
    }
    None
}

fn draw(
    source_degree: &BTreeMap<NodeIndex, usize>,
    target_degree: &BTreeMap<NodeIndex, usize>,
    self_inverse: bool,
    rng: &mut StdRng,
) -> Option<Vec<(NodeIndex, NodeIndex)>> {
    let mut remaining = target_degree.clone();
    let mut created: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();
    let mut rewired = Vec::new();

    for (&source, &degree) in source_degree {
        let (mut candidates, mut weights): (Vec<NodeIndex>, Vec<usize>) = remaining
            .iter()
            .filter(|(target, left)| {
                **left > 0
                    && **target != source
                    && !(self_inverse && created.contains(&(**target, source)))
            })
            .map(|(target, left)| (*target, *left))
            .unzip();
        if candidates.len() < degree {
            return None;
        }

        for _ in 0..degree {
            let idx = WeightedIndex::new(&weights).ok()?.sample(rng);
            let target = candidates.swap_remove(idx);
            weights.swap_remove(idx);
            if let Some(left) = remaining.get_mut(&target) {
                *left -= 1;
            }
            created.insert((source, target));
            rewired.push((source, target));
        }
    }
    Some(rewired)
}
