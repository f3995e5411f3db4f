//! Memoized path search
//!
//! Feature generation asks for the paths of the same metapath from many
//! sources and towards many targets. Those queries share sub-problems:
//! the paths that follow the tail of a metapath from an intermediate node.
//! [`PathSearchCache`] solves each sub-problem once and keeps the result
//! until memory gets scarce.
//!
//! The cache never changes query results. It produces exactly the paths
//! of [`Graph::paths_from`], in the same order.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;
use sysinfo::{Pid, System};
use tracing::debug;

use crate::graph::EdgeSequence;
use crate::metagraph::MetaEdgeIndex;
use crate::{
    Graph, HetnetError, HetnetResult, MetaPath, NodeIndex, Path, PathOptions,
    DEFAULT_CACHE_CHECK_PROBABILITY, DEFAULT_EVICT_FRACTION, DEFAULT_MEMORY_CEILING,
};

/// Reports the memory usage of the running process
///
/// This is the seam used by [`PathSearchCache`] to decide when to evict
/// entries. [`ProcessMemory`] asks the operating system.
pub trait MemoryUsage {
    /// Returns the resident memory in bytes, or `None` if unknown
    fn resident_bytes(&mut self) -> Option<u64>;
}

/// Resident memory of the current process, as reported by the OS
pub struct ProcessMemory {
    system: System,
    pid: Option<Pid>,
}

impl Default for ProcessMemory {
    fn default() -> Self {
        Self {
            system: System::new(),
            pid: sysinfo::get_current_pid().ok(),
        }
    }
}

impl MemoryUsage for ProcessMemory {
    fn resident_bytes(&mut self) -> Option<u64> {
        let pid = self.pid?;
        if !self.system.refresh_process(pid) {
            return None;
        }
        self.system.process(pid).map(sysinfo::Process::memory)
    }
}

/// Eviction settings of a [`PathSearchCache`]
///
/// # Examples
///
/// ```
/// use hetnet::CacheConfig;
///
/// let config = CacheConfig::default()
///     .memory_ceiling(8 * 1024 * 1024 * 1024)
///     .seed(42);
/// assert_eq!(config.ceiling(), 8 * 1024 * 1024 * 1024);
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    memory_ceiling: u64,
    check_probability: f64,
    evict_fraction: f64,
    seed: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memory_ceiling: DEFAULT_MEMORY_CEILING,
            check_probability: DEFAULT_CACHE_CHECK_PROBABILITY,
            evict_fraction: DEFAULT_EVICT_FRACTION,
            seed: 0,
        }
    }
}

impl CacheConfig {
    /// Resident memory (in bytes) above which entries are evicted
    #[must_use]
    pub fn memory_ceiling(mut self, bytes: u64) -> Self {
        self.memory_ceiling = bytes;
        self
    }

    /// Probability that a cache write is followed by a memory check
    ///
    /// The value is clamped to `0.0..=1.0`
    #[must_use]
    pub fn check_probability(mut self, probability: f64) -> Self {
        self.check_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Share of the least recently used entries removed on each eviction
    ///
    /// The value is clamped to `0.0..=1.0`. At least one entry is always removed.
    #[must_use]
    pub fn evict_fraction(mut self, fraction: f64) -> Self {
        self.evict_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Seed of the RNG that samples the memory checks
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the memory ceiling in bytes
    pub fn ceiling(&self) -> u64 {
        self.memory_ceiling
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    node: NodeIndex,
    metapath: MetaPath,
    respect_masks: bool,
    allow_duplicate_nodes: bool,
}

struct CacheEntry {
    paths: Rc<Vec<EdgeSequence>>,
    stamp: u64,
}

/// An LRU cache of path search results
///
/// The cache stores, for a node and a metapath, all paths from the node
/// that follow the metapath. It is filled recursively: the paths of a
/// metapath are the paths of its first metaedge, each extended by the
/// (cached) paths of the remaining metapath.
///
/// Reading an entry makes it the most recently used one. After a write,
/// the resident memory is checked with a configurable probability, and if
/// it exceeds the ceiling, the least recently used entries are evicted.
///
/// Entries belong to one [`Graph`] and its current masks. Querying a
/// different graph, or the same graph after a mask changed, clears the cache.
/// Excluded nodes and edges of [`PathOptions`] are applied on top of the
/// cached results, so different exclusions share the same entries.
///
/// # Examples
///
/// ```
/// use hetnet::{Graph, MetaGraph, PathOptions, PathSearchCache};
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
/// let mut cache = PathSearchCache::default();
/// let paths = cache.paths_from(&graph, brca1, &metapath, &PathOptions::default()).unwrap();
/// assert_eq!(paths.len(), 1);
/// assert_eq!(paths[0].to_string(), "BRCA1 -> IL17 -> MS");
/// ```
pub struct PathSearchCache<M: MemoryUsage = ProcessMemory> {
    config: CacheConfig,
    probe: M,
    rng: StdRng,
    entries: HashMap<CacheKey, CacheEntry>,
    order: BTreeMap<u64, CacheKey>,
    next_stamp: u64,
    graph: Option<(u64, u64)>,
    hits: usize,
    misses: usize,
}

impl Default for PathSearchCache<ProcessMemory> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl PathSearchCache<ProcessMemory> {
    /// Constructs an empty cache that monitors the memory of the current process
    pub fn new(config: CacheConfig) -> Self {
        Self::with_probe(config, ProcessMemory::default())
    }
}

impl<M: MemoryUsage> PathSearchCache<M> {
    /// Constructs an empty cache that uses `probe` to monitor memory
    pub fn with_probe(config: CacheConfig, probe: M) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            probe,
            entries: HashMap::new(),
            order: BTreeMap::new(),
            next_stamp: 0,
            graph: None,
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of lookups answered from the cache
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Returns the number of lookups that had to be computed
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Removes all entries
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Returns all paths that start at `source` and follow `metapath`
    ///
    /// The result is identical to [`Graph::paths_from`].
    ///
    /// # Errors
    ///
    /// - [`HetnetError::InvalidMetaPath`] if the metapath is empty
    /// - [`HetnetError::NodeDoesNotExist`] if the source handle is out of range
    /// - [`HetnetError::ResourceExhausted`] if there are more paths than allowed
    /// - [`HetnetError::MemoryCeiling`] if memory is above the ceiling and
    ///   there is nothing left to evict
    pub fn paths_from<'g>(
        &mut self,
        graph: &'g Graph,
        source: NodeIndex,
        metapath: &MetaPath,
        options: &PathOptions,
    ) -> HetnetResult<Vec<Path<'g>>> {
        if metapath.is_empty() {
            return Err(HetnetError::InvalidMetaPath(
                "cannot search paths of an empty metapath".to_string(),
            ));
        }
        let node = graph.checked_node(source)?;
        self.sync(graph);

        if node.metanode().index() != metapath.source(graph.metagraph()).index()
            || (options.respects_masks() && node.is_masked())
            || options.excluded_nodes().contains(&source)
        {
            debug!("No paths from {} along {:?}", node.id(), metapath);
            return Ok(Vec::new());
        }

        let paths = self.search(graph, source, metapath.edge_indices(), options)?;
        let result: Vec<Path<'g>> = paths
            .iter()
            .filter(|edges| !excluded(graph, edges, options))
            .map(|edges| Path::new(graph, edges.clone()))
            .collect();
        options.check_limit(result.len())?;
        Ok(result)
    }

    /// Returns all paths from `source` to `target` that follow `metapath`
    ///
    /// # Errors
    ///
    /// See [`PathSearchCache::paths_from`]
    pub fn paths_between<'g>(
        &mut self,
        graph: &'g Graph,
        source: NodeIndex,
        target: NodeIndex,
        metapath: &MetaPath,
        options: &PathOptions,
    ) -> HetnetResult<Vec<Path<'g>>> {
        let mut paths = self.paths_from(graph, source, metapath, options)?;
        paths.retain(|path| path.target().index() == target);
        Ok(paths)
    }

    /// Clears the cache if it holds results of another graph or of other masks
    fn sync(&mut self, graph: &Graph) {
        let state = (graph.uid(), graph.mask_generation());
        if self.graph != Some(state) {
            if !self.entries.is_empty() {
                debug!("Graph or masks changed, clearing {} cached entries", self.len());
            }
            self.clear();
            self.graph = Some(state);
        }
    }

    /// Returns all self-avoiding (unless allowed otherwise) paths from `node`
    /// along `metaedges`, ignoring exclusions
    fn search(
        &mut self,
        graph: &Graph,
        node: NodeIndex,
        metaedges: &[MetaEdgeIndex],
        options: &PathOptions,
    ) -> HetnetResult<Rc<Vec<EdgeSequence>>> {
        let Some((first, rest)) = metaedges.split_first() else {
            return Ok(Rc::new(vec![SmallVec::new()]));
        };

        let key = CacheKey {
            node,
            metapath: graph.metagraph().intern(metaedges),
            respect_masks: options.respects_masks(),
            allow_duplicate_nodes: options.allows_duplicate_nodes(),
        };
        if let Some(paths) = self.get(&key) {
            self.hits += 1;
            return Ok(paths);
        }
        self.misses += 1;

        let mut paths: Vec<EdgeSequence> = Vec::new();
        for &edge in graph.node_internal(node).edges(*first) {
            let internal = graph.edge_internal(edge);
            let target = internal.target();
            if options.respects_masks()
                && (internal.masked() || graph.node_internal(target).masked())
            {
                continue;
            }
            if !options.allows_duplicate_nodes() && target == node {
                continue;
            }
            let suffixes = self.search(graph, target, rest, options)?;
            for suffix in suffixes.iter() {
                if !options.allows_duplicate_nodes()
                    && suffix
                        .iter()
                        .any(|idx| graph.edge_internal(*idx).target() == node)
                {
                    continue;
                }
                let mut edges = EdgeSequence::with_capacity(suffix.len() + 1);
                edges.push(edge);
                edges.extend_from_slice(suffix);
                paths.push(edges);
            }
        }

        let paths = Rc::new(paths);
        self.insert(key, Rc::clone(&paths))?;
        Ok(paths)
    }

    fn get(&mut self, key: &CacheKey) -> Option<Rc<Vec<EdgeSequence>>> {
        let stamp = self.next_stamp;
        let entry = self.entries.get_mut(key)?;
        self.order.remove(&entry.stamp);
        entry.stamp = stamp;
        self.order.insert(stamp, key.clone());
        self.next_stamp += 1;
        Some(Rc::clone(&entry.paths))
    }

    fn insert(&mut self, key: CacheKey, paths: Rc<Vec<EdgeSequence>>) -> HetnetResult<()> {
        if self.rng.gen_bool(self.config.check_probability) {
            self.check_memory()?;
        }
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        self.order.insert(stamp, key.clone());
        if let Some(old) = self.entries.insert(key, CacheEntry { paths, stamp }) {
            self.order.remove(&old.stamp);
        }
        Ok(())
    }

    /// Evicts the least recently used entries if memory is above the ceiling
    fn check_memory(&mut self) -> HetnetResult<()> {
        let Some(used) = self.probe.resident_bytes() else {
            return Ok(());
        };
        if used <= self.config.memory_ceiling {
            return Ok(());
        }
        if self.entries.is_empty() {
            return Err(HetnetError::MemoryCeiling {
                used,
                ceiling: self.config.memory_ceiling,
            });
        }
        let count = evict_count(self.entries.len(), self.config.evict_fraction);
        for _ in 0..count {
            let Some((_, key)) = self.order.pop_first() else {
                break;
            };
            self.entries.remove(&key);
        }
        debug!(
            "Memory usage of {} bytes above ceiling, evicted {} entries",
            used, count
        );
        Ok(())
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn evict_count(len: usize, fraction: f64) -> usize {
    ((len as f64 * fraction).ceil() as usize).clamp(1, len)
}

/// Returns `true` if the path uses an excluded node or edge
fn excluded(graph: &Graph, edges: &[crate::EdgeIndex], options: &PathOptions) -> bool {
    if options.excluded_nodes().is_empty() && options.excluded_edges().is_empty() {
        return false;
    }
    edges.iter().any(|idx| {
        let internal = graph.edge_internal(*idx);
        options.excluded_nodes().contains(&internal.target())
            || options.excluded_edges().contains(idx)
            || options.excluded_edges().contains(&internal.inverse())
    })
}
