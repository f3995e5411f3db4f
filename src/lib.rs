//! Heterogeneous networks (hetnets) and metapath based path counting
//!
//! A [`MetaGraph`] describes which node kinds exist and which edge kinds
//! connect them. A [`Graph`] holds concrete nodes and edges of those kinds.
//! Between two node kinds, the metagraph enumerates all [`MetaPath`]s up to
//! a given length and the graph enumerates the concrete [`Path`]s that
//! follow a metapath. [`PathCounts`] turns those paths into the PC, NPC and
//! DWPC features used for link prediction.
//!
//! # Examples
//!
//! ```
//! use hetnet::{Graph, MetaGraph, PathCounts, PathOptions};
//!
//! let metagraph = MetaGraph::from_edge_tuples(&[
//!     ("gene", "disease", "association", "both"),
//!     ("gene", "gene", "interaction", "both"),
//! ]).unwrap();
//!
//! let mut graph = Graph::new(metagraph);
//! graph.add_node("IL17", "gene", Default::default()).unwrap();
//! graph.add_node("BRCA1", "gene", Default::default()).unwrap();
//! graph.add_node("MS", "disease", Default::default()).unwrap();
//! graph.add_edge("MS", "IL17", "association", "both", Default::default()).unwrap();
//! graph.add_edge("IL17", "BRCA1", "interaction", "both", Default::default()).unwrap();
//!
//! let metapaths = graph.metagraph().extract_metapaths("gene", "disease", 2).unwrap();
//! assert_eq!(metapaths.len(), 2);
//!
//! let brca1 = graph.node_index("BRCA1").unwrap();
//! let ms = graph.node_index("MS").unwrap();
//! let counts = PathCounts::compute(&graph, brca1, ms, &metapaths[1], &PathOptions::default()).unwrap();
//! assert_eq!(counts.path_count(), 1);
//! assert_eq!(counts.dwpc(0.0), 1.0);
//! ```
use core::fmt::Debug;
use thiserror::Error;

pub mod algorithms;
pub mod graph;
pub mod metagraph;
pub mod parser;
pub mod pathtools;
pub mod permutation;
pub mod stats;

pub use algorithms::PathCounts;
pub use graph::{Data, Edge, EdgeIndex, Graph, Node, NodeIndex, Path, PathOptions, Value};
pub use metagraph::{
    Direction, MetaEdge, MetaEdgeIndex, MetaGraph, MetaNode, MetaNodeIndex, MetaPath,
};
pub use pathtools::{CacheConfig, PathSearchCache};
pub use permutation::{permute_graph, PermutationConfig};

/// Default upper bound of paths a single search may return
///
/// Path counts explode combinatorially with the metapath length. Searches
/// that exceed this bound fail with [`HetnetError::ResourceExhausted`].
pub const DEFAULT_MAX_PATHS: usize = 5_000_000;

/// Default resident memory (in bytes) above which the path cache evicts entries
pub const DEFAULT_MEMORY_CEILING: u64 = 50 * 1024 * 1024 * 1024;

/// Probability that a cache write triggers a memory check
pub const DEFAULT_CACHE_CHECK_PROBABILITY: f64 = 0.05;

/// Share of the oldest cache entries removed on each eviction
pub const DEFAULT_EVICT_FRACTION: f64 = 0.2;

/// Number of attempts to rewire a single metaedge before giving up
pub const DEFAULT_PERMUTATION_ATTEMPTS: usize = 100;

/// Damping exponents of the standard DWPC sweep
pub const DEFAULT_DAMPING_EXPONENTS: [f64; 11] =
    [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];

const DEFAULT_NUM_METAEDGES: usize = 8;

/// Errors of the hetnet engine
///
/// Schema errors are raised while building a [`MetaGraph`], lookup errors
/// when a [`Graph`] or query references something that does not exist.
/// All errors are returned to the caller; nothing is skipped silently.
#[derive(Error, Debug)]
pub enum HetnetError {
    /// The direction is not one of `forward`, `backward` or `both`
    #[error("invalid direction `{0}`, expected `forward`, `backward` or `both`")]
    InvalidDirection(String),
    /// Node or edge kinds must not be empty
    #[error("invalid kind: {0}")]
    InvalidKind(String),
    /// The same metaedge tuple was declared twice
    #[error("metaedge {0} is declared more than once")]
    DuplicateMetaEdge(String),
    /// The metanode kind is not part of the metagraph
    #[error("metanode kind `{0}` does not exist")]
    UnknownMetaNode(String),
    /// The metaedge is not part of the metagraph
    #[error("metaedge {0} does not exist")]
    UnknownMetaEdge(String),
    /// The metaedges do not form a composable chain
    #[error("invalid metapath: {0}")]
    InvalidMetaPath(String),
    /// A node with this id was already added
    #[error("node `{0}` already exists")]
    DuplicateNode(String),
    /// No node with this id exists
    #[error("node `{0}` does not exist")]
    NodeDoesNotExist(String),
    /// The edge was already added, use `Graph::add_parallel_edge` for multigraphs
    #[error("edge {0} already exists")]
    DuplicateEdge(String),
    /// No such edge exists
    #[error("edge {0} does not exist")]
    EdgeDoesNotExist(String),
    /// A structural invariant of the engine does not hold
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    /// A path search produced more paths than allowed
    #[error("path search exceeded the limit of {limit} paths")]
    ResourceExhausted {
        /// The configured bound
        limit: usize,
    },
    /// The process is above the memory ceiling and the cache is already empty
    #[error("memory usage of {used} bytes exceeds the ceiling of {ceiling} bytes")]
    MemoryCeiling {
        /// Resident memory of the process
        used: u64,
        /// Configured ceiling
        ceiling: u64,
    },
    /// The degree sequence could not be rewired with the given seed
    #[error("unable to permute metaedge {metaedge} with seed {seed} after {attempts} attempts")]
    PermutationInfeasible {
        /// Seed of the permutation
        seed: u64,
        /// Abbreviation of the metaedge
        metaedge: String,
        /// Number of attempts
        attempts: usize,
    },
    /// Reading or writing a file failed
    #[error("cannot open file: {0}")]
    CannotOpenFile(String),
    /// The JSON document is malformed
    #[error("invalid JSON document")]
    InvalidJson(#[from] serde_json::Error),
}

/// Shortcut for `Result<T, HetnetError>`
pub type HetnetResult<T> = Result<T, HetnetError>;
