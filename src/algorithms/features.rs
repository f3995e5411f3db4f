//! Feature records for link prediction
//!
//! A [`FeatureRecord`] holds the path statistics of one (source, target)
//! pair across several metapaths, one column per statistic and metapath,
//! e.g. `DWPC_0.4:GiGaD`.

use serde::Serialize;

use crate::algorithms::{PathCounts, PathStatistic};
use crate::{EdgeIndex, Graph, HetnetResult, MetaPath, NodeIndex, PathOptions};

/// Node payload key that holds the display name of a node
pub const NAME_KEY: &str = "name";

/// A (source, target) pair for which features are computed
///
/// For known positives, the edge between source and target must be
/// excluded, otherwise it leaks into the path counts.
#[derive(Debug, Clone)]
pub struct FeatureQuery {
    source: NodeIndex,
    target: NodeIndex,
    status: String,
    exclude_edges: Vec<EdgeIndex>,
}

impl FeatureQuery {
    /// Constructs a query with an empty status and no excluded edges
    pub fn new(source: NodeIndex, target: NodeIndex) -> Self {
        Self {
            source,
            target,
            status: String::new(),
            exclude_edges: Vec::new(),
        }
    }

    /// Sets the status label, e.g. `1` for known positives
    #[must_use]
    pub fn status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    /// Excludes the edge (and its inverse) from all path searches of this query
    #[must_use]
    pub fn exclude_edge(mut self, edge: EdgeIndex) -> Self {
        self.exclude_edges.push(edge);
        self
    }

    /// Returns the source node
    pub fn source(&self) -> NodeIndex {
        self.source
    }

    /// Returns the target node
    pub fn target(&self) -> NodeIndex {
        self.target
    }
}

/// A single named value of a [`FeatureRecord`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    column: String,
    value: Option<f64>,
}

impl Feature {
    /// Returns the column name, `<statistic>:<metapath>`
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Returns the value, `None` if the statistic is undefined
    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

/// All features of one (source, target) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    source: String,
    target: String,
    target_name: Option<String>,
    status: String,
    values: Vec<Feature>,
}

impl FeatureRecord {
    /// Returns the id of the source node
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the id of the target node
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the display name of the target node, if its payload has one
    pub fn target_name(&self) -> Option<&str> {
        self.target_name.as_deref()
    }

    /// Returns the status label of the query
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns all features, grouped by metapath
    pub fn values(&self) -> &[Feature] {
        &self.values
    }

    /// Returns the value of the column
    ///
    /// `None` if the column does not exist, `Some(None)` if the value is undefined
    pub fn get(&self, column: &str) -> Option<Option<f64>> {
        self.values
            .iter()
            .find(|feature| feature.column == column)
            .map(|feature| feature.value)
    }

    /// Returns the column names of a delimited table
    pub fn header(&self) -> Vec<String> {
        let mut header: Vec<String> = ["source", "target", "target_name", "status"]
            .iter()
            .map(ToString::to_string)
            .collect();
        header.extend(self.values.iter().map(|feature| feature.column.clone()));
        header
    }

    /// Returns the cells of a delimited table, undefined values are empty
    pub fn row(&self) -> Vec<String> {
        let mut row = vec![
            self.source.clone(),
            self.target.clone(),
            self.target_name.clone().unwrap_or_default(),
            self.status.clone(),
        ];
        row.extend(
            self.values
                .iter()
                .map(|feature| feature.value.map(|v| v.to_string()).unwrap_or_default()),
        );
        row
    }
}

/// Computes every statistic for every metapath of the query
///
/// The edges excluded by the query are added to `options`.
///
/// # Errors
///
/// See [`Graph::paths_from`]
///
/// # Examples
///
/// ```
/// use hetnet::{Direction, Graph, MetaGraph, PathOptions};
/// use hetnet::algorithms::default_statistics;
/// use hetnet::algorithms::features::{compute_features, FeatureQuery};
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
/// let metapaths = graph.metagraph().extract_metapaths("gene", "disease", 2).unwrap();
/// let il17 = graph.node_index("IL17").unwrap();
/// let ms = graph.node_index("MS").unwrap();
/// let known = graph.find_edge("IL17", "MS", "association", Direction::Both).unwrap();
///
/// let query = FeatureQuery::new(il17, ms).status("1").exclude_edge(known.index());
/// let record = compute_features(
///     &graph,
///     &query,
///     &metapaths,
///     &default_statistics(),
///     &PathOptions::default(),
/// ).unwrap();
///
/// assert_eq!(record.get("PC:GaD"), Some(Some(0.0)));
/// assert_eq!(record.get("NPC:GaD"), Some(None));
/// assert_eq!(record.get("PC:GiGaD"), Some(Some(0.0)));
/// ```
pub fn compute_features<S: PathStatistic>(
    graph: &Graph,
    query: &FeatureQuery,
    metapaths: &[MetaPath],
    statistics: &[S],
    options: &PathOptions,
) -> HetnetResult<FeatureRecord> {
    let options = options
        .clone()
        .exclude_edges(query.exclude_edges.iter().copied());
    let source = graph.node(query.source);
    let target = graph.node(query.target);

    let mut values = Vec::with_capacity(metapaths.len() * statistics.len());
    for metapath in metapaths {
        let counts = PathCounts::compute(graph, query.source, query.target, metapath, &options)?;
        let abbreviation = metapath.abbreviation(graph.metagraph());
        for statistic in statistics {
            values.push(Feature {
                column: format!("{}:{abbreviation}", statistic.name()),
                value: statistic.calculate(&counts),
            });
        }
    }

    Ok(FeatureRecord {
        source: source.id().to_string(),
        target: target.id().to_string(),
        target_name: target
            .data()
            .get(NAME_KEY)
            .and_then(|value| value.as_str())
            .map(str::to_string),
        status: query.status.clone(),
        values,
    })
}
