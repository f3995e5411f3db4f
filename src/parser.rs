//! Reading and writing a [`Graph`] as JSON
//!
//! The document holds the metagraph as a list of metaedge tuples and the
//! nodes and edges in the order they were added:
//!
//! ```json
//! {
//!   "metanode_kinds": ["gene", "disease"],
//!   "metaedge_tuples": [["gene", "disease", "association", "both"]],
//!   "nodes": [
//!     {"id": "IL17", "kind": "gene", "data": {"name": "interleukin 17"}},
//!     {"id": "MS", "kind": "disease", "data": {}}
//!   ],
//!   "edges": [
//!     {"source_id": "MS", "target_id": "IL17", "kind": "association", "direction": "both", "data": {}}
//!   ]
//! }
//! ```
//!
//! Masks are not part of the document. Metanode kinds without any metaedge
//! are kept. Float payloads must be finite, JSON has no NaN or infinity.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Data, Direction, Graph, HetnetError, HetnetResult, MetaGraph};

/// A node of a [`GraphDocument`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node id
    pub id: String,
    /// Metanode kind
    pub kind: String,
    /// Payload
    #[serde(default)]
    pub data: Data,
}

/// An edge of a [`GraphDocument`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Id of the source node
    pub source_id: String,
    /// Id of the target node
    pub target_id: String,
    /// Metaedge kind
    pub kind: String,
    /// Direction from source to target
    pub direction: Direction,
    /// Payload
    #[serde(default)]
    pub data: Data,
    /// `true` for edges added via [`Graph::add_parallel_edge`]
    #[serde(default, skip_serializing_if = "is_false")]
    pub parallel: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// Serializable representation of a [`Graph`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// All metanode kinds
    pub metanode_kinds: Vec<String>,
    /// `(source_kind, target_kind, kind, direction)` of all declared metaedges
    pub metaedge_tuples: Vec<(String, String, String, Direction)>,
    /// All nodes, in insertion order
    pub nodes: Vec<NodeRecord>,
    /// All added edges (without their implicit inverses), in insertion order
    pub edges: Vec<EdgeRecord>,
}

/// Persistence
impl Graph {
    /// Returns the [`GraphDocument`] of the graph
    pub fn to_document(&self) -> GraphDocument {
        let metagraph = self.metagraph();
        GraphDocument {
            metanode_kinds: metagraph
                .metanodes()
                .map(|metanode| metanode.kind().to_string())
                .collect(),
            metaedge_tuples: metagraph.metaedge_tuples(),
            nodes: self
                .nodes()
                .map(|node| NodeRecord {
                    id: node.id().to_string(),
                    kind: node.kind().to_string(),
                    data: node.data().clone(),
                })
                .collect(),
            edges: self
                .edges()
                .filter(|edge| !edge.inverted())
                .map(|edge| EdgeRecord {
                    source_id: edge.source().id().to_string(),
                    target_id: edge.target().id().to_string(),
                    kind: edge.metaedge().kind().to_string(),
                    direction: edge.metaedge().direction(),
                    data: edge.data().clone(),
                    parallel: edge.parallel(),
                })
                .collect(),
        }
    }

    /// Builds a graph from a [`GraphDocument`]
    ///
    /// # Errors
    ///
    /// Any error of [`MetaGraph::from_metanodes_and_edge_tuples`], [`Graph::add_node`]
    /// or [`Graph::add_edge`]
    pub fn from_document(document: &GraphDocument) -> HetnetResult<Self> {
        let tuples: Vec<(&str, &str, &str, &str)> = document
            .metaedge_tuples
            .iter()
            .map(|(source, target, kind, direction)| {
                (source.as_str(), target.as_str(), kind.as_str(), direction.as_str())
            })
            .collect();
        let metagraph = MetaGraph::from_metanodes_and_edge_tuples(
            document.metanode_kinds.as_slice(),
            tuples.as_slice(),
        )?;

        let mut graph = Graph::new(metagraph);
        for node in &document.nodes {
            graph.add_node(&node.id, &node.kind, node.data.clone())?;
        }
        for edge in &document.edges {
            if edge.parallel {
                graph.add_parallel_edge(
                    &edge.source_id,
                    &edge.target_id,
                    &edge.kind,
                    edge.direction.as_str(),
                    edge.data.clone(),
                )?;
            } else {
                graph.add_edge(
                    &edge.source_id,
                    &edge.target_id,
                    &edge.kind,
                    edge.direction.as_str(),
                    edge.data.clone(),
                )?;
            }
        }
        debug!("Built {:?} from document", graph);
        Ok(graph)
    }

    /// Writes the graph as JSON
    ///
    /// # Errors
    ///
    /// [`HetnetError::InvalidJson`] if writing fails or a payload holds a
    /// non-finite float
    pub fn write_json<W: Write>(&self, writer: W) -> HetnetResult<()> {
        serde_json::to_writer(writer, &self.to_document())?;
        Ok(())
    }

    /// Reads a graph from JSON
    ///
    /// # Errors
    ///
    /// - [`HetnetError::InvalidJson`] if the document is malformed
    /// - see [`Graph::from_document`]
    ///
    /// # Examples
    ///
    /// ```
    /// use hetnet::Graph;
    ///
    /// let json = r#"{
    ///     "metanode_kinds": ["gene", "disease"],
    ///     "metaedge_tuples": [["gene", "disease", "association", "both"]],
    ///     "nodes": [
    ///         {"id": "IL17", "kind": "gene", "data": {"name": "interleukin 17"}},
    ///         {"id": "MS", "kind": "disease"}
    ///     ],
    ///     "edges": [
    ///         {"source_id": "MS", "target_id": "IL17", "kind": "association", "direction": "both"}
    ///     ]
    /// }"#;
    ///
    /// let graph = Graph::read_json(json.as_bytes()).unwrap();
    /// assert_eq!(graph.len(), 2);
    /// assert_eq!(graph.edge_count(), 1);
    ///
    /// let il17 = graph.node_by_id("IL17").unwrap();
    /// assert_eq!(il17.data()["name"].as_str(), Some("interleukin 17"));
    /// ```
    pub fn read_json<R: Read>(reader: R) -> HetnetResult<Self> {
        let document: GraphDocument = serde_json::from_reader(reader)?;
        Self::from_document(&document)
    }

    /// Writes the graph as JSON file
    ///
    /// # Errors
    ///
    /// - [`HetnetError::CannotOpenFile`] if the file cannot be created
    /// - [`HetnetError::InvalidJson`] if writing fails
    pub fn to_json_file<P: AsRef<std::path::Path>>(&self, path: P) -> HetnetResult<()> {
        let file = File::create(path.as_ref()).map_err(|_| {
            HetnetError::CannotOpenFile(format!("unable to create {}", path.as_ref().display()))
        })?;
        let mut writer = BufWriter::new(file);
        self.write_json(&mut writer)?;
        writer.flush().map_err(|_| {
            HetnetError::CannotOpenFile(format!("unable to write to {}", path.as_ref().display()))
        })
    }

    /// Reads a graph from a JSON file
    ///
    /// # Errors
    ///
    /// - [`HetnetError::CannotOpenFile`] if the file cannot be opened
    /// - see [`Graph::read_json`]
    pub fn from_json_file<P: AsRef<std::path::Path>>(path: P) -> HetnetResult<Self> {
        let file = File::open(path.as_ref()).map_err(|_| {
            HetnetError::CannotOpenFile(format!("unable to open {}", path.as_ref().display()))
        })?;
        Self::read_json(BufReader::new(file))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{PathOptions, Value};

    fn graph() -> Graph {
        let metagraph = MetaGraph::from_edge_tuples(&[
            ("gene", "disease", "association", "both"),
            ("gene", "gene", "interaction", "both"),
            ("gene", "gene", "regulation", "forward"),
        ])
        .unwrap();
        let mut graph = Graph::new(metagraph);
        let name = Data::from([("name".to_string(), Value::from("interleukin 17"))]);
        graph.add_node("IL17", "gene", name).unwrap();
        graph.add_node("BRCA1", "gene", Data::new()).unwrap();
        graph.add_node("MS", "disease", Data::new()).unwrap();
        let score = Data::from([
            ("score".to_string(), Value::from(0.8)),
            ("evidence".to_string(), Value::from(3)),
            ("curated".to_string(), Value::from(true)),
        ]);
        graph.add_edge("MS", "IL17", "association", "both", score).unwrap();
        graph.add_edge("IL17", "BRCA1", "interaction", "both", Data::new()).unwrap();
        graph.add_edge("BRCA1", "IL17", "regulation", "backward", Data::new()).unwrap();
        graph
            .add_parallel_edge("IL17", "BRCA1", "interaction", "both", Data::new())
            .unwrap();
        graph
    }

    #[test]
    fn round_trip() {
        let g = graph();
        let mut buffer = Vec::new();
        g.write_json(&mut buffer).unwrap();
        let restored = Graph::read_json(buffer.as_slice()).unwrap();

        assert_eq!(restored.to_document(), g.to_document());
        assert_eq!(restored.len(), g.len());
        assert_eq!(restored.edge_count(), g.edge_count());

        let edge = restored.find_edge("IL17", "MS", "association", Direction::Both).unwrap();
        assert_eq!(edge.data()["score"].as_f64(), Some(0.8));
        assert_eq!(edge.data()["evidence"].as_i64(), Some(3));
        assert_eq!(edge.data()["curated"].as_bool(), Some(true));

        let metapath = restored.metagraph().parse_metapath("GiGaD").unwrap();
        let brca1 = restored.node_index("BRCA1").unwrap();
        // two parallel interactions between BRCA1 and IL17
        assert_eq!(
            restored.paths_from(brca1, &metapath, &PathOptions::default()).unwrap().len(),
            2
        );
    }

    #[test]
    fn document_shape() {
        let g = graph();
        let mut buffer = Vec::new();
        g.write_json(&mut buffer).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(json["metanode_kinds"], serde_json::json!(["gene", "disease"]));
        assert_eq!(
            json["metaedge_tuples"][0],
            serde_json::json!(["gene", "disease", "association", "both"])
        );
        assert_eq!(json["nodes"][0]["id"], "IL17");
        assert_eq!(json["edges"][0]["source_id"], "MS");
        assert_eq!(json["edges"][0]["direction"], "both");
        assert_eq!(json["edges"][2]["direction"], "backward");
        assert!(json["edges"][0].get("parallel").is_none());
        assert_eq!(json["edges"][3]["parallel"], true);
    }

    #[test]
    fn invalid_documents() {
        let bad_direction = r#"{"metanode_kinds": [], "metaedge_tuples": [["gene", "disease", "association", "upwards"]], "nodes": [], "edges": []}"#;
        assert!(matches!(
            Graph::read_json(bad_direction.as_bytes()),
            Err(HetnetError::InvalidJson(_))
        ));

        let unknown_kind = r#"{"metanode_kinds": ["gene", "disease"], "metaedge_tuples": [["gene", "disease", "association", "both"]], "nodes": [{"id": "aspirin", "kind": "compound"}], "edges": []}"#;
        assert!(matches!(
            Graph::read_json(unknown_kind.as_bytes()),
            Err(HetnetError::UnknownMetaNode(_))
        ));

        let missing_node = r#"{"metanode_kinds": ["gene", "disease"], "metaedge_tuples": [["gene", "disease", "association", "both"]], "nodes": [{"id": "IL17", "kind": "gene"}], "edges": [{"source_id": "IL17", "target_id": "MS", "kind": "association", "direction": "both"}]}"#;
        assert!(matches!(
            Graph::read_json(missing_node.as_bytes()),
            Err(HetnetError::NodeDoesNotExist(_))
        ));

        assert!(matches!(
            Graph::read_json("{".as_bytes()),
            Err(HetnetError::InvalidJson(_))
        ));
    }

    #[test]
    fn isolated_metanode_kinds() {
        let json = r#"{"metanode_kinds": ["gene", "disease", "tissue"], "metaedge_tuples": [["gene", "disease", "association", "both"]], "nodes": [{"id": "liver", "kind": "tissue"}], "edges": []}"#;
        let g = Graph::read_json(json.as_bytes()).unwrap();
        assert_eq!(g.metagraph().metanodes().count(), 3);
        assert_eq!(g.node_by_id("liver").unwrap().kind(), "tissue");

        let mut buffer = Vec::new();
        g.write_json(&mut buffer).unwrap();
        let restored = Graph::read_json(buffer.as_slice()).unwrap();
        assert_eq!(restored.to_document(), g.to_document());
    }

    #[test]
    fn non_finite_payloads_are_rejected() {
        let mut g = graph();
        g.add_node("TP53", "gene", Data::from([("score".to_string(), Value::from(f64::NAN))]))
            .unwrap();
        assert!(matches!(
            g.write_json(Vec::new()),
            Err(HetnetError::InvalidJson(_))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            Graph::from_json_file("/this/file/does/not/exist.json"),
            Err(HetnetError::CannotOpenFile(_))
        ));
    }

    #[test]
    fn file_round_trip() {
        let g = graph();
        let path = std::env::temp_dir().join(format!("hetnet-{}.json", std::process::id()));
        g.to_json_file(&path).unwrap();
        let restored = Graph::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(restored.to_document(), g.to_document());
    }
}
