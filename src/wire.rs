//! Ingest of graph data in the JSON format produced by profilers.
//!
//! The format is a list of nodes and a list of edges:
//!
//! ```json
//! {
//!   "nodes": [{ "id": "main", "samples": 10 }, { "id": 2 }],
//!   "edges": [{ "source": "main", "target": 2, "weight": 3 }]
//! }
//! ```
//!
//! Node identities can be strings or numbers and are normalized to strings.
//! Edge endpoints are read from `source`/`target` or, for older feeds, from
//! `sourceID`/`targetID`. All node fields except `id` are kept as the vertex
//! payload. Edges are directed unless they say otherwise and weigh
//! [`DEFAULT_WEIGHT`] unless a weight is given.
//!
//! # Examples
//!
//! ```
//! let json = r#"{
//!     "nodes": [{ "id": 1, "name": "main" }, { "id": 2, "name": "parse" }],
//!     "edges": [{ "sourceID": 1, "targetID": 2 }]
//! }"#;
//!
//! let graph = callmap::wire::from_json(json).unwrap();
//!
//! assert_eq!(graph.vertex_count(), 2);
//! assert_eq!(graph.vertex(&"1".to_string()).unwrap()["name"], "main");
//! assert_eq!(graph.edge_weight(&"1".to_string(), &"2".to_string()), Some(1.0));
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::{
    core::{AddEdgeError, DuplicateKeyError},
    graph::{Graph, DEFAULT_WEIGHT},
};

/// The error encountered when ingesting graph data.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed graph data: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    DuplicateKey(#[from] DuplicateKeyError<String>),

    #[error(transparent)]
    AddEdge(#[from] AddEdgeError<String>),
}

/// Graph data as received from the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    #[serde(deserialize_with = "identity")]
    pub id: String,
    /// Remaining fields of the node.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    #[serde(alias = "sourceID", deserialize_with = "identity")]
    pub source: String,
    #[serde(alias = "targetID", deserialize_with = "identity")]
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directed: Option<bool>,
}

impl GraphData {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the graph, adding nodes and then edges in the order of the
    /// lists. Fails on the first duplicate node or dangling edge.
    pub fn into_graph(self) -> Result<Graph<String, Value>, Error> {
        let mut graph = Graph::with_capacity(self.nodes.len(), self.edges.len());

        for node in self.nodes {
            graph
                .add_vertex(node.id, Value::Object(node.attributes))
                .map_err(DuplicateKeyError::into_key)?;
        }

        for edge in self.edges {
            graph.add_edge(
                &edge.source,
                &edge.target,
                edge.weight.unwrap_or(DEFAULT_WEIGHT),
                edge.directed.unwrap_or(true),
            )?;
        }

        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "graph data ingested"
        );

        Ok(graph)
    }
}

/// Parses graph data and builds the graph in one go.
pub fn from_json(json: &str) -> Result<Graph<String, Value>, Error> {
    GraphData::from_json(json)?.into_graph()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Identity {
    Text(String),
    Number(serde_json::Number),
}

fn identity<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Identity::deserialize(deserializer)? {
        Identity::Text(text) => text,
        Identity::Number(number) => number.to_string(),
    })
}
