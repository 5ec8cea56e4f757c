use rpgmark_core::errors::{ErrorInfo, RpgError};
use rpgmark_core::provenance::SchemaVersion;
use rpgmark_core::VertexId;
use serde::{Deserialize, Serialize};

use crate::digraph::Digraph;
use crate::flags::DigraphConfig;

/// Bincode payload of the graph, dead edge slots included.
pub fn graph_to_bytes(graph: &Digraph) -> Result<Vec<u8>, RpgError> {
    bincode::serialize(&SerializableGraph::from_graph(graph))
        .map_err(|err| serde_error("serialize-bytes", err))
}

/// Reads a bincode payload written by [`graph_to_bytes`].
pub fn graph_from_bytes(bytes: &[u8]) -> Result<Digraph, RpgError> {
    bincode::deserialize::<SerializableGraph>(bytes)
        .map_err(|err| serde_error("deserialize-bytes", err))?
        .into_graph()
}

/// Pretty-printed JSON payload of the graph.
pub fn graph_to_json(graph: &Digraph) -> Result<String, RpgError> {
    serde_json::to_string_pretty(&SerializableGraph::from_graph(graph))
        .map_err(|err| serde_error("serialize-json", err))
}

/// Reads a JSON payload written by [`graph_to_json`].
pub fn graph_from_json(json: &str) -> Result<Digraph, RpgError> {
    serde_json::from_str::<SerializableGraph>(json)
        .map_err(|err| serde_error("deserialize-json", err))?
        .into_graph()
}

fn serde_error(code: &str, err: impl ToString) -> RpgError {
    RpgError::Serde(
        ErrorInfo::new(code, err.to_string()).with_context("schema", SchemaVersion::CURRENT),
    )
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableGraph {
    config: SerializableConfig,
    vertices: u64,
    edges: Vec<SerializableEdge>,
}

impl SerializableGraph {
    fn from_graph(graph: &Digraph) -> Self {
        let edges = graph
            .edge_slots()
            .into_iter()
            .map(|(alive, source, target)| SerializableEdge {
                alive,
                source: source.as_raw(),
                target: target.as_raw(),
            })
            .collect();
        Self {
            config: SerializableConfig::from_config(graph.config()),
            vertices: graph.vertex_count() as u64,
            edges,
        }
    }

    fn into_graph(self) -> Result<Digraph, RpgError> {
        let supported = SchemaVersion::CURRENT;
        if !supported.reads(&self.config.schema_version) {
            return Err(RpgError::Serde(
                ErrorInfo::new("schema-version", "payload schema is not readable")
                    .with_context("payload", self.config.schema_version)
                    .with_context("supported", supported),
            ));
        }
        let mut graph = Digraph::with_vertices(self.vertices as usize, self.config.into_config());
        for edge in self.edges {
            let source = VertexId::from_raw(edge.source);
            let target = VertexId::from_raw(edge.target);
            if edge.alive {
                graph.add_edge(source, target)?;
            } else {
                graph.push_dead_edge(source, target);
            }
        }
        Ok(graph)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SerializableConfig {
    max_out_degree: Option<usize>,
    #[serde(default)]
    allow_self_loops: bool,
    schema_version: SchemaVersion,
}

impl SerializableConfig {
    fn from_config(config: &DigraphConfig) -> Self {
        Self {
            max_out_degree: config.max_out_degree,
            allow_self_loops: config.allow_self_loops,
            schema_version: config.schema_version,
        }
    }

    fn into_config(self) -> DigraphConfig {
        DigraphConfig {
            max_out_degree: self.max_out_degree,
            allow_self_loops: self.allow_self_loops,
            schema_version: self.schema_version,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SerializableEdge {
    alive: bool,
    source: u64,
    target: u64,
}
