use std::collections::BTreeSet;

use rpgmark_core::errors::{graph_error, RpgError};
use rpgmark_core::{EdgeId, VertexId};

use crate::flags::DigraphConfig;

#[derive(Debug, Clone)]
pub(crate) struct VertexRecord {
    in_edges: BTreeSet<EdgeId>,
    out_edges: BTreeSet<EdgeId>,
}

impl VertexRecord {
    fn new() -> Self {
        Self {
            in_edges: BTreeSet::new(),
            out_edges: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EdgeRecord {
    alive: bool,
    source: VertexId,
    target: VertexId,
}

/// Arena-backed directed graph with stable vertex and edge identifiers.
///
/// Vertices are dense indices `0..vertex_count()`. Edges live in slots that
/// are never reused: removing an edge marks its slot dead, so edge ids grow
/// monotonically and adjacency iteration follows insertion order.
#[derive(Debug, Clone)]
pub struct Digraph {
    config: DigraphConfig,
    vertices: Vec<VertexRecord>,
    edges: Vec<EdgeRecord>,
    signatures: BTreeSet<(VertexId, VertexId)>,
}

impl Digraph {
    /// Creates an empty graph with the provided configuration.
    pub fn new(config: DigraphConfig) -> Self {
        Self {
            config,
            vertices: Vec::new(),
            edges: Vec::new(),
            signatures: BTreeSet::new(),
        }
    }

    /// Creates a graph holding `count` isolated vertices.
    pub fn with_vertices(count: usize, config: DigraphConfig) -> Self {
        let mut graph = Self::new(config);
        graph.vertices = (0..count).map(|_| VertexRecord::new()).collect();
        graph
    }

    /// Returns the configuration used by this graph.
    pub fn config(&self) -> &DigraphConfig {
        &self.config
    }

    /// Appends a new isolated vertex.
    pub fn add_vertex(&mut self) -> VertexId {
        let id = VertexId::from_raw(self.vertices.len() as u64);
        self.vertices.push(VertexRecord::new());
        id
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of alive edges.
    pub fn edge_count(&self) -> usize {
        self.signatures.len()
    }

    /// Whether the identifier names a vertex of this graph.
    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        (vertex.as_raw() as usize) < self.vertices.len()
    }

    /// Returns all vertex identifiers in ascending order.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(|idx| VertexId::from_raw(idx as u64))
    }

    /// Returns all alive edge identifiers in insertion order.
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.alive)
            .map(|(idx, _)| EdgeId::from_raw(idx as u64))
            .collect()
    }

    /// Returns the `(source, target)` pair of every alive edge in insertion order.
    pub fn edges(&self) -> Vec<(VertexId, VertexId)> {
        self.edges
            .iter()
            .filter(|edge| edge.alive)
            .map(|edge| (edge.source, edge.target))
            .collect()
    }

    /// Returns the endpoints of an alive edge.
    pub fn endpoints(&self, edge: EdgeId) -> Result<(VertexId, VertexId), RpgError> {
        let record = self.edge(edge)?;
        Ok((record.source, record.target))
    }

    /// Returns the inbound degree of a vertex.
    pub fn in_degree(&self, vertex: VertexId) -> Result<usize, RpgError> {
        Ok(self.vertex(vertex)?.in_edges.len())
    }

    /// Returns the outbound degree of a vertex.
    pub fn out_degree(&self, vertex: VertexId) -> Result<usize, RpgError> {
        Ok(self.vertex(vertex)?.out_edges.len())
    }

    /// Returns the targets of a vertex's outgoing edges in insertion order.
    pub fn successors(&self, vertex: VertexId) -> Result<Vec<VertexId>, RpgError> {
        let record = self.vertex(vertex)?;
        Ok(record
            .out_edges
            .iter()
            .map(|edge| self.edges[edge.as_raw() as usize].target)
            .collect())
    }

    /// Returns the sources of a vertex's incoming edges in insertion order.
    pub fn predecessors(&self, vertex: VertexId) -> Result<Vec<VertexId>, RpgError> {
        let record = self.vertex(vertex)?;
        Ok(record
            .in_edges
            .iter()
            .map(|edge| self.edges[edge.as_raw() as usize].source)
            .collect())
    }

    /// Returns the outgoing edge identifiers of a vertex in insertion order.
    pub fn outgoing_edges(&self, vertex: VertexId) -> Result<Vec<EdgeId>, RpgError> {
        Ok(self.vertex(vertex)?.out_edges.iter().copied().collect())
    }

    /// Whether the edge `source -> target` exists.
    pub fn contains_edge(&self, source: VertexId, target: VertexId) -> bool {
        self.signatures.contains(&(source, target))
    }

    /// Looks up the identifier of the edge `source -> target`.
    pub fn find_edge(&self, source: VertexId, target: VertexId) -> Option<EdgeId> {
        if !self.contains_edge(source, target) {
            return None;
        }
        self.vertices
            .get(source.as_raw() as usize)?
            .out_edges
            .iter()
            .copied()
            .find(|edge| self.edges[edge.as_raw() as usize].target == target)
    }

    /// Inserts the edge `source -> target` after validating the configured invariants.
    pub fn add_edge(&mut self, source: VertexId, target: VertexId) -> Result<EdgeId, RpgError> {
        let out_degree = self.vertex(source)?.out_edges.len();
        self.vertex(target)?;
        if source == target && !self.config.allow_self_loops {
            return Err(graph_error("self-loop", "self loops are disabled")
                .with_context("vertex", source));
        }
        if let Some(cap) = self.config.max_out_degree {
            if out_degree + 1 > cap {
                return Err(graph_error(
                    "out-degree-cap",
                    "outbound degree cap would be exceeded",
                )
                .with_context("vertex", source)
                .with_context("cap", cap)
                .with_context("attempted", out_degree + 1));
            }
        }
        if self.contains_edge(source, target) {
            return Err(graph_error("duplicate-edge", "edge already exists")
                .with_context("source", source)
                .with_context("target", target));
        }
        let id = EdgeId::from_raw(self.edges.len() as u64);
        self.edges.push(EdgeRecord {
            alive: true,
            source,
            target,
        });
        self.vertex_mut(source)?.out_edges.insert(id);
        self.vertex_mut(target)?.in_edges.insert(id);
        self.signatures.insert((source, target));
        Ok(id)
    }

    /// Removes an alive edge, leaving its slot dead.
    pub fn remove_edge(&mut self, edge: EdgeId) -> Result<(VertexId, VertexId), RpgError> {
        let record = self
            .edges
            .get_mut(edge.as_raw() as usize)
            .filter(|record| record.alive)
            .ok_or_else(|| {
                graph_error("unknown-edge", "edge does not exist").with_context("edge", edge.as_raw())
            })?;
        record.alive = false;
        let (source, target) = (record.source, record.target);
        self.signatures.remove(&(source, target));
        self.vertex_mut(source)?.out_edges.remove(&edge);
        self.vertex_mut(target)?.in_edges.remove(&edge);
        Ok((source, target))
    }

    /// Removes the edge `source -> target`.
    pub fn remove_edge_between(
        &mut self,
        source: VertexId,
        target: VertexId,
    ) -> Result<EdgeId, RpgError> {
        let edge = self.find_edge(source, target).ok_or_else(|| {
            graph_error("unknown-edge", "edge does not exist")
                .with_context("source", source)
                .with_context("target", target)
        })?;
        self.remove_edge(edge)?;
        Ok(edge)
    }

    /// Reverses the iteration order of a vertex's outgoing edges.
    ///
    /// The edges are re-inserted in reverse order, so they receive fresh ids
    /// and the previous slots are left dead.
    pub fn reverse_out_order(&mut self, vertex: VertexId) -> Result<(), RpgError> {
        let targets = self.successors(vertex)?;
        for edge in self.outgoing_edges(vertex)? {
            self.remove_edge(edge)?;
        }
        for target in targets.into_iter().rev() {
            self.add_edge(vertex, target)?;
        }
        Ok(())
    }

    /// Smallest and largest out-degree over all vertices.
    pub fn out_degree_bounds(&self) -> Option<(usize, usize)> {
        let degrees = self.vertices.iter().map(|v| v.out_edges.len());
        let min = degrees.clone().min()?;
        let max = degrees.max()?;
        Some((min, max))
    }

    /// Returns every edge slot, alive or dead, for serialization.
    pub(crate) fn edge_slots(&self) -> Vec<(bool, VertexId, VertexId)> {
        self.edges
            .iter()
            .map(|edge| (edge.alive, edge.source, edge.target))
            .collect()
    }

    pub(crate) fn push_dead_edge(&mut self, source: VertexId, target: VertexId) {
        self.edges.push(EdgeRecord {
            alive: false,
            source,
            target,
        });
    }

    fn vertex(&self, id: VertexId) -> Result<&VertexRecord, RpgError> {
        self.vertices
            .get(id.as_raw() as usize)
            .ok_or_else(|| unknown_vertex(id))
    }

    fn vertex_mut(&mut self, id: VertexId) -> Result<&mut VertexRecord, RpgError> {
        self.vertices
            .get_mut(id.as_raw() as usize)
            .ok_or_else(|| unknown_vertex(id))
    }

    fn edge(&self, id: EdgeId) -> Result<&EdgeRecord, RpgError> {
        self.edges
            .get(id.as_raw() as usize)
            .filter(|record| record.alive)
            .ok_or_else(|| {
                graph_error("unknown-edge", "edge does not exist").with_context("edge", id.as_raw())
            })
    }
}

impl Default for Digraph {
    fn default() -> Self {
        Self::new(DigraphConfig::default())
    }
}

fn unknown_vertex(id: VertexId) -> RpgError {
    graph_error("unknown-vertex", "vertex does not exist").with_context("vertex", id)
}

