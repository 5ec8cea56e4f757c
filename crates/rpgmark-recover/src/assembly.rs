use std::collections::{BTreeMap, BTreeSet};

use rpgmark_core::errors::RpgError;
use rpgmark_core::{HeapNode, ObservedNode, VertexId};
use rpgmark_graph::{weakly_connected_components, Digraph, DigraphConfig};
use tracing::debug;

/// One weakly connected component of the observed graph.
///
/// The graph is indexed locally (`0..vertex_count`) in ascending order of the
/// observed ids; [`Candidate::observed_id`] maps back.
#[derive(Debug, Clone)]
pub struct Candidate {
    index: usize,
    ids: Vec<VertexId>,
    graph: Digraph,
}

impl Candidate {
    /// Position of the component in assembly order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Observed ids, indexed by local vertex.
    pub fn observed_ids(&self) -> &[VertexId] {
        &self.ids
    }

    /// Observed id of a local vertex.
    pub fn observed_id(&self, local: VertexId) -> Option<VertexId> {
        self.ids.get(local.as_raw() as usize).copied()
    }

    /// Induced graph in local indices.
    pub fn graph(&self) -> &Digraph {
        &self.graph
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.graph.vertex_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the component can possibly be an RPG missing at most one edge.
    ///
    /// Requires at least `max(4, min_vertices)` vertices and
    /// `2V - 4 <= E <= 2V - 2`.
    pub fn is_plausible(&self, min_vertices: usize) -> bool {
        let v = self.vertex_count();
        let e = self.edge_count();
        v >= min_vertices.max(4) && e + 4 >= 2 * v && e + 2 <= 2 * v
    }
}

/// Builds the induced graph over `nodes` and splits it into weak components.
///
/// References to ids outside the observed set are dropped; a repeated id
/// keeps its first occurrence. Components come out in ascending order of their
/// smallest observed id.
pub fn assemble<N: ObservedNode>(nodes: &[N]) -> Result<Vec<Candidate>, RpgError> {
    let mut first: BTreeMap<VertexId, &N> = BTreeMap::new();
    for node in nodes {
        if first.contains_key(&node.id()) {
            debug!(id = %node.id(), "duplicate observed node ignored");
            continue;
        }
        first.insert(node.id(), node);
    }

    let index: BTreeMap<VertexId, VertexId> = first
        .keys()
        .enumerate()
        .map(|(idx, id)| (*id, VertexId::from_raw(idx as u64)))
        .collect();
    let ids: Vec<VertexId> = first.keys().copied().collect();

    let mut whole = Digraph::with_vertices(ids.len(), DigraphConfig::observed());
    for (id, node) in &first {
        let source = index[id];
        for target_id in node.outgoing_refs() {
            let Some(target) = index.get(&target_id).copied() else {
                debug!(source = %id, target = %target_id, "dangling reference dropped");
                continue;
            };
            if whole.contains_edge(source, target) {
                debug!(source = %id, target = %target_id, "repeated reference dropped");
                continue;
            }
            whole.add_edge(source, target)?;
        }
    }

    let mut components = weakly_connected_components(&whole)?;
    for component in &mut components {
        component.sort();
    }
    components.sort_by_key(|component| component.first().copied());

    components
        .into_iter()
        .enumerate()
        .map(|(position, component)| induced(&whole, &ids, position, &component))
        .collect()
}

/// Assembles `nodes` and keeps the plausible components.
pub fn candidates<N: ObservedNode>(
    nodes: &[N],
    min_vertices: usize,
) -> Result<Vec<Candidate>, RpgError> {
    Ok(assemble(nodes)?
        .into_iter()
        .filter(|candidate| {
            let keep = candidate.is_plausible(min_vertices);
            if !keep {
                debug!(
                    candidate = candidate.index(),
                    vertices = candidate.vertex_count(),
                    edges = candidate.edge_count(),
                    "component discarded before repair"
                );
            }
            keep
        })
        .collect())
}

/// Observed view of a graph: one node per vertex, refs in adjacency order.
pub fn nodes_from_graph(graph: &Digraph) -> Result<Vec<HeapNode>, RpgError> {
    graph
        .vertices()
        .map(|vertex| {
            let refs = graph.successors(vertex)?;
            Ok(HeapNode {
                id: vertex,
                refs,
            })
        })
        .collect()
}

fn induced(
    whole: &Digraph,
    ids: &[VertexId],
    position: usize,
    component: &[VertexId],
) -> Result<Candidate, RpgError> {
    let members: BTreeSet<VertexId> = component.iter().copied().collect();
    let local: BTreeMap<VertexId, VertexId> = component
        .iter()
        .enumerate()
        .map(|(idx, vertex)| (*vertex, VertexId::from_raw(idx as u64)))
        .collect();
    let mut graph = Digraph::with_vertices(component.len(), DigraphConfig::observed());
    for vertex in component {
        for target in whole.successors(*vertex)? {
            if members.contains(&target) {
                graph.add_edge(local[vertex], local[&target])?;
            }
        }
    }
    Ok(Candidate {
        index: position,
        ids: component
            .iter()
            .map(|vertex| ids[vertex.as_raw() as usize])
            .collect(),
        graph,
    })
}
