use rand::seq::SliceRandom;
use rpgmark_core::errors::{invalid_input, RpgError};
use rpgmark_core::rng::RngHandle;
use rpgmark_core::VertexId;
use serde::{Deserialize, Serialize};

use crate::digraph::Digraph;

/// Simulated attack on a graph in canonical labels.
///
/// Canonical labels put list edges on `l -> l - 1`; every other outgoing edge
/// of a vertex is its tree edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "label")]
pub enum EdgeDamage {
    /// Delete the list edge leaving the vertex with this label.
    DeleteList(u64),
    /// Delete the tree edge leaving the vertex with this label.
    DeleteTree(u64),
    /// Reverse the order of the vertex's outgoing references.
    Flip(u64),
}

impl EdgeDamage {
    /// Label of the vertex the damage applies to.
    pub fn label(&self) -> u64 {
        match self {
            EdgeDamage::DeleteList(label)
            | EdgeDamage::DeleteTree(label)
            | EdgeDamage::Flip(label) => *label,
        }
    }
}

impl std::fmt::Display for EdgeDamage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeDamage::DeleteList(label) => write!(f, "delete-list({label})"),
            EdgeDamage::DeleteTree(label) => write!(f, "delete-tree({label})"),
            EdgeDamage::Flip(label) => write!(f, "flip({label})"),
        }
    }
}

/// Applies one damage step in place.
pub fn apply_damage(graph: &mut Digraph, damage: EdgeDamage) -> Result<(), RpgError> {
    let vertex = VertexId::from_raw(damage.label());
    if !graph.contains_vertex(vertex) {
        return Err(invalid_input("label-out-of-range", "no vertex carries this label")
            .with_context("damage", damage)
            .with_context("vertices", graph.vertex_count()));
    }
    match damage {
        EdgeDamage::DeleteList(_) => {
            let edge = list_target(vertex).and_then(|target| graph.find_edge(vertex, target));
            let edge = edge.ok_or_else(|| missing_edge(damage))?;
            graph.remove_edge(edge)?;
        }
        EdgeDamage::DeleteTree(_) => {
            let list = list_target(vertex);
            let target = graph
                .successors(vertex)?
                .into_iter()
                .find(|target| Some(*target) != list)
                .ok_or_else(|| missing_edge(damage))?;
            graph.remove_edge_between(vertex, target)?;
        }
        EdgeDamage::Flip(_) => graph.reverse_out_order(vertex)?,
    }
    Ok(())
}

/// Applies a sequence of damage steps in order.
pub fn apply_all(graph: &mut Digraph, damages: &[EdgeDamage]) -> Result<(), RpgError> {
    for damage in damages {
        apply_damage(graph, *damage)?;
    }
    Ok(())
}

/// Draws one edge deletion uniformly over the alive edges.
pub fn sample_deletion(graph: &Digraph, rng: &mut RngHandle) -> Option<EdgeDamage> {
    let edges = graph.edges();
    let (source, target) = edges[rng.index_below(edges.len())?];
    if list_target(source) == Some(target) {
        Some(EdgeDamage::DeleteList(source.as_raw()))
    } else {
        Some(EdgeDamage::DeleteTree(source.as_raw()))
    }
}

/// Copies the graph under a random vertex permutation with shuffled edge order.
///
/// Returns the copy and the permutation (`permutation[old] == new`), which lets
/// tests check that recovery does not depend on the ids an observer assigns.
pub fn shuffle_labels(
    graph: &Digraph,
    rng: &mut RngHandle,
) -> Result<(Digraph, Vec<VertexId>), RpgError> {
    let mut permutation: Vec<VertexId> = graph.vertices().collect();
    permutation.shuffle(rng);
    let mut edges = graph.edges();
    edges.shuffle(rng);
    let mut shuffled = Digraph::with_vertices(graph.vertex_count(), graph.config().clone());
    for (source, target) in edges {
        shuffled.add_edge(
            permutation[source.as_raw() as usize],
            permutation[target.as_raw() as usize],
        )?;
    }
    Ok((shuffled, permutation))
}

fn list_target(vertex: VertexId) -> Option<VertexId> {
    vertex.as_raw().checked_sub(1).map(VertexId::from_raw)
}

fn missing_edge(damage: EdgeDamage) -> RpgError {
    invalid_input("no-such-edge", "the vertex has no edge of that kind")
        .with_context("damage", damage)
}
