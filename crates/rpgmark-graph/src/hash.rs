use std::collections::BTreeMap;

use rpgmark_core::errors::{invalid_input, RpgError};
use rpgmark_core::VertexId;
use sha2::{Digest, Sha256};

use crate::digraph::Digraph;

/// Fingerprint of a watermark graph that ignores vertex identities.
///
/// Vertices are relabeled by their position along `path` (first vertex gets the
/// highest label, the last gets `0`), so two observations of the same
/// watermark hash identically whatever ids the observer handed out. `path`
/// must list every vertex exactly once.
pub fn canonical_hash(graph: &Digraph, path: &[VertexId]) -> Result<String, RpgError> {
    if path.len() != graph.vertex_count() {
        return Err(invalid_input("path-not-spanning", "path must cover every vertex")
            .with_context("vertices", graph.vertex_count())
            .with_context("path", path.len()));
    }
    let mut labels = BTreeMap::new();
    for (position, vertex) in path.iter().enumerate() {
        let label = (path.len() - 1 - position) as u64;
        if !graph.contains_vertex(*vertex) || labels.insert(*vertex, label).is_some() {
            return Err(invalid_input("path-not-spanning", "path repeats or leaves the graph")
                .with_context("vertex", vertex));
        }
    }

    let mut edges: Vec<(u64, u64)> = graph
        .edges()
        .into_iter()
        .map(|(source, target)| (labels[&source], labels[&target]))
        .collect();
    edges.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update(b"rpgmark:rpg");
    hasher.update((path.len() as u64).to_le_bytes());
    update_edges(&edges, &mut hasher);
    Ok(format!("{:x}", hasher.finalize()))
}

fn update_edges(edges: &[(u64, u64)], hasher: &mut Sha256) {
    hasher.update((edges.len() as u64).to_le_bytes());
    for (source, target) in edges {
        hasher.update(source.to_le_bytes());
        hasher.update(target.to_le_bytes());
    }
}
