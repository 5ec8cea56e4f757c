use rpgmark_core::errors::{invalid_input, RpgError};
use rpgmark_core::VertexId;
use rpgmark_graph::{Digraph, DigraphConfig};

use crate::bits::bit_length;
use crate::permutation::{sip_cycles, sip_from_value};

/// Max-didomination targets of a SIP.
///
/// Monotonic-stack scan: starting from the sentinel `len`, each value pops
/// every smaller value off the stack, records the surviving top as its
/// target and is pushed. Runs in amortized linear time.
pub fn max_didom(sip: &[usize]) -> Vec<usize> {
    let mut targets = vec![0usize; sip.len()];
    let mut stack = Vec::with_capacity(sip.len() + 1);
    stack.push(sip.len());
    for value in sip.iter().copied() {
        while let Some(top) = stack.last().copied() {
            if top >= value {
                break;
            }
            stack.pop();
        }
        if let (Some(slot), Some(top)) = (targets.get_mut(value), stack.last()) {
            *slot = *top;
        }
        stack.push(value);
    }
    targets
}

/// Canonical RPG over vertices `0..=len + 1` for a SIP of length `len`.
///
/// List edges run `i -> i - 1` from the root `len + 1` down to the sink `0`;
/// SIP index `i` contributes the tree edge `i + 1 -> p[i] + 1`.
pub fn build_rpg(sip: &[usize]) -> Result<Digraph, RpgError> {
    if sip.is_empty() {
        return Err(invalid_input("empty-permutation", "permutation is empty"));
    }
    sip_cycles(sip)?;
    let targets = max_didom(sip);
    let len = sip.len();
    let mut graph = Digraph::with_vertices(len + 2, DigraphConfig::default());
    for label in (1..=len + 1).rev() {
        graph.add_edge(vertex(label), vertex(label - 1))?;
    }
    for (idx, target) in targets.iter().enumerate() {
        graph.add_edge(vertex(idx + 1), vertex(target + 1))?;
    }
    Ok(graph)
}

/// A watermark together with its permutation and canonical graph.
#[derive(Debug, Clone)]
pub struct CanonicalRpg {
    value: u64,
    bit_length: usize,
    sip: Vec<usize>,
    graph: Digraph,
}

/// Encodes `w` into its canonical RPG.
pub fn encode(w: u64) -> Result<CanonicalRpg, RpgError> {
    let sip = sip_from_value(w)?;
    let graph = build_rpg(&sip)?;
    Ok(CanonicalRpg {
        value: w,
        bit_length: bit_length(w) as usize,
        sip,
        graph,
    })
}

impl CanonicalRpg {
    /// The encoded watermark.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Bit length `n` of the watermark, also the Bento parameter `n_B`.
    pub fn bit_length(&self) -> usize {
        self.bit_length
    }

    /// The self-inverting permutation, of length `2n + 1`.
    pub fn sip(&self) -> &[usize] {
        &self.sip
    }

    /// The canonical graph.
    pub fn graph(&self) -> &Digraph {
        &self.graph
    }

    /// Consumes the value and returns the graph.
    pub fn into_graph(self) -> Digraph {
        self.graph
    }

    /// Header vertex, label `2n + 2`.
    pub fn root(&self) -> VertexId {
        vertex(self.sip.len() + 1)
    }

    /// Footer vertex, label `0`.
    pub fn sink(&self) -> VertexId {
        vertex(0)
    }

    /// Vertices from root to sink.
    pub fn hamilton_path(&self) -> Vec<VertexId> {
        (0..=self.sip.len() + 1).rev().map(vertex).collect()
    }

    /// Edges along the Hamilton path, root first.
    pub fn list_edges(&self) -> Vec<(VertexId, VertexId)> {
        (1..=self.sip.len() + 1)
            .rev()
            .map(|label| (vertex(label), vertex(label - 1)))
            .collect()
    }

    /// Max-didomination edges, ordered by source label.
    pub fn tree_edges(&self) -> Vec<(VertexId, VertexId)> {
        max_didom(&self.sip)
            .into_iter()
            .enumerate()
            .map(|(idx, target)| (vertex(idx + 1), vertex(target + 1)))
            .collect()
    }
}

/// Splits a Hamilton path into `k` contiguous segments.
///
/// Segment sizes differ by at most one and earlier segments take the extra
/// vertices, so embedders can spread construction over `k` sites.
pub fn split_hamilton_path(
    path: &[VertexId],
    k: usize,
) -> Result<Vec<Vec<VertexId>>, RpgError> {
    if k == 0 || k > path.len() {
        return Err(invalid_input("bad-split-count", "split count must be in 1..=path length")
            .with_context("k", k)
            .with_context("path", path.len()));
    }
    let base = path.len() / k;
    let extra = path.len() % k;
    let mut segments = Vec::with_capacity(k);
    let mut start = 0;
    for segment in 0..k {
        let size = base + usize::from(segment < extra);
        segments.push(path[start..start + size].to_vec());
        start += size;
    }
    Ok(segments)
}

fn vertex(label: usize) -> VertexId {
    VertexId::from_raw(label as u64)
}
