use std::collections::{BTreeMap, BTreeSet};

use rpgmark_core::errors::{invalid_input, not_an_rpg, unrepairable, RpgError};
use rpgmark_core::VertexId;
use rpgmark_graph::Digraph;
use serde::{Deserialize, Serialize};

use crate::permutation::decode_sip_to_w;

/// Which canonical decoder turns a graph back into a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Sum over the root's children. Works with one tree edge missing.
    #[default]
    Bento,
    /// Full permutation inversion. Needs every tree edge.
    Chroni,
    /// Run both and require agreement.
    CrossCheck,
}

/// Bento parameter `n_B = (V - 3) / 2` of a labeled graph with `V` vertices.
///
/// Fails unless `V` is odd and at least 5.
pub fn bento_parameter(vertex_count: usize) -> Result<usize, RpgError> {
    if vertex_count < 5 || vertex_count % 2 == 0 {
        return Err(invalid_input("vertex-count", "a labeled RPG has an odd count of at least 5")
            .with_context("vertices", vertex_count));
    }
    Ok((vertex_count - 3) / 2)
}

/// Watermark from the root's children in Bento labels.
///
/// Every child `c <= 2n_B` contributes `2^(2n_B - c)`; the child `2n_B + 1`
/// contributes nothing. A child outside the LARGE range `(n_B, 2n_B + 1]`
/// means the graph is not an RPG. So does a missing `2n_B + 1` or a missing
/// `n_B + 1`, which carries the most significant bit of every `n_B`-bit value.
pub fn bento_value(root_children: &BTreeSet<u64>, n_b: usize) -> Result<u64, RpgError> {
    if n_b == 0 || n_b > u64::BITS as usize {
        return Err(invalid_input("bento-parameter", "n_B must be in 1..=64")
            .with_context("n_b", n_b));
    }
    let n = n_b as u64;
    let mut value = 0u64;
    for child in root_children.iter().copied() {
        if child <= n || child > 2 * n + 1 {
            return Err(not_an_rpg("root-child-outside-large", "root child is not a LARGE vertex")
                .with_context("child", child)
                .with_context("n_b", n_b));
        }
        if child <= 2 * n {
            value |= 1u64 << (2 * n - child);
        }
    }
    for required in [n + 1, 2 * n + 1] {
        if !root_children.contains(&required) {
            return Err(not_an_rpg("missing-msb-child", "root lacks a child every RPG of this size has")
                .with_context("child", required)
                .with_context("n_b", n_b));
        }
    }
    Ok(value)
}

/// Bento decoding of an unbroken graph in Bento labels.
///
/// The graph must be labeled `0..=2n_B + 2` with the root at `2n_B + 2`; its
/// children are the sources of the tree edges pointing at it.
pub fn decode_bento(graph: &Digraph) -> Result<u64, RpgError> {
    let n_b = bento_parameter(graph.vertex_count())?;
    let root = VertexId::from_raw(graph.vertex_count() as u64 - 1);
    let children: BTreeSet<u64> = graph
        .predecessors(root)?
        .into_iter()
        .map(|vertex| vertex.as_raw())
        .collect();
    bento_value(&children, n_b)
}

/// Chroni-Nikolopoulos decoding of an unbroken graph in Bento labels.
///
/// Strips the list edges (`i -> i - 1`), reverses the tree edges and walks the
/// resulting tree in preorder from the root with children ascending. Dropping
/// the root and shifting every label down by one yields the SIP.
pub fn decode_chroni(graph: &Digraph) -> Result<u64, RpgError> {
    bento_parameter(graph.vertex_count())?;
    let root = graph.vertex_count() as u64 - 1;
    let mut children: BTreeMap<u64, BTreeSet<u64>> = BTreeMap::new();
    let mut parents: BTreeMap<u64, u64> = BTreeMap::new();
    for (source, target) in graph.edges() {
        let (source, target) = (source.as_raw(), target.as_raw());
        if source == target + 1 {
            continue;
        }
        if source == 0 || target <= source || parents.insert(source, target).is_some() {
            return Err(not_an_rpg("malformed-tree-edge", "tree edges must point up from body vertices")
                .with_context("source", source)
                .with_context("target", target));
        }
        children.entry(target).or_default().insert(source);
    }
    if parents.len() != graph.vertex_count() - 2 {
        return Err(unrepairable(
            "tree-edge-missing",
            "permutation inversion needs every tree edge",
        )
        .with_context("tree_edges", parents.len())
        .with_context("expected", graph.vertex_count() - 2)
        .with_hint("decode with the bento strategy"));
    }

    let mut preorder = Vec::with_capacity(graph.vertex_count());
    let mut stack = vec![root];
    while let Some(vertex) = stack.pop() {
        preorder.push(vertex);
        if let Some(kids) = children.get(&vertex) {
            stack.extend(kids.iter().rev().copied());
        }
    }
    if preorder.len() != graph.vertex_count() - 1 {
        return Err(not_an_rpg("tree-not-spanning", "tree edges do not span the body")
            .with_context("reached", preorder.len()));
    }
    let sip: Vec<usize> = preorder[1..]
        .iter()
        .map(|label| (*label - 1) as usize)
        .collect();
    decode_sip_to_w(&sip)
}

/// Decodes an unbroken graph in Bento labels with the given strategy.
pub fn decode_with(graph: &Digraph, strategy: Strategy) -> Result<u64, RpgError> {
    match strategy {
        Strategy::Bento => decode_bento(graph),
        Strategy::Chroni => decode_chroni(graph),
        Strategy::CrossCheck => {
            let bento = decode_bento(graph)?;
            let chroni = decode_chroni(graph)?;
            if bento != chroni {
                return Err(not_an_rpg("decoder-disagreement", "decoders disagree")
                    .with_context("bento", bento)
                    .with_context("chroni", chroni));
            }
            Ok(bento)
        }
    }
}
