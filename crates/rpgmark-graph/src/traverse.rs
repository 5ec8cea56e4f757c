use std::collections::BTreeSet;

use rpgmark_core::errors::RpgError;
use rpgmark_core::VertexId;

use crate::digraph::Digraph;

/// Edge orientation followed by a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Follow edges from source to target.
    Forward,
    /// Follow edges from target to source.
    Reverse,
    /// Follow edges in both directions.
    Undirected,
}

/// Depth-first preorder from `start`.
///
/// Neighbours are explored in adjacency (insertion) order; undirected
/// traversals visit successors before predecessors. The walk is iterative so
/// long Hamilton paths cannot exhaust the stack.
pub fn dfs_preorder(
    graph: &Digraph,
    start: VertexId,
    direction: Direction,
) -> Result<Vec<VertexId>, RpgError> {
    let mut seen = BTreeSet::new();
    let mut order = Vec::new();
    let mut stack = vec![(neighbours(graph, start, direction)?, 0usize)];
    seen.insert(start);
    order.push(start);
    while let Some((adjacent, cursor)) = stack.last_mut() {
        match adjacent.get(*cursor).copied() {
            Some(next) => {
                *cursor += 1;
                if seen.insert(next) {
                    order.push(next);
                    let adjacent = neighbours(graph, next, direction)?;
                    stack.push((adjacent, 0));
                }
            }
            None => {
                stack.pop();
            }
        }
    }
    Ok(order)
}

/// Weakly connected components, each in traversal order.
///
/// Components are emitted in ascending order of their smallest vertex.
pub fn weakly_connected_components(graph: &Digraph) -> Result<Vec<Vec<VertexId>>, RpgError> {
    let mut assigned = BTreeSet::new();
    let mut components = Vec::new();
    for vertex in graph.vertices() {
        if assigned.contains(&vertex) {
            continue;
        }
        let component = dfs_preorder(graph, vertex, Direction::Undirected)?;
        assigned.extend(component.iter().copied());
        components.push(component);
    }
    Ok(components)
}

/// Whether the graph forms a single weakly connected component.
pub fn is_weakly_connected(graph: &Digraph) -> Result<bool, RpgError> {
    Ok(weakly_connected_components(graph)?.len() <= 1)
}

fn neighbours(
    graph: &Digraph,
    vertex: VertexId,
    direction: Direction,
) -> Result<Vec<VertexId>, RpgError> {
    match direction {
        Direction::Forward => graph.successors(vertex),
        Direction::Reverse => graph.predecessors(vertex),
        Direction::Undirected => {
            let mut all = graph.successors(vertex)?;
            all.extend(graph.predecessors(vertex)?);
            Ok(all)
        }
    }
}
