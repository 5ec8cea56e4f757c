use std::collections::BTreeSet;
use std::fmt::Write;

use rpgmark_core::VertexId;

use crate::digraph::Digraph;

/// Renders the graph in Graphviz DOT.
///
/// With a Hamilton path the consecutive path pairs are drawn solid and every
/// other edge dashed; path vertices are ranked along the path.
pub fn graph_to_dot(graph: &Digraph, path: Option<&[VertexId]>) -> String {
    let list_edges: BTreeSet<(VertexId, VertexId)> = path
        .map(|path| path.windows(2).map(|pair| (pair[0], pair[1])).collect())
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(out, "digraph RPG {{");
    let _ = writeln!(out, "  rankdir=LR;");
    let _ = writeln!(out, "  node [shape=circle, fontsize=10];");
    let _ = writeln!(out);
    for vertex in graph.vertices() {
        let _ = writeln!(out, "  v{vertex} [label=\"{vertex}\"];");
    }
    if let Some(path) = path {
        if let (Some(first), Some(last)) = (path.first(), path.last()) {
            let _ = writeln!(out, "  v{first} [shape=doublecircle];");
            let _ = writeln!(out, "  v{last} [shape=box];");
        }
    }
    let _ = writeln!(out);
    for (source, target) in graph.edges() {
        if path.is_none() || list_edges.contains(&(source, target)) {
            let _ = writeln!(out, "  v{source} -> v{target};");
        } else {
            let _ = writeln!(
                out,
                "  v{source} -> v{target} [style=dashed, constraint=false];"
            );
        }
    }
    let _ = writeln!(out, "}}");
    out
}
