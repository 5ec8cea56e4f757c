//! Damage classification and repair of a single observed component.
//!
//! A component is an RPG missing at most one edge. The out-degree profile
//! narrows the damage down to one of four patterns, the reversed walk from the
//! sink pins down the distinguished vertices, a missing list edge is put back
//! and the forward walk from the root then yields the Hamilton path.

use std::collections::BTreeSet;

use rpgmark_core::errors::{invalid_input, not_an_rpg, structure_mismatch, unrepairable, RpgError};
use rpgmark_core::VertexId;
use rpgmark_graph::{dfs_preorder, Digraph, DigraphConfig, Direction};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assembly::Candidate;

/// Which canonical edge an observed component is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageKind {
    /// Nothing is missing.
    Unbroken,
    /// The root's only outgoing (list) edge was cut.
    MissingRoot,
    /// The sink itself was never observed, so the last list edge is gone.
    MissingSink,
    /// An interior list edge was cut.
    MissingListEdge,
    /// One tree edge was cut; it is not repaired.
    MissingBackEdge,
}

impl DamageKind {
    /// Whether repair puts a list edge back.
    pub fn repairs_list_edge(&self) -> bool {
        matches!(
            self,
            DamageKind::MissingRoot | DamageKind::MissingSink | DamageKind::MissingListEdge
        )
    }

    /// Whether a tree edge is still missing after repair.
    pub fn tree_edge_missing(&self) -> bool {
        matches!(self, DamageKind::MissingBackEdge)
    }
}

/// Shape of a body vertex seen during the forward walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyNodeStatus {
    /// One edge back into the visited prefix and one edge forward.
    Unbroken,
    /// Only an edge back into the visited prefix.
    MissingListEdge,
    /// Only an edge forward.
    MissingBackEdge,
    /// Any other shape.
    Invalid,
}

/// Classifies a body vertex from its successors and the visited prefix.
pub fn body_node_status(successors: &[VertexId], visited: &BTreeSet<VertexId>) -> BodyNodeStatus {
    match successors {
        [only] if visited.contains(only) => BodyNodeStatus::MissingListEdge,
        [_] => BodyNodeStatus::MissingBackEdge,
        [a, b] if visited.contains(a) != visited.contains(b) => BodyNodeStatus::Unbroken,
        _ => BodyNodeStatus::Invalid,
    }
}

/// Root, sink, source and target of a component under repair.
///
/// `source` and `target` name the endpoints of a missing list edge. In the
/// missing-sink case `sink` and `target` hold [`VertexId::DUMMY_SINK`] until
/// repair materializes the vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rsst {
    /// Header vertex.
    pub root: VertexId,
    /// Footer vertex.
    pub sink: VertexId,
    /// Tail of the missing list edge.
    pub source: Option<VertexId>,
    /// Head of the missing list edge.
    pub target: Option<VertexId>,
}

/// Validated Hamilton path of a repaired component.
#[derive(Debug, Clone)]
pub struct HamiltonPath {
    observed: Vec<VertexId>,
    labeled: Digraph,
}

impl HamiltonPath {
    /// Observed ids from root to sink; a reconstructed sink is [`VertexId::DUMMY_SINK`].
    pub fn observed(&self) -> &[VertexId] {
        &self.observed
    }

    /// The repaired graph relabeled `2n_B + 2 ..= 0` along the path.
    pub fn labeled(&self) -> &Digraph {
        &self.labeled
    }

    /// Path order in labels, `2n_B + 2` down to `0`.
    pub fn labels(&self) -> Vec<VertexId> {
        (0..self.observed.len() as u64)
            .rev()
            .map(VertexId::from_raw)
            .collect()
    }

    /// Number of vertices on the path.
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    /// Always false for a validated path.
    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Bento parameter `n_B = (V - 3) / 2`.
    pub fn bento_parameter(&self) -> usize {
        (self.observed.len() - 3) / 2
    }
}

/// Private working copy of one candidate.
#[derive(Debug, Clone)]
pub struct PartialRpg {
    graph: Digraph,
    ids: Vec<VertexId>,
    degree0: Vec<VertexId>,
    degree1: Vec<VertexId>,
}

impl PartialRpg {
    /// Copies the candidate's graph and checks the degree and edge-count bounds.
    pub fn new(candidate: &Candidate) -> Result<Self, RpgError> {
        Self::from_graph(candidate.graph().clone(), candidate.observed_ids().to_vec())
    }

    /// Wraps a graph whose vertex `i` was observed as `ids[i]`.
    pub fn from_graph(graph: Digraph, ids: Vec<VertexId>) -> Result<Self, RpgError> {
        let v = graph.vertex_count();
        let e = graph.edge_count();
        if ids.len() != v {
            return Err(invalid_input("id-count", "one observed id per vertex is required")
                .with_context("vertices", v)
                .with_context("ids", ids.len()));
        }
        if v < 4 || e + 4 < 2 * v || e + 2 > 2 * v {
            return Err(structure_mismatch("edge-count", "edge count outside 2V-4..=2V-2")
                .with_context("vertices", v)
                .with_context("edges", e));
        }
        let mut degree0 = Vec::new();
        let mut degree1 = Vec::new();
        for vertex in graph.vertices() {
            match graph.out_degree(vertex)? {
                0 => degree0.push(vertex),
                1 => degree1.push(vertex),
                2 => {}
                degree => {
                    return Err(structure_mismatch("out-degree", "out-degree above 2")
                        .with_context("vertex", ids[vertex.as_raw() as usize])
                        .with_context("degree", degree))
                }
            }
        }
        Ok(Self {
            graph,
            ids,
            degree0,
            degree1,
        })
    }

    /// Matches the degree profile against the damage table.
    pub fn classify(&self) -> Result<DamageKind, RpgError> {
        let v = self.graph.vertex_count();
        let e = self.graph.edge_count();
        let odd = v % 2 == 1;
        let kind = match (self.degree0.len(), self.degree1.len()) {
            (1, 1) if e + 3 == 2 * v && odd => DamageKind::Unbroken,
            (2, 0) if e + 4 == 2 * v && odd => DamageKind::MissingRoot,
            (0, 2) if e + 2 == 2 * v && !odd => DamageKind::MissingSink,
            (1, 2) if e + 4 == 2 * v && odd => {
                let sink = pick(&self.degree0)?;
                let reach = dfs_preorder(&self.graph, pick(&self.degree1)?, Direction::Forward)?;
                if reach.contains(&sink) {
                    DamageKind::MissingBackEdge
                } else {
                    DamageKind::MissingListEdge
                }
            }
            (zeros, ones) => {
                return Err(structure_mismatch("degree-pattern", "no damage pattern matches")
                    .with_context("degree0", zeros)
                    .with_context("degree1", ones)
                    .with_context("vertices", v)
                    .with_context("edges", e))
            }
        };
        debug!(?kind, vertices = v, edges = e, "component classified");
        Ok(kind)
    }

    /// Resolves root, sink, source and target for the given damage.
    pub fn locate(&self, kind: DamageKind) -> Result<Rsst, RpgError> {
        match kind {
            DamageKind::Unbroken => Ok(Rsst {
                root: pick(&self.degree1)?,
                sink: pick(&self.degree0)?,
                source: None,
                target: None,
            }),
            DamageKind::MissingRoot => {
                let root = self.unique_with_in_degree(&self.degree0)?;
                let sink = other(&self.degree0, root);
                let walk = self.reverse_walk(sink)?;
                Ok(Rsst {
                    root,
                    sink,
                    source: Some(root),
                    target: walk.last().copied(),
                })
            }
            DamageKind::MissingSink => {
                let root = self.unique_with_in_degree(&self.degree1)?;
                Ok(Rsst {
                    root,
                    sink: VertexId::DUMMY_SINK,
                    source: Some(other(&self.degree1, root)),
                    target: Some(VertexId::DUMMY_SINK),
                })
            }
            DamageKind::MissingBackEdge => {
                let sink = pick(&self.degree0)?;
                let walk = self.reverse_walk(sink)?;
                let root = walk.last().copied().unwrap_or(sink);
                Ok(Rsst {
                    root,
                    sink,
                    source: None,
                    target: None,
                })
            }
            DamageKind::MissingListEdge => {
                let sink = pick(&self.degree0)?;
                let walk = self.reverse_walk(sink)?;
                let root = self.root_of_cut_path(&walk)?;
                Ok(Rsst {
                    root,
                    sink,
                    source: Some(other(&self.degree1, root)),
                    target: walk.last().copied(),
                })
            }
        }
    }

    /// Adds the missing list edge, materializing the sink when it was never observed.
    pub fn repair(&mut self, kind: DamageKind, rsst: &mut Rsst) -> Result<(), RpgError> {
        if !kind.repairs_list_edge() {
            return Ok(());
        }
        let (Some(source), Some(mut target)) = (rsst.source, rsst.target) else {
            return Err(unrepairable("unresolved-endpoints", "missing list edge endpoints unknown")
                .with_context("kind", format!("{kind:?}")));
        };
        if target.is_dummy() {
            target = self.graph.add_vertex();
            self.ids.push(VertexId::DUMMY_SINK);
            rsst.sink = target;
            rsst.target = Some(target);
        }
        self.graph.add_edge(source, target)?;
        debug!(
            source = %self.ids[source.as_raw() as usize],
            target = %self.ids[target.as_raw() as usize],
            "list edge restored"
        );
        Ok(())
    }

    /// Walks forward from the root and checks every vertex against the RPG shape.
    pub fn validate(&self, root: VertexId) -> Result<HamiltonPath, RpgError> {
        if self.graph.out_degree(root)? != 1 {
            return Err(not_an_rpg("root-degree", "root must have exactly one edge")
                .with_context("root", self.ids[root.as_raw() as usize]));
        }
        let path = dfs_preorder(&self.graph, root, Direction::Forward)?;
        let mut visited = BTreeSet::new();
        let mut forward_only = 0usize;
        for (position, pair) in path.windows(2).enumerate() {
            let (last, current) = (pair[0], pair[1]);
            if !self.graph.contains_edge(last, current) {
                return Err(not_an_rpg("path-gap", "forward walk left the path")
                    .with_context("position", position + 1));
            }
            visited.insert(last);
            let successors = self.graph.successors(current)?;
            if position + 2 == path.len() {
                if !successors.is_empty() {
                    return Err(not_an_rpg("terminal-has-edges", "path ends on a vertex with edges")
                        .with_context("degree", successors.len()));
                }
                break;
            }
            match body_node_status(&successors, &visited) {
                BodyNodeStatus::Unbroken => {}
                BodyNodeStatus::MissingBackEdge => forward_only += 1,
                status @ (BodyNodeStatus::MissingListEdge | BodyNodeStatus::Invalid) => {
                    return Err(not_an_rpg("body-shape", "body vertex does not fit the path")
                        .with_context("position", position + 1)
                        .with_context("status", format!("{status:?}")))
                }
            }
        }
        let v = self.graph.vertex_count();
        if path.len() != v || v < 5 || v % 2 == 0 || forward_only > 1 {
            return Err(not_an_rpg("path-shape", "path is not a Hamilton path of an RPG")
                .with_context("path", path.len())
                .with_context("vertices", v)
                .with_context("forward_only", forward_only));
        }
        self.hamilton_path(&path)
    }

    fn hamilton_path(&self, path: &[VertexId]) -> Result<HamiltonPath, RpgError> {
        let top = path.len() - 1;
        let mut label = vec![0u64; path.len()];
        for (position, vertex) in path.iter().enumerate() {
            label[vertex.as_raw() as usize] = (top - position) as u64;
        }
        let mut labeled = Digraph::with_vertices(path.len(), DigraphConfig::observed());
        for vertex in path {
            for target in self.graph.successors(*vertex)? {
                labeled.add_edge(
                    VertexId::from_raw(label[vertex.as_raw() as usize]),
                    VertexId::from_raw(label[target.as_raw() as usize]),
                )?;
            }
        }
        Ok(HamiltonPath {
            observed: path
                .iter()
                .map(|vertex| self.ids[vertex.as_raw() as usize])
                .collect(),
            labeled,
        })
    }

    /// Reverse depth-first walk from the sink; every step must follow an edge.
    fn reverse_walk(&self, sink: VertexId) -> Result<Vec<VertexId>, RpgError> {
        let walk = dfs_preorder(&self.graph, sink, Direction::Reverse)?;
        for (position, pair) in walk.windows(2).enumerate() {
            if !self.graph.contains_edge(pair[1], pair[0]) {
                return Err(unrepairable("broken-reverse-walk", "reverse walk jumped between branches")
                    .with_context("position", position + 1));
            }
        }
        Ok(walk)
    }

    /// Root of a component whose interior list edge was cut.
    ///
    /// With a long enough reverse walk the vertex at position `n_B + 1` has one
    /// edge to position `n_B` and its other edge points at the root. Otherwise
    /// the root is the degree-1 vertex with more than one in-edge from the
    /// unreached part.
    fn root_of_cut_path(&self, walk: &[VertexId]) -> Result<VertexId, RpgError> {
        let n_b = (self.graph.vertex_count() - 3) / 2;
        if walk.len() > n_b + 1 {
            let (anchor, below) = (walk[n_b + 1], walk[n_b]);
            let successors = self.graph.successors(anchor)?;
            if !successors.contains(&below) {
                return Err(unrepairable("anchor-off-path", "anchor vertex skips the path"));
            }
            let others: Vec<VertexId> = successors.into_iter().filter(|s| *s != below).collect();
            return match others.as_slice() {
                [root] if self.degree1.contains(root) => Ok(*root),
                _ => Err(unrepairable("ambiguous-root", "anchor does not point at a degree-1 vertex")
                    .with_context("anchor", self.ids[anchor.as_raw() as usize])),
            };
        }

        let reached: BTreeSet<VertexId> = walk.iter().copied().collect();
        let mut degrees = Vec::with_capacity(2);
        for vertex in &self.degree1 {
            let count = self
                .graph
                .predecessors(*vertex)?
                .into_iter()
                .filter(|pred| !reached.contains(pred))
                .count();
            degrees.push(count);
        }
        match degrees.as_slice() {
            [1, d] if *d > 1 => Ok(self.degree1[1]),
            [d, 1] if *d > 1 => Ok(self.degree1[0]),
            _ => Err(unrepairable("ambiguous-root", "in-degrees do not single out the root")
                .with_context("in_degrees", format!("{degrees:?}"))),
        }
    }

    fn unique_with_in_degree(&self, vertices: &[VertexId]) -> Result<VertexId, RpgError> {
        let mut found = Vec::new();
        for vertex in vertices {
            if self.graph.in_degree(*vertex)? >= 2 {
                found.push(*vertex);
            }
        }
        match found.as_slice() {
            [root] => Ok(*root),
            _ => Err(unrepairable("ambiguous-root", "expected one candidate root with in-degree >= 2")
                .with_context("candidates", found.len())),
        }
    }
}

/// Classifies, locates, repairs and validates a candidate on a private copy.
pub fn repair_candidate(candidate: &Candidate) -> Result<(HamiltonPath, DamageKind), RpgError> {
    let mut partial = PartialRpg::new(candidate)?;
    let kind = partial.classify()?;
    let mut rsst = partial.locate(kind)?;
    partial.repair(kind, &mut rsst)?;
    let path = partial.validate(rsst.root)?;
    Ok((path, kind))
}

fn pick(vertices: &[VertexId]) -> Result<VertexId, RpgError> {
    vertices.first().copied().ok_or_else(|| {
        unrepairable("damage-mismatch", "degree profile does not fit the damage kind")
    })
}

fn other(pair: &[VertexId], chosen: VertexId) -> VertexId {
    pair.iter().copied().find(|v| *v != chosen).unwrap_or(chosen)
}
