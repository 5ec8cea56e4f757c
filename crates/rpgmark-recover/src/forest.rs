//! Representative forest of a Hamilton path.
//!
//! Stripping the list edges from a Bento-labeled RPG and reversing the tree
//! edges leaves a forest over the labels `1..=2n_B + 2`. With every tree edge
//! present it is a single tree under the super-root `2n_B + 2` whose children
//! spell the watermark. With one tree edge missing it splits, and the fixed
//! element tells which LARGE vertices the super-root has lost.

use std::collections::{BTreeMap, BTreeSet};

use rpgmark_core::errors::{not_an_rpg, RpgError};
use rpgmark_core::VertexId;
use rpgmark_graph::{is_weakly_connected, Digraph, DigraphConfig};
use serde::{Deserialize, Serialize};

use crate::partial::{DamageKind, HamiltonPath};

/// Rule that produced a fixed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixedRule {
    /// `2n_B + 1` is a leaf and `2n_B` owns all but at most two isolated SMALL vertices.
    TopLeaf,
    /// A LARGE vertex below a non-root parent has siblings.
    SiblingGroup,
    /// A LARGE vertex's descendants fill its window `x - n_B ..= n_B`, up to one whole tree.
    DescendantWindow,
    /// The last vertex of some tree's preorder is LARGE.
    PreorderTail,
}

/// Fixed element of a forest and the rule that found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedElement {
    /// Label of the fixed element.
    pub vertex: u64,
    /// Rule that matched first.
    pub rule: FixedRule,
}

/// Forest of reversed tree edges over Bento labels.
#[derive(Debug, Clone)]
pub struct RepresentativeForest {
    n_b: u64,
    parent: Vec<Option<u64>>,
    children: Vec<Vec<u64>>,
    trees: BTreeMap<u64, BTreeSet<u64>>,
    descendants: Option<Vec<BTreeSet<u64>>>,
}

impl RepresentativeForest {
    /// Builds the forest of a validated path.
    ///
    /// Descendant sets are only folded when `damage` leaves a tree edge missing.
    pub fn new(path: &HamiltonPath, damage: DamageKind) -> Result<Self, RpgError> {
        Self::from_labeled(path.labeled(), damage.tree_edge_missing())
    }

    /// Builds the forest of a graph already in Bento labels.
    pub fn from_labeled(graph: &Digraph, with_descendants: bool) -> Result<Self, RpgError> {
        let count = graph.vertex_count();
        if count < 5 || count % 2 == 0 {
            return Err(not_an_rpg("vertex-count", "forest needs an odd count of at least 5")
                .with_context("vertices", count));
        }
        let n_b = ((count - 3) / 2) as u64;
        let mut parent = vec![None; count];
        let mut children = vec![Vec::new(); count];
        for (source, target) in graph.edges() {
            let (child, up) = (source.as_raw(), target.as_raw());
            if child == up + 1 {
                continue;
            }
            if child == 0 || up <= child || parent[child as usize].is_some() {
                return Err(not_an_rpg("malformed-tree-edge", "tree edges must point up the path")
                    .with_context("source", child)
                    .with_context("target", up));
            }
            parent[child as usize] = Some(up);
            children[up as usize].push(child);
        }
        for kids in &mut children {
            kids.sort_unstable();
        }

        let mut trees: BTreeMap<u64, BTreeSet<u64>> = BTreeMap::new();
        for label in 1..count as u64 {
            let mut top = label;
            while let Some(up) = parent[top as usize] {
                top = up;
            }
            trees.entry(top).or_default().insert(label);
        }

        let mut forest = Self {
            n_b,
            parent,
            children,
            trees,
            descendants: None,
        };
        if with_descendants {
            forest.descendants = Some(forest.fold_descendants());
        }
        Ok(forest)
    }

    /// Bento parameter `n_B`.
    pub fn bento_parameter(&self) -> u64 {
        self.n_b
    }

    /// Label of the super-root, `2n_B + 2`.
    pub fn super_root(&self) -> u64 {
        2 * self.n_b + 2
    }

    /// LARGE labels `n_B + 1 ..= 2n_B + 1`.
    pub fn large(&self) -> impl Iterator<Item = u64> {
        self.n_b + 1..=2 * self.n_b + 1
    }

    /// SMALL labels `1 ..= n_B`.
    pub fn small(&self) -> impl Iterator<Item = u64> {
        1..=self.n_b
    }

    /// Parent of a label, if any.
    pub fn parent(&self, label: u64) -> Option<u64> {
        self.parent.get(label as usize).copied().flatten()
    }

    /// Children of a label in ascending order.
    pub fn children(&self, label: u64) -> &[u64] {
        self.children
            .get(label as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Trees keyed by their root (the largest label), in ascending root order.
    pub fn trees(&self) -> &BTreeMap<u64, BTreeSet<u64>> {
        &self.trees
    }

    /// Whether a label has neither parent nor children.
    pub fn is_isolated(&self, label: u64) -> bool {
        self.parent(label).is_none() && self.children(label).is_empty()
    }

    /// Preorder from `label`, children ascending.
    pub fn preorder(&self, label: u64) -> Vec<u64> {
        let mut order = Vec::new();
        let mut stack = vec![label];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        order
    }

    /// Finds the fixed element; rules are tried in order and the first match wins.
    pub fn fixed_element(&self) -> Result<FixedElement, RpgError> {
        let n = self.n_b;
        let top = 2 * n + 1;

        if self.children(top).is_empty() {
            let owned: BTreeSet<u64> = self.children(2 * n).iter().copied().collect();
            let stray: Vec<u64> = self.small().filter(|v| !owned.contains(v)).collect();
            if stray.len() <= 2 && stray.iter().all(|v| self.is_isolated(*v)) {
                return Ok(FixedElement {
                    vertex: top,
                    rule: FixedRule::TopLeaf,
                });
            }
        }

        for x in self.large().filter(|x| *x != top) {
            let Some(up) = self.parent(x) else { continue };
            if up == self.super_root() {
                continue;
            }
            let siblings = self.children(up);
            if siblings.len() > 1 {
                if let Some(max) = siblings.iter().max() {
                    return Ok(FixedElement {
                        vertex: *max,
                        rule: FixedRule::SiblingGroup,
                    });
                }
            }
        }

        let folded;
        let descendants = match &self.descendants {
            Some(descendants) => descendants,
            None => {
                folded = self.fold_descendants();
                &folded
            }
        };
        for x in self.large().filter(|x| *x != top) {
            if self.children(x).is_empty() {
                continue;
            }
            let window: BTreeSet<u64> = (x - n..=n).collect();
            let below = &descendants[x as usize];
            if !below.is_subset(&window) {
                continue;
            }
            let rest: BTreeSet<u64> = window.difference(below).copied().collect();
            if rest.is_empty() || self.trees.values().any(|tree| *tree == rest) {
                return Ok(FixedElement {
                    vertex: x,
                    rule: FixedRule::DescendantWindow,
                });
            }
        }

        for root in self.trees.keys() {
            if let Some(last) = self.preorder(*root).last().copied() {
                if last > n && last <= top {
                    return Ok(FixedElement {
                        vertex: last,
                        rule: FixedRule::PreorderTail,
                    });
                }
            }
        }

        Err(not_an_rpg("no-fixed-element", "forest has no fixed element")
            .with_context("n_b", n)
            .with_context("trees", self.trees.len()))
    }

    /// True children of the super-root, recovered despite a missing tree edge.
    ///
    /// Without descendant sets (nothing missing) the direct children are returned.
    pub fn root_children(&self) -> Result<BTreeSet<u64>, RpgError> {
        let direct: BTreeSet<u64> = self.children(self.super_root()).iter().copied().collect();
        let Some(descendants) = &self.descendants else {
            return Ok(direct);
        };
        let n = self.n_b;
        let top = 2 * n + 1;
        let fixed = self.fixed_element()?.vertex;
        if fixed == top {
            return Ok(self.large().collect());
        }

        let mut members: Vec<u64> = self.large().filter(|v| *v != fixed).collect();
        members.push(self.super_root());
        if self.connected(&members)? {
            return Ok(direct);
        }

        let isolated: Vec<u64> = self
            .trees
            .values()
            .filter(|tree| tree.len() == 1)
            .filter_map(|tree| tree.iter().next().copied())
            .collect();
        let mut recovered = direct.clone();
        match isolated.as_slice() {
            [] => {
                recovered.insert(top);
            }
            [a, b] => {
                recovered.insert(*a);
                recovered.insert(*b);
            }
            [x] => {
                if descendants[fixed as usize].len() as u64 != 2 * n - fixed + 1 {
                    recovered.insert(*x);
                } else {
                    let last = self.preorder(fixed).last().copied().unwrap_or(fixed);
                    if (direct.len() as u64) < last {
                        recovered.insert(*x);
                        recovered.insert(top);
                    }
                }
            }
            more => {
                return Err(not_an_rpg("isolated-count", "too many isolated vertices")
                    .with_context("isolated", more.len()))
            }
        }
        Ok(recovered)
    }

    /// Whether the forest edges restricted to `members` connect them.
    fn connected(&self, members: &[u64]) -> Result<bool, RpgError> {
        let local: BTreeMap<u64, VertexId> = members
            .iter()
            .enumerate()
            .map(|(idx, label)| (*label, VertexId::from_raw(idx as u64)))
            .collect();
        let mut induced = Digraph::with_vertices(members.len(), DigraphConfig::observed());
        for label in members {
            if let Some(up) = self.parent(*label) {
                if let (Some(child), Some(parent)) = (local.get(label), local.get(&up)) {
                    induced.add_edge(*parent, *child)?;
                }
            }
        }
        is_weakly_connected(&induced)
    }

    /// Descendant set of every label, folded bottom-up.
    ///
    /// Children always carry smaller labels than their parent, so one pass in
    /// ascending label order sees every child before its parent.
    fn fold_descendants(&self) -> Vec<BTreeSet<u64>> {
        let mut descendants: Vec<BTreeSet<u64>> = vec![BTreeSet::new(); self.children.len()];
        for label in 0..self.children.len() {
            let mut below = BTreeSet::new();
            for child in &self.children[label] {
                below.insert(*child);
                below.extend(descendants[*child as usize].iter().copied());
            }
            descendants[label] = below;
        }
        descendants
    }
}
