use proptest::prelude::*;
use rpgmark_core::rng::RngHandle;
use rpgmark_core::VertexId;
use rpgmark_graph::{
    apply_all, apply_damage, graph_to_dot, sample_deletion, Digraph, DigraphConfig, EdgeDamage,
};

fn v(raw: u64) -> VertexId {
    VertexId::from_raw(raw)
}

fn sample() -> Digraph {
    let mut graph = Digraph::with_vertices(5, DigraphConfig::default());
    for (source, target) in [(4, 3), (3, 2), (2, 1), (1, 0), (1, 4), (2, 4), (3, 4)] {
        graph.add_edge(v(source), v(target)).unwrap();
    }
    graph
}

#[test]
fn delete_list_and_tree_edges_by_label() {
    let mut graph = sample();
    apply_damage(&mut graph, EdgeDamage::DeleteList(3)).unwrap();
    assert!(!graph.contains_edge(v(3), v(2)));
    apply_damage(&mut graph, EdgeDamage::DeleteTree(1)).unwrap();
    assert!(!graph.contains_edge(v(1), v(4)));
    assert!(graph.contains_edge(v(1), v(0)));
    assert_eq!(graph.edge_count(), 5);
}

#[test]
fn missing_edges_are_reported() {
    let mut graph = sample();
    assert!(apply_damage(&mut graph, EdgeDamage::DeleteTree(4)).is_err());
    assert!(apply_damage(&mut graph, EdgeDamage::DeleteList(0)).is_err());
    assert!(apply_damage(&mut graph, EdgeDamage::Flip(12)).is_err());
}

#[test]
fn flip_reorders_references() {
    let mut graph = sample();
    apply_all(&mut graph, &[EdgeDamage::Flip(2), EdgeDamage::Flip(1)]).unwrap();
    assert_eq!(graph.successors(v(2)).unwrap(), vec![v(4), v(1)]);
    assert_eq!(graph.successors(v(1)).unwrap(), vec![v(4), v(0)]);
}

#[test]
fn damage_labels_serialize_tagged() {
    let json = serde_json::to_string(&EdgeDamage::DeleteTree(3)).unwrap();
    assert_eq!(json, "{\"kind\":\"DeleteTree\",\"label\":3}");
}

#[test]
fn dot_marks_tree_edges_dashed() {
    let graph = sample();
    let path: Vec<VertexId> = (0..5).rev().map(v).collect();
    let dot = graph_to_dot(&graph, Some(&path));
    assert!(dot.starts_with("digraph RPG {"));
    assert!(dot.contains("  v4 -> v3;"));
    assert!(dot.contains("  v1 -> v4 [style=dashed, constraint=false];"));
    assert!(!graph_to_dot(&graph, None).contains("dashed"));
}

proptest! {
    #[test]
    fn sampled_deletion_removes_exactly_one_edge(seed in any::<u64>()) {
        let mut graph = sample();
        let mut rng = RngHandle::from_seed(seed);
        let damage = sample_deletion(&graph, &mut rng).unwrap();
        apply_damage(&mut graph, damage).unwrap();
        prop_assert_eq!(graph.edge_count(), 6);
    }
}
