use rpgmark_codec::encode;
use rpgmark_core::rng::RngHandle;
use rpgmark_core::{ErrorKind, HeapNode, VertexId};
use rpgmark_graph::{apply_all, apply_damage, canonical_hash, shuffle_labels, EdgeDamage};
use rpgmark_recover::{
    classify_and_repair, decode, nodes_from_graph, DamageKind, FixedRule, RepresentativeForest,
};

fn v(raw: u64) -> VertexId {
    VertexId::from_raw(raw)
}

#[test]
fn missing_root_edge_is_restored() {
    let mut graph = encode(23).unwrap().into_graph();
    apply_damage(&mut graph, EdgeDamage::DeleteList(12)).unwrap();
    let nodes = nodes_from_graph(&graph).unwrap();
    let (path, kind) = classify_and_repair(&nodes).unwrap();
    assert_eq!(kind, DamageKind::MissingRoot);
    assert_eq!(path.observed().first(), Some(&v(12)));
    assert!(path.labeled().contains_edge(v(12), v(11)));
    assert_eq!(decode(&path, kind).unwrap(), 23);
}

#[test]
fn missing_tree_edge_keeps_root_children() {
    let intact = encode(23).unwrap();
    let expected: Vec<u64> = intact
        .graph()
        .predecessors(intact.root())
        .unwrap()
        .into_iter()
        .map(|vertex| vertex.as_raw())
        .collect();

    for (source, target) in intact.tree_edges() {
        let mut graph = intact.graph().clone();
        graph.remove_edge_between(source, target).unwrap();
        let nodes = nodes_from_graph(&graph).unwrap();
        let (path, kind) = classify_and_repair(&nodes).unwrap();
        assert_eq!(kind, DamageKind::MissingBackEdge);
        assert_eq!(path.labeled().edge_count(), graph.edge_count());

        let forest = RepresentativeForest::new(&path, kind).unwrap();
        forest.fixed_element().unwrap();
        let recovered: Vec<u64> = forest.root_children().unwrap().into_iter().collect();
        let mut sorted = expected.clone();
        sorted.sort_unstable();
        assert_eq!(recovered, sorted, "tree edge from {source}");
        assert_eq!(decode(&path, kind).unwrap(), 23);
    }
}

#[test]
fn fixed_element_rules_on_known_graph() {
    let cases = [
        (EdgeDamage::DeleteTree(1), 7, FixedRule::DescendantWindow),
        (EdgeDamage::DeleteTree(7), 7, FixedRule::DescendantWindow),
        (EdgeDamage::DeleteTree(2), 7, FixedRule::SiblingGroup),
        (EdgeDamage::DeleteTree(11), 7, FixedRule::SiblingGroup),
    ];
    for (damage, vertex, rule) in cases {
        let mut graph = encode(23).unwrap().into_graph();
        apply_damage(&mut graph, damage).unwrap();
        let nodes = nodes_from_graph(&graph).unwrap();
        let (path, kind) = classify_and_repair(&nodes).unwrap();
        let fixed = RepresentativeForest::new(&path, kind)
            .unwrap()
            .fixed_element()
            .unwrap();
        assert_eq!((fixed.vertex, fixed.rule), (vertex, rule), "{damage}");
    }
}

#[test]
fn intact_forest_is_one_tree() {
    let graph = encode(37).unwrap().into_graph();
    let nodes = nodes_from_graph(&graph).unwrap();
    let (path, kind) = classify_and_repair(&nodes).unwrap();
    let forest = RepresentativeForest::new(&path, kind).unwrap();
    assert_eq!(forest.bento_parameter(), 6);
    assert_eq!(forest.trees().len(), 1);
    assert_eq!(forest.children(14), &[7, 10, 12, 13]);
    assert_eq!(forest.parent(9), Some(11));
    assert_eq!(forest.preorder(14).len(), 14);
}

#[test]
fn two_out_degree_three_vertices_are_rejected() {
    let graph = encode(23).unwrap().into_graph();
    let mut nodes = nodes_from_graph(&graph).unwrap();
    for label in [2usize, 3] {
        nodes[label].refs.truncate(1);
    }
    for label in [5usize, 6] {
        nodes[label].refs.push(v(0));
    }
    let err = classify_and_repair(&nodes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructureMismatch);
    assert_eq!(err.info().code, "out-degree");
}

#[test]
fn two_missing_edges_are_rejected() {
    let mut graph = encode(23).unwrap().into_graph();
    apply_all(
        &mut graph,
        &[EdgeDamage::DeleteTree(3), EdgeDamage::DeleteList(8)],
    )
    .unwrap();
    let nodes = nodes_from_graph(&graph).unwrap();
    let err = classify_and_repair(&nodes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructureMismatch);
}

#[test]
fn closed_cycle_is_rejected() {
    let graph = encode(5).unwrap().into_graph();
    let mut nodes = nodes_from_graph(&graph).unwrap();
    nodes[0].refs.push(v(8));
    let err = classify_and_repair(&nodes).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::StructureMismatch | ErrorKind::NotAnRpg
    ));
}

#[test]
fn reference_order_does_not_matter() {
    let rpg = encode(0b1011_0110_1101).unwrap();
    let flips: Vec<EdgeDamage> = (1..=rpg.sip().len() as u64).map(EdgeDamage::Flip).collect();
    for cut in [None, Some(EdgeDamage::DeleteTree(4)), Some(EdgeDamage::DeleteList(9))] {
        let mut graph = rpg.graph().clone();
        apply_all(&mut graph, &flips).unwrap();
        if let Some(cut) = cut {
            apply_damage(&mut graph, cut).unwrap();
        }
        let nodes = nodes_from_graph(&graph).unwrap();
        let (path, kind) = classify_and_repair(&nodes).unwrap();
        assert_eq!(decode(&path, kind).unwrap(), rpg.value());
    }
}

#[test]
fn observed_ids_do_not_matter() {
    let rpg = encode(0x5EED).unwrap();
    let nodes = nodes_from_graph(rpg.graph()).unwrap();
    let (reference, _) = classify_and_repair(&nodes).unwrap();
    let expected = canonical_hash(reference.labeled(), &reference.labels()).unwrap();

    let mut rng = RngHandle::from_seed(99);
    for _ in 0..16 {
        let (shuffled, permutation) = shuffle_labels(rpg.graph(), &mut rng).unwrap();
        let nodes = nodes_from_graph(&shuffled).unwrap();
        let (path, kind) = classify_and_repair(&nodes).unwrap();
        assert_eq!(kind, DamageKind::Unbroken);
        assert_eq!(decode(&path, kind).unwrap(), 0x5EED);
        assert_eq!(path.observed()[0], permutation[rpg.root().as_raw() as usize]);
        let hash = canonical_hash(path.labeled(), &path.labels()).unwrap();
        assert_eq!(hash, expected);
    }
}

#[test]
fn shuffled_and_damaged_graphs_decode() {
    let mut rng = RngHandle::from_seed(7);
    for w in [13u64, 77, 4_242, 0xFFFF_0001] {
        let n = rpgmark_codec::bit_length(w) as u64;
        for damage in [EdgeDamage::DeleteList(n), EdgeDamage::DeleteTree(n + 1)] {
            let mut graph = encode(w).unwrap().into_graph();
            apply_damage(&mut graph, damage).unwrap();
            let (shuffled, _) = shuffle_labels(&graph, &mut rng).unwrap();
            let nodes = nodes_from_graph(&shuffled).unwrap();
            let (path, kind) = classify_and_repair(&nodes).unwrap();
            assert_eq!(decode(&path, kind).unwrap(), w, "w={w} {damage}");
        }
    }
}

#[test]
fn missing_sink_is_materialized() {
    let mut graph = encode(9).unwrap().into_graph();
    apply_damage(&mut graph, EdgeDamage::DeleteList(1)).unwrap();
    let nodes: Vec<HeapNode> = nodes_from_graph(&graph)
        .unwrap()
        .into_iter()
        .filter(|node| node.id != v(0))
        .collect();
    let (path, kind) = classify_and_repair(&nodes).unwrap();
    assert_eq!(kind, DamageKind::MissingSink);
    assert_eq!(path.observed().last(), Some(&VertexId::DUMMY_SINK));
    assert_eq!(path.len(), graph.vertex_count());
    assert_eq!(decode(&path, kind).unwrap(), 9);
}

#[test]
fn root_without_msb_child_is_not_an_rpg() {
    let nodes = vec![
        HeapNode::new(0, []),
        HeapNode::new(1, [2, 2]),
        HeapNode::new(2, [1, 4]),
        HeapNode::new(3, [2, 0]),
        HeapNode::new(4, [3]),
    ];
    let (path, kind) = classify_and_repair(&nodes).unwrap();
    assert_eq!(kind, DamageKind::MissingBackEdge);
    let err = decode(&path, kind).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAnRpg);
    assert_eq!(err.info().code, "missing-msb-child");
}
