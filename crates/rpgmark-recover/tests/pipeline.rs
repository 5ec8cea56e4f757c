use rpgmark_codec::{encode, Strategy};
use rpgmark_core::{ErrorKind, HeapNode, VertexId};
use rpgmark_graph::{apply_damage, EdgeDamage};
use rpgmark_recover::{
    classify_and_repair, decode_with, nodes_from_graph, recover_snapshot, CandidateOutcome,
    DamageKind, ObservationBuffer, RecoveryConfig, Snapshot,
};

fn shifted(w: u64, offset: u64, damage: Option<EdgeDamage>) -> Vec<HeapNode> {
    let mut graph = encode(w).unwrap().into_graph();
    if let Some(damage) = damage {
        apply_damage(&mut graph, damage).unwrap();
    }
    nodes_from_graph(&graph)
        .unwrap()
        .into_iter()
        .map(|node| HeapNode {
            id: VertexId::from_raw(node.id.as_raw() + offset),
            refs: node
                .refs
                .iter()
                .map(|target| VertexId::from_raw(target.as_raw() + offset))
                .collect(),
        })
        .collect()
}

fn mixed_heap() -> Vec<HeapNode> {
    let mut nodes = Vec::new();
    nodes.extend(shifted(23, 0, None));
    nodes.extend(shifted(1_000, 100, Some(EdgeDamage::DeleteTree(7))));
    nodes.extend(shifted(23, 200, Some(EdgeDamage::DeleteList(4))));
    let mut cycle = shifted(5, 300, None);
    cycle[0].refs.push(VertexId::from_raw(308));
    nodes.extend(cycle);
    nodes.push(HeapNode::new(900, [901]));
    nodes.push(HeapNode::new(901, []));
    nodes
}

#[test]
fn snapshot_recovers_every_watermark() {
    let snapshot = Snapshot::from_nodes(mixed_heap());
    let report = recover_snapshot(&snapshot, &RecoveryConfig::default()).unwrap();
    assert_eq!(report.observed, snapshot.len());
    assert_eq!(report.discarded, 1);
    assert_eq!(report.outcomes.len(), 4);
    assert_eq!(report.watermarks(), vec![23, 1_000, 23]);
    assert_eq!(report.recovered(), 3);

    match &report.outcomes[1] {
        CandidateOutcome::Recovered { damage, .. } => {
            assert_eq!(*damage, DamageKind::MissingBackEdge)
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    match &report.outcomes[3] {
        CandidateOutcome::Dropped { candidate, error } => {
            assert_eq!(*candidate, 3);
            assert_eq!(error.kind(), ErrorKind::StructureMismatch);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn fingerprints_ignore_observed_ids() {
    let mut nodes = shifted(23, 0, None);
    nodes.extend(shifted(23, 1_000, None));
    let report =
        recover_snapshot(&Snapshot::from_nodes(nodes), &RecoveryConfig::default()).unwrap();
    let prints: Vec<&String> = report
        .outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            CandidateOutcome::Recovered { fingerprint, .. } => Some(fingerprint),
            CandidateOutcome::Dropped { .. } => None,
        })
        .collect();
    assert_eq!(prints.len(), 2);
    assert_eq!(prints[0], prints[1]);
}

#[test]
fn parallel_matches_sequential() {
    let snapshot = Snapshot::from_nodes(mixed_heap());
    let sequential = recover_snapshot(&snapshot, &RecoveryConfig::default()).unwrap();
    let parallel = recover_snapshot(
        &snapshot,
        &RecoveryConfig {
            parallel: true,
            threads: Some(4),
            ..RecoveryConfig::default()
        },
    )
    .unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn buffered_observation_feeds_recovery() {
    let mut buffer = ObservationBuffer::unbounded();
    buffer.extend(shifted(0xABCD, 50, Some(EdgeDamage::DeleteList(1))));
    let report = recover_snapshot(&buffer.finish(), &RecoveryConfig::default()).unwrap();
    assert_eq!(report.watermarks(), vec![0xABCD]);
    assert_eq!(report.discarded, 1);
}

#[test]
fn chroni_refuses_missing_tree_edge() {
    let nodes = shifted(23, 0, Some(EdgeDamage::DeleteTree(5)));
    let (path, kind) = classify_and_repair(&nodes).unwrap();
    let err = decode_with(&path, kind, Strategy::Chroni).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unrepairable);
    assert_eq!(decode_with(&path, kind, Strategy::CrossCheck).unwrap(), 23);
}

#[test]
fn chroni_strategy_drops_tree_damage_in_reports() {
    let nodes = shifted(23, 0, Some(EdgeDamage::DeleteTree(5)));
    let config = RecoveryConfig {
        strategy: Strategy::Chroni,
        ..RecoveryConfig::default()
    };
    let report = recover_snapshot(&Snapshot::from_nodes(nodes), &config).unwrap();
    assert!(report.watermarks().is_empty());
    assert_eq!(report.outcomes.len(), 1);
}

#[test]
fn multiple_candidates_are_refused_by_single_entry_point() {
    let mut nodes = shifted(5, 0, None);
    nodes.extend(shifted(6, 100, None));
    let err = classify_and_repair(&nodes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructureMismatch);
    assert_eq!(err.info().code, "candidate-count");
}

#[test]
fn report_serializes_with_status_tags() {
    let report = recover_snapshot(
        &Snapshot::from_nodes(shifted(5, 0, None)),
        &RecoveryConfig::default(),
    )
    .unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["outcomes"][0]["status"], "recovered");
    assert_eq!(json["outcomes"][0]["watermark"], 5);
    assert_eq!(json["outcomes"][0]["damage"], "Unbroken");
}
