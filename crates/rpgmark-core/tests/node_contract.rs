use rpgmark_core::{HeapNode, ObservedNode, SchemaVersion, VertexId};

#[test]
fn heap_node_exposes_refs_in_order() {
    let node = HeapNode::new(10, [4, 2]);
    assert_eq!(node.id(), VertexId::from_raw(10));
    assert_eq!(
        node.outgoing_refs(),
        vec![VertexId::from_raw(4), VertexId::from_raw(2)]
    );
    let by_ref: &HeapNode = &node;
    assert_eq!(ObservedNode::id(&by_ref), node.id);
}

#[test]
fn dummy_sink_is_out_of_range() {
    assert!(VertexId::DUMMY_SINK.is_dummy());
    assert!(!VertexId::from_raw(0).is_dummy());
    assert_eq!(VertexId::DUMMY_SINK.to_string(), "dummy");
    assert_eq!(VertexId::from_raw(3).to_string(), "3");
}

#[test]
fn heap_node_round_trips_json() {
    let node = HeapNode::new(1, [0]);
    let json = serde_json::to_string(&node).unwrap();
    let back: HeapNode = serde_json::from_str(&json).unwrap();
    assert_eq!(back, node);

    let bare: HeapNode = serde_json::from_str("{\"id\":5}").unwrap();
    assert!(bare.refs.is_empty());
}

#[test]
fn schema_compatibility() {
    let current = SchemaVersion::new(1, 2, 0);
    assert!(current.reads(&SchemaVersion::new(1, 0, 3)));
    assert!(!current.reads(&SchemaVersion::new(2, 0, 0)));
    assert!(!current.reads(&SchemaVersion::new(1, 3, 0)));
    assert_eq!(current.to_string(), "1.2.0");
}
