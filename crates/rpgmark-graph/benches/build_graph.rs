use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rpgmark_core::rng::RngHandle;
use rpgmark_core::VertexId;
use rpgmark_graph::{shuffle_labels, Digraph, DigraphConfig};

fn ladder(len: u64) -> Digraph {
    let mut graph = Digraph::with_vertices(len as usize, DigraphConfig::default());
    for i in (1..len).rev() {
        graph
            .add_edge(VertexId::from_raw(i), VertexId::from_raw(i - 1))
            .unwrap();
    }
    for i in 1..len - 1 {
        graph
            .add_edge(VertexId::from_raw(i), VertexId::from_raw(len - 1))
            .unwrap();
    }
    graph
}

fn build_graph_bench(c: &mut Criterion) {
    c.bench_function("build_ladder_2k", |b| {
        b.iter(|| black_box(ladder(2_000)));
    });

    let graph = ladder(2_000);
    c.bench_function("shuffle_labels_2k", |b| {
        let mut rng = RngHandle::from_seed(7);
        b.iter(|| black_box(shuffle_labels(&graph, &mut rng).unwrap()));
    });
}

criterion_group!(benches, build_graph_bench);
criterion_main!(benches);
