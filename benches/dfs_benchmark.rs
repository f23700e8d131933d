use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use spacedfs::graph::{annotate_edges, biconnected_components_with, cut_vertices, dfs_with_options, AdjacencyGraph, DfsOptions};

/// A grid with a few long-range chords, deep enough to exercise evictions.
fn grid(side: usize) -> AdjacencyGraph {
    let node = |row: usize, col: usize| row * side + col + 1;
    let mut edges = Vec::new();
    for row in 0..side {
        for col in 0..side {
            if col + 1 < side {
                edges.push((node(row, col), node(row, col + 1)));
            }
            if row + 1 < side {
                edges.push((node(row, col), node(row + 1, col)));
            }
        }
    }
    for i in (0..side).step_by(7) {
        edges.push((node(i, 0), node(side - 1 - i, side - 1)));
    }
    AdjacencyGraph::from_edges(side * side, &edges)
}

fn bench_dfs(c: &mut Criterion) {
    let graph = grid(200);
    let mut group = c.benchmark_group("dfs");
    group.throughput(Throughput::Elements(40_000));
    for (name, options) in [
        ("default", DfsOptions::new()),
        ("batch_64", DfsOptions::new().with_eviction_batch(64)),
        ("unbounded", DfsOptions::new().with_eviction_batch(40_000)),
    ] {
        group.bench_with_input(BenchmarkId::new("whole_graph", name), &options, |b, options| {
            b.iter(|| black_box(dfs_with_options(&graph, 0, &mut (), options)));
        });
    }
    group.finish();
}

fn bench_algorithms(c: &mut Criterion) {
    let graph = grid(100);
    c.bench_function("annotate_edges", |b| {
        b.iter(|| black_box(annotate_edges(&graph, None)));
    });

    let annotation = annotate_edges(&graph, None);
    c.bench_function("cut_vertices", |b| {
        b.iter(|| black_box(cut_vertices(&graph, &annotation, None)));
    });
    c.bench_function("biconnected_components", |b| {
        b.iter(|| {
            let mut nodes = 0usize;
            let blocks = biconnected_components_with(&graph, &annotation, None, |_, _| nodes += 1);
            black_box((blocks, nodes))
        });
    });
}

criterion_group!(benches, bench_dfs, bench_algorithms);
criterion_main!(benches);
