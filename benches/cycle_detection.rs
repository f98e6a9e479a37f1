//! Benchmarks for the read-only graph passes
//!
//! Runs cycle detection and deployment-mode classification over large
//! synthetic module graphs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use depscope::graph::{classify_modes, detect_cycles, DependencyEdge, DependencyGraph};

/// Create a graph of `total_files` modules where each imports the next
/// `fan_out` modules, one external package, and every `back_edge_every`-th
/// module imports back to the start of the project.
fn create_large_graph(total_files: usize, fan_out: usize, back_edge_every: usize) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    let name = |i: usize| {
        let dir = match i % 4 {
            0 => "dev",
            1 => "prod",
            2 => "shared",
            _ => "features",
        };
        format!("src/{}/module_{}.js", dir, i)
    };

    for i in 0..total_files {
        graph.mark_scanned(&name(i));
    }

    for i in 0..total_files {
        let from = name(i);
        for j in 1..=fan_out {
            if i + j < total_files {
                graph.add_dependency(&from, DependencyEdge::internal(name(i + j)));
            }
        }
        graph.add_dependency(&from, DependencyEdge::external(format!("package-{}", i % 50)));
        if back_edge_every > 0 && i % back_edge_every == back_edge_every - 1 {
            graph.add_dependency(&from, DependencyEdge::internal(name(0)));
        }
    }

    graph
}

/// Benchmark cycle detection on acyclic and cyclic graphs
fn bench_detect_cycles(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_cycles");

    for size in [100, 1000, 5000, 10000].iter() {
        let acyclic = create_large_graph(*size, 3, 0);
        let cyclic = create_large_graph(*size, 3, 50);

        group.bench_with_input(BenchmarkId::new("acyclic", size), &acyclic, |b, graph| {
            b.iter(|| black_box(detect_cycles(graph)));
        });
        group.bench_with_input(BenchmarkId::new("cyclic", size), &cyclic, |b, graph| {
            b.iter(|| black_box(detect_cycles(graph)));
        });
    }

    group.finish();
}

/// Benchmark the petgraph-based existence check against full detection
fn bench_has_cycles(c: &mut Criterion) {
    let mut group = c.benchmark_group("has_cycles");

    for size in [1000, 10000].iter() {
        let graph = create_large_graph(*size, 3, 50);

        group.bench_with_input(BenchmarkId::new("files", size), &graph, |b, graph| {
            b.iter(|| black_box(graph.has_cycles()));
        });
    }

    group.finish();
}

/// Benchmark deployment-mode seeding and closure
fn bench_classify_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify_modes");

    for size in [100, 1000, 5000].iter() {
        let graph = create_large_graph(*size, 3, 50);

        group.bench_with_input(BenchmarkId::new("files", size), &graph, |b, graph| {
            b.iter(|| black_box(classify_modes(graph)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_detect_cycles,
    bench_has_cycles,
    bench_classify_modes
);
criterion_main!(benches);
