//! Performance benchmarks for graph comparison.
//!
//! Run with: `cargo bench --bench comparison`
//!
//! ## Workloads
//!
//! | Operation | Input | Notes |
//! |-----------|-------|-------|
//! | Segment resolution | n primitives, pairs merged | union-find + aggregation |
//! | Comparison | output vs reference | includes reconciliation |
//! | Tree extraction | resolved segment graph | BFS over segments |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use labelgraph_kernel::{DiffEngine, LabelGraph, SegmentResolver, TreeExtractor};

/// Build a chain of two-primitive symbols linked left to right.
///
/// `relabel_every` changes every k-th symbol's class, so the output differs
/// from the reference.
fn make_expression(symbols: usize, relabel_every: usize) -> LabelGraph {
    let mut graph = LabelGraph::new();
    for s in 0..symbols {
        let label = if relabel_every > 0 && s % relabel_every == 0 { "y" } else { "x" };
        let (a, b) = (format!("p{}", 2 * s), format!("p{}", 2 * s + 1));
        graph.add_node_label(a.as_str(), label, 1.0);
        graph.add_node_label(b.as_str(), label, 1.0);
        graph.add_edge_label(a.as_str(), b.as_str(), "*", 1.0);
        graph.add_edge_label(b.as_str(), a.as_str(), "*", 1.0);
        if s > 0 {
            let prev = format!("p{}", 2 * s - 1);
            graph.add_edge_label(prev.as_str(), a.as_str(), "R", 1.0);
        }
    }
    graph
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_segments");
    let resolver = SegmentResolver::new();

    for symbols in [10, 50, 200] {
        let graph = make_expression(symbols, 0);
        group.throughput(Throughput::Elements(graph.primitive_count() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(symbols), &graph, |b, graph| {
            b.iter(|| resolver.resolve(black_box(graph)))
        });
    }
    group.finish();
}

fn bench_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare");
    let engine = DiffEngine::new();

    for symbols in [10, 50, 200] {
        let output = make_expression(symbols, 3);
        let reference = make_expression(symbols, 0);
        group.throughput(Throughput::Elements(reference.primitive_count() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(symbols),
            &(output, reference),
            |b, (output, reference)| {
                b.iter(|| engine.compare(black_box(output.clone()), black_box(reference.clone())))
            },
        );
    }
    group.finish();
}

fn bench_compare_missing_primitives(c: &mut Criterion) {
    let engine = DiffEngine::new();
    let output = make_expression(40, 0);
    let reference = make_expression(50, 0);

    c.bench_function("compare_with_absent", |b| {
        b.iter(|| engine.compare(black_box(output.clone()), black_box(reference.clone())))
    });
}

fn bench_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_extraction");
    let extractor = TreeExtractor::new();

    for symbols in [10, 50, 200] {
        let segments = SegmentResolver::new().resolve(&make_expression(symbols, 0));
        group.bench_with_input(BenchmarkId::from_parameter(symbols), &segments, |b, segments| {
            b.iter(|| extractor.extract(black_box(segments)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_resolve,
    bench_compare,
    bench_compare_missing_primitives,
    bench_tree,
);
criterion_main!(benches);
