// Copyright 2026 The Catlynet Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Benchmarks for the force-directed layout and edge geometry.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use catlynet_view::geometry::compute_path;
use catlynet_view::layout::NoProgress;
use catlynet_view::{
    EdgeKind, LayoutConfig, Position, Reaction, ReactionGraph, ReactionSystem, compute_layout,
};

/// A ring of reactions, each catalysed by the product two steps ahead.
fn create_ring_system(reactions: usize) -> ReactionSystem {
    let mut system = ReactionSystem::new(format!("ring_{reactions}"));
    for i in 0..reactions {
        let reactant = format!("m{i}");
        let product = format!("m{}", (i + 1) % reactions);
        let catalyst = format!("m{}", (i + 2) % reactions);
        system.reactions.push(
            Reaction::new(format!("r{i}"))
                .with_reactants(&[reactant.as_str()])
                .with_products(&[product.as_str()])
                .with_catalysts(&[catalyst.as_str()]),
        );
    }
    system
}

fn bench_layout_threads(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_threads");
    let (graph, _) = ReactionGraph::build(&create_ring_system(200));

    for threads in [1, 2, 4, 8] {
        let config = LayoutConfig {
            iterations: 50,
            threads,
            ..LayoutConfig::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(threads), &config, |b, config| {
            b.iter(|| compute_layout(black_box(&graph), config, &NoProgress))
        });
    }
    group.finish();
}

fn bench_layout_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_size");
    group.sample_size(10);

    for reactions in [25, 100, 400] {
        let (graph, _) = ReactionGraph::build(&create_ring_system(reactions));
        let config = LayoutConfig {
            iterations: 100,
            ..LayoutConfig::default()
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(graph.node_count()),
            &graph,
            |b, graph| b.iter(|| compute_layout(black_box(graph), &config, &NoProgress)),
        );
    }
    group.finish();
}

fn bench_compute_path(c: &mut Criterion) {
    let a = Position::new(-120.0, 35.0);
    let b = Position::new(260.0, -80.0);
    c.bench_function("compute_path", |bench| {
        bench.iter(|| compute_path(black_box(a), black_box(b), EdgeKind::Inhibitor, None, true))
    });
}

criterion_group!(
    benches,
    bench_layout_threads,
    bench_layout_size,
    bench_compute_path
);
criterion_main!(benches);
