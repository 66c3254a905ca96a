use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use rxnet::prelude::*;

/// A linear chain X0 <--> X1 <--> ... <--> Xn with one decay reaction per species
fn setup_chain(n: usize) -> ReactionNetwork {
    let mut source = String::new();
    for i in 0..n {
        source.push_str(&format!("(kf{i}, kb{i}), X{i} <--> X{}\n", i + 1));
        source.push_str(&format!("d, X{i} --> 0\n"));
    }
    parse_network(&source).expect("Failed to parse chain network")
}

fn benchmark_graphs(c: &mut Criterion) {
    let network = setup_chain(200);

    c.bench_function("reaction_to_reaction_graph", |b| {
        b.iter(|| black_box(reaction_to_reaction_graph(black_box(&network))));
    });

    c.bench_function("net_stoichiometry_matrix", |b| {
        b.iter(|| black_box(net_stoichiometry_matrix(black_box(&network))));
    });

    c.bench_function("parse_chain", |b| {
        b.iter(|| black_box(setup_chain(black_box(50))));
    });
}

criterion_group!(benches, benchmark_graphs);
criterion_main!(benches);
