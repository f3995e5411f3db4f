use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use hetnet::algorithms::default_statistics;
use hetnet::algorithms::features::{compute_features, FeatureQuery};
use hetnet::{
    permute_graph, Data, Graph, HetnetError, MetaGraph, MetaPath, PathOptions, PermutationConfig,
};

const GENES: usize = 1000;
const DISEASES: usize = 100;
const COMPOUNDS: usize = 100;

/// Random hetnet with a fixed seed
fn random_hetnet() -> Graph {
    let metagraph = MetaGraph::from_edge_tuples(&[
        ("gene", "disease", "association", "both"),
        ("gene", "gene", "interaction", "both"),
        ("compound", "gene", "target", "both"),
        ("compound", "disease", "treatment", "both"),
    ])
    .expect("valid metagraph");
    let mut graph = Graph::new(metagraph);
    for (prefix, kind, count) in [("G", "gene", GENES), ("D", "disease", DISEASES), ("C", "compound", COMPOUNDS)] {
        for i in 0..count {
            graph.add_node(&format!("{prefix}{i}"), kind, Data::new()).unwrap();
        }
    }

    let mut rng = StdRng::seed_from_u64(7);
    let mut add = |source: String, target: String, kind: &str| {
        // edges drawn twice are skipped
        match graph.add_edge(&source, &target, kind, "both", Data::new()) {
            Ok(_) | Err(HetnetError::DuplicateEdge(_)) => {}
            Err(err) => panic!("cannot add {source} - {kind} - {target}: {err}"),
        }
    };
    for _ in 0..GENES * 3 {
        let a = rng.gen_range(0..GENES);
        let b = rng.gen_range(0..GENES);
        if a != b {
            add(format!("G{a}"), format!("G{b}"), "interaction");
        }
    }
    for _ in 0..GENES {
        add(format!("G{}", rng.gen_range(0..GENES)), format!("D{}", rng.gen_range(0..DISEASES)), "association");
    }
    for _ in 0..COMPOUNDS * 4 {
        add(format!("C{}", rng.gen_range(0..COMPOUNDS)), format!("G{}", rng.gen_range(0..GENES)), "target");
    }
    for _ in 0..COMPOUNDS {
        add(format!("C{}", rng.gen_range(0..COMPOUNDS)), format!("D{}", rng.gen_range(0..DISEASES)), "treatment");
    }
    graph
}

fn queries(graph: &Graph, times: usize) -> Vec<FeatureQuery> {
    let compounds: Vec<_> = graph.nodes().filter(|n| n.kind() == "compound").map(|n| n.index()).collect();
    let diseases: Vec<_> = graph.nodes().filter(|n| n.kind() == "disease").map(|n| n.index()).collect();
    compounds
        .iter()
        .flat_map(|c| diseases.iter().map(move |d| FeatureQuery::new(*c, *d)))
        .take(times)
        .collect()
}

fn features_sequential(graph: &Graph, metapaths: &[MetaPath], queries: &[FeatureQuery]) -> usize {
    let statistics = default_statistics();
    let options = PathOptions::default();
    queries
        .iter()
        .map(|query| {
            compute_features(graph, query, metapaths, &statistics, &options)
                .unwrap()
                .values()
                .len()
        })
        .sum()
}

fn features_parallel(graph: &Graph, metapaths: &[MetaPath], queries: &[FeatureQuery]) -> usize {
    let statistics = default_statistics();
    let options = PathOptions::default();
    queries
        .par_iter()
        .map(|query| {
            compute_features(graph, query, metapaths, &statistics, &options)
                .unwrap()
                .values()
                .len()
        })
        .sum()
}

fn features_benchmark(c: &mut Criterion) {
    let graph = random_hetnet();
    let metapaths = graph
        .metagraph()
        .extract_metapaths("compound", "disease", 3)
        .unwrap();
    let batch = queries(&graph, 1000);

    c.bench_function("features 1000 pairs", |b| {
        b.iter(|| features_sequential(black_box(&graph), black_box(&metapaths), black_box(&batch)))
    });

    c.bench_function("features-parallel 1000 pairs", |b| {
        b.iter(|| features_parallel(black_box(&graph), black_box(&metapaths), black_box(&batch)))
    });
}

fn permutation_benchmark(c: &mut Criterion) {
    let graph = random_hetnet();
    c.bench_function("permute graph", |b| {
        b.iter(|| {
            permute_graph(black_box(&graph), &PermutationConfig::new(black_box(1)))
                .unwrap()
                .edge_count()
        })
    });
}

criterion_group! {
    name = features;
    config = Criterion::default().sample_size(20).measurement_time(Duration::from_secs(10));
    targets = features_benchmark, permutation_benchmark
}
criterion_main!(features);
