use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use hetnet::{Data, Graph, HetnetError, MetaGraph, MetaPath, PathOptions, PathSearchCache};

const GENES: usize = 2000;
const DISEASES: usize = 200;

/// Random hetnet with a fixed seed
fn random_hetnet() -> Graph {
    let metagraph = MetaGraph::from_edge_tuples(&[
        ("gene", "disease", "association", "both"),
        ("gene", "gene", "interaction", "both"),
    ])
    .expect("valid metagraph");
    let mut graph = Graph::new(metagraph);
    for i in 0..GENES {
        graph.add_node(&format!("G{i}"), "gene", Data::new()).unwrap();
    }
    for i in 0..DISEASES {
        graph.add_node(&format!("D{i}"), "disease", Data::new()).unwrap();
    }

    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..GENES * 3 {
        let a = format!("G{}", rng.gen_range(0..GENES));
        let b = format!("G{}", rng.gen_range(0..GENES));
        if a != b {
            add_unique_edge(&mut graph, &a, &b, "interaction");
        }
    }
    for _ in 0..GENES {
        let gene = format!("G{}", rng.gen_range(0..GENES));
        let disease = format!("D{}", rng.gen_range(0..DISEASES));
        add_unique_edge(&mut graph, &gene, &disease, "association");
    }
    graph
}

/// Adds the edge unless it was drawn before
fn add_unique_edge(graph: &mut Graph, source: &str, target: &str, kind: &str) {
    match graph.add_edge(source, target, kind, "both", Data::new()) {
        Ok(_) | Err(HetnetError::DuplicateEdge(_)) => {}
        Err(err) => panic!("cannot add {source} - {kind} - {target}: {err}"),
    }
}

fn paths_sequential(graph: &Graph, metapath: &MetaPath, times: usize) -> usize {
    let options = PathOptions::default();
    graph
        .nodes()
        .filter(|node| node.kind() == "gene")
        .take(times)
        .map(|node| graph.paths_from(node.index(), metapath, &options).unwrap().len())
        .sum()
}

fn paths_parallel(graph: &Graph, metapath: &MetaPath, times: usize) -> usize {
    let options = PathOptions::default();
    graph
        .nodes()
        .filter(|node| node.kind() == "gene")
        .take(times)
        .par_bridge()
        .map(|node| graph.paths_from(node.index(), metapath, &options).unwrap().len())
        .sum()
}

fn paths_cached(graph: &Graph, metapath: &MetaPath, times: usize) -> usize {
    let options = PathOptions::default();
    let mut cache = PathSearchCache::default();
    graph
        .nodes()
        .filter(|node| node.kind() == "gene")
        .take(times)
        .map(|node| {
            cache
                .paths_from(graph, node.index(), metapath, &options)
                .unwrap()
                .len()
        })
        .sum()
}

fn paths_benchmark(c: &mut Criterion) {
    let graph = random_hetnet();
    let metapath = graph.metagraph().parse_metapath("GiGiGaD").unwrap();

    c.bench_function("paths GiGiGaD 500", |b| {
        b.iter(|| paths_sequential(black_box(&graph), black_box(&metapath), black_box(500)))
    });

    c.bench_function("paths-parallel GiGiGaD 2000", |b| {
        b.iter(|| paths_parallel(black_box(&graph), black_box(&metapath), black_box(2000)))
    });

    c.bench_function("paths-cached GiGiGaD 500", |b| {
        b.iter(|| paths_cached(black_box(&graph), black_box(&metapath), black_box(500)))
    });
}

fn metapath_benchmark(c: &mut Criterion) {
    let metagraph = MetaGraph::from_edge_tuples(&[
        ("gene", "disease", "association", "both"),
        ("gene", "gene", "interaction", "both"),
        ("gene", "gene", "regulation", "forward"),
        ("compound", "gene", "target", "both"),
        ("compound", "disease", "treatment", "both"),
        ("disease", "disease", "resemblance", "both"),
        ("gene", "tissue", "expression", "both"),
        ("disease", "tissue", "localization", "both"),
    ])
    .unwrap();

    c.bench_function("extract metapaths compound-disease 4", |b| {
        b.iter(|| {
            metagraph
                .extract_metapaths(black_box("compound"), black_box("disease"), black_box(4))
                .unwrap()
                .len()
        })
    });
}

criterion_group!(paths, paths_benchmark, metapath_benchmark);
criterion_main!(paths);
