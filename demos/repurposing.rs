//! Computes compound-disease features on a small hetnet
//!
//! Usage: `cargo run --example repurposing [graph.json]`
//!
//! Without an argument a built-in toy network is used. The output is
//! tab separated, one row per compound-disease pair, followed by a
//! permutation test for the best scoring pair.
use std::env::args;

use rayon::prelude::*;

use hetnet::algorithms::features::{compute_features, FeatureQuery, FeatureRecord};
use hetnet::algorithms::{default_statistics, PathCounts};
use hetnet::stats::NullDistribution;
use hetnet::{Data, Direction, Graph, MetaGraph, PathOptions, Value};

const TREATMENT: &str = "treatment";
const PERMUTATIONS: u64 = 50;

fn named(name: &str) -> Data {
    Data::from([("name".to_string(), Value::from(name))])
}

/// A toy network of genes, diseases and compounds
fn toy_hetnet() -> Graph {
    let metagraph = MetaGraph::from_edge_tuples(&[
        ("gene", "disease", "association", "both"),
        ("gene", "gene", "interaction", "both"),
        ("compound", "gene", "target", "both"),
        ("compound", "disease", TREATMENT, "both"),
    ])
    .unwrap();
    let mut graph = Graph::new(metagraph);

    for gene in ["IL17", "IL6", "TNF", "INS", "APOE", "TP53"] {
        graph.add_node(gene, "gene", named(gene)).unwrap();
    }
    for (id, name) in [
        ("MS", "multiple sclerosis"),
        ("RA", "rheumatoid arthritis"),
        ("T2D", "type 2 diabetes"),
        ("AD", "Alzheimer's disease"),
    ] {
        graph.add_node(id, "disease", named(name)).unwrap();
    }
    for (id, name) in [("DB1", "secukinumab"), ("DB2", "tocilizumab"), ("DB3", "metformin")] {
        graph.add_node(id, "compound", named(name)).unwrap();
    }

    for (source, target, kind) in [
        ("IL17", "MS", "association"),
        ("IL17", "RA", "association"),
        ("IL6", "RA", "association"),
        ("TNF", "RA", "association"),
        ("TNF", "MS", "association"),
        ("INS", "T2D", "association"),
        ("APOE", "AD", "association"),
        ("APOE", "T2D", "association"),
        ("IL17", "IL6", "interaction"),
        ("IL6", "TNF", "interaction"),
        ("INS", "APOE", "interaction"),
        ("TP53", "IL6", "interaction"),
        ("DB1", "IL17", "target"),
        ("DB2", "IL6", "target"),
        ("DB3", "INS", "target"),
        ("DB1", "RA", TREATMENT),
        ("DB3", "T2D", TREATMENT),
    ] {
        graph.add_edge(source, target, kind, "both", Data::new()).unwrap();
    }
    graph
}

/// Builds one query per compound-disease pair, known treatments are positives
fn queries(graph: &Graph) -> Vec<FeatureQuery> {
    let compounds: Vec<_> = graph.nodes().filter(|n| n.kind() == "compound").collect();
    let diseases: Vec<_> = graph.nodes().filter(|n| n.kind() == "disease").collect();

    let mut queries = Vec::new();
    for compound in &compounds {
        for disease in &diseases {
            let query = FeatureQuery::new(compound.index(), disease.index());
            let query = match graph.find_edge(compound.id(), disease.id(), TREATMENT, Direction::Both) {
                // known treatments must not count their own edge
                Ok(edge) => query.status("1").exclude_edge(edge.index()),
                Err(_) => query.status("0"),
            };
            queries.push(query);
        }
    }
    queries
}

fn print_records(records: &[FeatureRecord]) {
    if let Some(first) = records.first() {
        println!("{}", first.header().join("\t"));
    }
    for record in records {
        println!("{}", record.row().join("\t"));
    }
}

fn main() {
    // log level is read from RUST_LOG
    simple_logger::SimpleLogger::new().env().init().unwrap();

    let graph = match args().nth(1) {
        Some(path) => Graph::from_json_file(path).unwrap(),
        None => toy_hetnet(),
    };
    println!("{graph:?}");

    let metapaths: Vec<_> = graph
        .metagraph()
        .extract_metapaths("compound", "disease", 3)
        .unwrap()
        .into_iter()
        .filter(|metapath| {
            // the direct treatment metapath is the label, not a feature
            metapath.len() > 1
        })
        .collect();
    let statistics = default_statistics();
    let options = PathOptions::default();

    let records: Vec<FeatureRecord> = queries(&graph)
        .par_iter()
        .map(|query| compute_features(&graph, query, &metapaths, &statistics, &options).unwrap())
        .collect();
    print_records(&records);

    // permutation test of the DWPC of the first metapath for the top pair
    let Some(metapath) = metapaths.first() else {
        return;
    };
    let column = format!("DWPC_0.4:{}", metapath.abbreviation(graph.metagraph()));
    let Some(best) = records
        .iter()
        .filter(|record| record.status() == "0")
        .max_by(|a, b| {
            let a = a.get(&column).flatten().unwrap_or_default();
            let b = b.get(&column).flatten().unwrap_or_default();
            a.total_cmp(&b)
        })
    else {
        return;
    };
    let observed = best.get(&column).flatten().unwrap_or_default();
    let source = graph.node_index(best.source()).unwrap();
    let target = graph.node_index(best.target()).unwrap();

    let null = NullDistribution::from_permutations(&graph, 0..PERMUTATIONS, |permuted| {
        let counts = PathCounts::compute(permuted, source, target, metapath, &options)?;
        Ok(Some(counts.dwpc(0.4)))
    })
    .unwrap();

    println!(
        "\n{} -> {} ({}): {column} = {observed:.4}",
        best.source(),
        best.target(),
        best.target_name().unwrap_or("-"),
    );
    println!(
        "null mean {:.4}, z-score {}, empirical p {:.3}",
        null.mean().unwrap_or_default(),
        null.z_score(observed)
            .map_or_else(|| "-".to_string(), |z| format!("{z:.3}")),
        null.empirical_pvalue(observed),
    );
}
