#![allow(dead_code)]

use std::error::Error;

use daggen::dag::TaskGraph;

pub use daggen_test_utils::{init_tracing, seeded_rng, write_config};

pub type TestResult = Result<(), Box<dyn Error>>;

/// Structural checks every generated DAG task must pass.
pub fn assert_task_shape(graph: &TaskGraph) {
    assert!(graph.is_acyclic(), "graph has a cycle");
    assert!(graph.is_weakly_connected(), "graph is not weakly connected");

    let last = graph.node_ids().max().expect("graph has nodes");
    assert_eq!(graph.sources(), vec![1], "node 1 must be the only source");
    assert_eq!(graph.sinks(), vec![last], "node {last} must be the only sink");

    // Ids are dense, 1..=n.
    let ids: Vec<_> = graph.node_ids().collect();
    assert_eq!(ids, (1..=graph.node_count() as u32).collect::<Vec<_>>());

    for edge in graph.edges() {
        assert_ne!(edge.tail, edge.head, "self-loop on {}", edge.tail);
    }
}
