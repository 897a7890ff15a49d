mod common;

use std::collections::HashMap;

use crate::common::{assert_task_shape, init_tracing, seeded_rng, TestResult};
use daggen::dag::{DagTask, ForkJoinParams, LayeredParams, Topology};
use daggen::errors::DaggenError;
use daggen::sampling::WorkloadOptions;

fn unrounded() -> WorkloadOptions {
    WorkloadOptions {
        round: false,
        dummy: false,
    }
}

#[test]
fn computing_times_before_generating_is_an_error() {
    let mut task = DagTask::with_workload(0, 100.0);
    let mut rng = seeded_rng(1);

    match task.compute_execution_times(unrounded(), &mut rng) {
        Err(DaggenError::InvalidState(msg)) => assert!(msg.contains("Tau_0")),
        Err(e) => panic!("Expected InvalidState, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn generating_twice_is_an_error() -> TestResult {
    let mut task = DagTask::with_workload(2, 100.0);
    let mut rng = seeded_rng(1);
    task.generate(&Topology::default(), &mut rng)?;
    let edges_before = task.edge_count();

    match task.generate(&Topology::default(), &mut rng) {
        Err(DaggenError::InvalidState(msg)) => assert!(msg.contains("already")),
        Err(e) => panic!("Expected InvalidState, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
    // The first graph is untouched.
    assert_eq!(task.edge_count(), edges_before);
    Ok(())
}

#[test]
fn computing_times_twice_is_an_error() -> TestResult {
    let mut task = DagTask::with_workload(0, 100.0);
    let mut rng = seeded_rng(1);
    task.generate(&Topology::default(), &mut rng)?;
    task.compute_execution_times(unrounded(), &mut rng)?;

    assert!(matches!(
        task.compute_execution_times(unrounded(), &mut rng),
        Err(DaggenError::InvalidState(_))
    ));
    Ok(())
}

#[test]
fn edges_carry_their_tail_execution_time() -> TestResult {
    init_tracing();

    let topologies = [
        Topology::Layered(LayeredParams::default()),
        Topology::ForkJoin(ForkJoinParams::default()),
    ];
    for topology in topologies {
        let mut task = DagTask::with_workload(0, 5000.0);
        let mut rng = seeded_rng(8);
        task.generate(&topology, &mut rng)?;
        task.compute_execution_times(unrounded(), &mut rng)?;

        let graph = task.graph().expect("graph generated");
        assert_task_shape(graph);
        for edge in graph.edges() {
            let tail_c = graph.node(edge.tail).and_then(|n| n.execution_time);
            assert!(tail_c.is_some());
            assert_eq!(edge.weight, tail_c, "edge {} -> {}", edge.tail, edge.head);
        }

        let achieved = task.achieved_workload().expect("times assigned");
        assert!((achieved - 5000.0).abs() < 1e-6);
    }
    Ok(())
}

#[test]
fn critical_path_is_the_heaviest_source_to_sink_path() -> TestResult {
    let mut task = DagTask::with_workload(0, 1000.0);
    let mut rng = seeded_rng(13);
    task.generate(&Topology::default(), &mut rng)?;
    assert_eq!(task.critical_path_length(), None);

    let times = task.compute_execution_times(unrounded(), &mut rng)?.clone();
    let graph = task.graph().expect("graph generated");

    // Longest path by dynamic programming over a topological order.
    let mut finish: HashMap<u32, f64> = HashMap::new();
    for id in graph.topological_order()? {
        let start = graph
            .parents(id)
            .iter()
            .map(|p| finish[p])
            .fold(0.0, f64::max);
        finish.insert(id, start + times.get(id).expect("time for node"));
    }
    let sink = graph.sinks()[0];

    let length = task.critical_path_length().expect("critical path computed");
    assert!((length - finish[&sink]).abs() < 1e-9);
    assert!(length <= times.achieved() + 1e-9);
    assert!(length >= times.iter().map(|(_, c)| c).fold(0.0, f64::max));
    Ok(())
}

#[test]
fn dummy_nodes_are_the_source_and_the_sink() -> TestResult {
    let mut task = DagTask::with_workload(0, 400.0);
    let mut rng = seeded_rng(6);
    task.generate(&Topology::default(), &mut rng)?;
    let options = WorkloadOptions {
        round: true,
        dummy: true,
    };
    task.compute_execution_times(options, &mut rng)?;

    let graph = task.graph().expect("graph generated");
    let sink = graph.sinks()[0];
    assert_eq!(graph.node(1).and_then(|n| n.execution_time), Some(1.0));
    assert_eq!(graph.node(sink).and_then(|n| n.execution_time), Some(1.0));
    Ok(())
}

#[test]
fn utilization_follows_rounded_workload() -> TestResult {
    let mut task = DagTask::new(4, Some(0.25), Some(2000), 500.0);
    let mut rng = seeded_rng(2);
    task.generate(&Topology::default(), &mut rng)?;
    let options = WorkloadOptions {
        round: true,
        dummy: false,
    };
    let times = task.compute_execution_times(options, &mut rng)?;
    let achieved = times.achieved();

    assert_eq!(task.workload(), 500.0);
    assert_eq!(task.achieved_workload(), Some(achieved));
    assert_eq!(task.achieved_utilization(), Some(achieved / 2000.0));
    Ok(())
}

#[test]
fn display_is_dot_with_a_name_header() -> TestResult {
    let mut task = DagTask::with_workload(3, 100.0);
    let empty = task.to_string();
    assert!(empty.starts_with("// Tau_3\n"));

    let mut rng = seeded_rng(1);
    task.generate(&Topology::default(), &mut rng)?;
    task.compute_execution_times(unrounded(), &mut rng)?;

    let dot = task.to_string();
    assert_eq!(task.name(), "Tau_3");
    assert!(dot.starts_with("// Tau_3\ndigraph {"));
    assert!(dot.contains("rank = 0"));
    assert!(dot.contains("C = "));
    assert_eq!(dot.matches(" -> ").count(), task.edge_count());
    Ok(())
}

#[test]
fn standalone_tasks_have_no_utilization_or_period() {
    let task = DagTask::with_workload(0, 10.0);
    assert_eq!(task.utilization(), None);
    assert_eq!(task.period(), None);
    assert_eq!(task.achieved_utilization(), None);
    assert_eq!(task.node_count(), 0);
}
