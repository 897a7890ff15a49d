use proptest::prelude::*;

use crate::common::{assert_task_shape, seeded_rng};
use daggen::dag::{DagTask, ForkJoinParams, LayeredParams, Topology};
use daggen::sampling::WorkloadOptions;

// Strategy for valid layered shapes: min >= 3 and max >= min by construction.
fn layered_strategy() -> impl Strategy<Value = LayeredParams> {
    (1u32..=6, 3u32..=8, 0u32..=4, 0.0f64..=1.0).prop_map(|(parallelism, min, extra, p)| {
        LayeredParams {
            parallelism,
            layer_num_min: min,
            layer_num_max: min + extra,
            connect_prob: p,
        }
    })
}

fn fork_join_strategy() -> impl Strategy<Value = ForkJoinParams> {
    (1u32..=4, 0.0f64..=1.0, 0.0f64..=1.0, 1u32..=3, 0u32..=2).prop_map(
        |(depth, fork_prob, join_prob, width_min, extra)| ForkJoinParams {
            depth,
            fork_prob,
            join_prob,
            fork_width_min: width_min,
            fork_width_max: width_min + extra,
        },
    )
}

fn topology_strategy() -> impl Strategy<Value = Topology> {
    prop_oneof![
        layered_strategy().prop_map(Topology::Layered),
        fork_join_strategy().prop_map(Topology::ForkJoin),
    ]
}

proptest! {
    #[test]
    fn layered_graphs_keep_their_shape(params in layered_strategy(), seed in any::<u64>()) {
        let graph = daggen::dag::layered::generate(&mut seeded_rng(seed), &params).unwrap();
        assert_task_shape(&graph);

        let layers = graph.max_rank() + 1;
        prop_assert!(layers >= params.layer_num_min && layers <= params.layer_num_max);
    }

    #[test]
    fn fork_join_graphs_keep_their_shape(params in fork_join_strategy(), seed in any::<u64>()) {
        let graph = daggen::dag::fork_join::generate(&mut seeded_rng(seed), &params).unwrap();
        assert_task_shape(&graph);
        prop_assert!(graph.out_degree(1) >= params.fork_width_min as usize);
    }

    #[test]
    fn annotated_tasks_mirror_times_onto_edges(
        topology in topology_strategy(),
        seed in any::<u64>(),
        workload in 3.0f64..100_000.0,
        round in any::<bool>(),
        dummy in any::<bool>(),
    ) {
        let mut rng = seeded_rng(seed);
        let mut task = DagTask::with_workload(0, workload);
        task.generate(&topology, &mut rng).unwrap();
        // Dummy nodes need a distinct source and sink plus one inner node.
        let dummy = dummy && task.node_count() >= 3;
        task.compute_execution_times(WorkloadOptions { round, dummy }, &mut rng).unwrap();

        let graph = task.graph().unwrap();
        for edge in graph.edges() {
            let tail_c = graph.node(edge.tail).and_then(|n| n.execution_time);
            prop_assert_eq!(edge.weight, tail_c);
        }

        let achieved = task.achieved_workload().unwrap();
        if !round {
            prop_assert!((achieved - workload).abs() <= 1e-9 * workload);
        }
        let critical = task.critical_path_length().unwrap();
        prop_assert!(critical <= achieved + 1e-9 * achieved);
    }
}
