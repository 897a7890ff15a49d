mod common;

use crate::common::{assert_task_shape, init_tracing, seeded_rng, TestResult};
use daggen::dag::{DagTaskset, ForkJoinParams, TasksetParams, Topology};
use daggen::errors::DaggenError;
use daggen::sampling::{PeriodPopulation, WorkloadOptions, DEFAULT_MAX_ATTEMPTS};
use daggen::types::UtilizationAlgorithm;

fn params(tasks: usize, utilization: f64, algorithm: UtilizationAlgorithm) -> TasksetParams {
    TasksetParams {
        task_count: tasks,
        total_utilization: utilization,
        periods: PeriodPopulation::Choices(vec![100, 200, 500]),
        core_ceiling: 1.0,
        util_algorithm: algorithm,
        max_attempts: DEFAULT_MAX_ATTEMPTS,
        topology: Topology::default(),
        workload: WorkloadOptions {
            round: false,
            dummy: false,
        },
    }
}

#[test]
fn taskset_scalars_match_their_tasks() -> TestResult {
    init_tracing();

    for algorithm in [UtilizationAlgorithm::UUniFastDiscard, UtilizationAlgorithm::Drs] {
        let p = params(4, 1.5, algorithm);
        let taskset = DagTaskset::generate(&p, &mut seeded_rng(10))?;

        assert_eq!(taskset.len(), 4);
        assert_eq!(taskset.total_utilization(), 1.5);
        let sum: f64 = taskset.utilizations().iter().sum();
        assert!((sum - 1.5).abs() < 1e-9);

        for (i, task) in taskset.iter().enumerate() {
            let u = taskset.utilizations()[i];
            let t = taskset.periods()[i];
            assert_eq!(task.index(), i);
            assert_eq!(task.utilization(), Some(u));
            assert_eq!(task.period(), Some(t));
            assert!([100, 200, 500].contains(&t));
            assert!(u <= 1.0);
            assert!((task.workload() - u * t as f64).abs() < 1e-9);
            assert_task_shape(task.graph().expect("graph generated"));
            assert!(task.execution_times().is_some());
        }

        // Without rounding the achieved utilization matches the target.
        assert!((taskset.achieved_utilization() - 1.5).abs() < 1e-6);
    }
    Ok(())
}

#[test]
fn drs_reaches_a_near_saturated_taskset() -> TestResult {
    let p = params(3, 2.9, UtilizationAlgorithm::Drs);
    let taskset = DagTaskset::generate(&p, &mut seeded_rng(1))?;
    assert!(taskset.utilizations().iter().all(|&u| u <= 1.0));
    Ok(())
}

#[test]
fn core_ceiling_bounds_each_task() -> TestResult {
    let mut p = params(2, 5.0, UtilizationAlgorithm::Drs);
    p.core_ceiling = 4.0;
    p.periods = PeriodPopulation::Range { min: 1000, max: 2000 };
    p.topology = Topology::ForkJoin(ForkJoinParams::default());

    let taskset = DagTaskset::generate(&p, &mut seeded_rng(4))?;
    assert!(taskset.utilizations().iter().all(|&u| u <= 4.0));
    assert!(taskset.periods().iter().all(|t| (1000..=2000).contains(t)));
    Ok(())
}

#[test]
fn generation_is_deterministic_per_seed() -> TestResult {
    let p = params(3, 0.9, UtilizationAlgorithm::UUniFastDiscard);
    let a = DagTaskset::generate(&p, &mut seeded_rng(77))?;
    let b = DagTaskset::generate(&p, &mut seeded_rng(77))?;

    assert_eq!(a.utilizations(), b.utilizations());
    assert_eq!(a.periods(), b.periods());
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.to_string(), y.to_string());
    }
    Ok(())
}

#[test]
fn over_capacity_taskset_is_infeasible() {
    let p = params(2, 2.5, UtilizationAlgorithm::Drs);
    match DagTaskset::generate(&p, &mut seeded_rng(1)) {
        Err(DaggenError::InfeasibleRequest(_)) => {}
        Err(e) => panic!("Expected InfeasibleRequest, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn empty_taskset_is_rejected() {
    let p = params(0, 0.5, UtilizationAlgorithm::Drs);
    match DagTaskset::generate(&p, &mut seeded_rng(1)) {
        Err(DaggenError::InvalidParameter { name, .. }) => assert_eq!(name, "n"),
        Err(e) => panic!("Expected InvalidParameter, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}
