// src/engine/runner.rs

use rand::Rng;
use tracing::info;

use crate::config::ConfigFile;
use crate::dag::{DagTask, DagTaskset, TasksetParams, Topology};
use crate::errors::{DaggenError, Result};
use crate::sampling::WorkloadOptions;

/// Standalone DAGs sharing one fixed workload.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleDagRun {
    /// Number of DAGs.
    pub count: usize,
    pub workload: f64,
    pub topology: Topology,
    pub options: WorkloadOptions,
}

/// Several independent tasksets built from the same parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiDagRun {
    /// Number of tasksets.
    pub set_count: usize,
    pub taskset: TasksetParams,
}

impl SingleDagRun {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self {
            count: cfg.single_task.set_number,
            workload: cfg.single_task.workload,
            topology: cfg.dag_config.topology(),
            options: cfg.workload_options(),
        }
    }
}

impl MultiDagRun {
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        Ok(Self {
            set_count: cfg.multi_task.set_number,
            taskset: cfg.taskset_params()?,
        })
    }
}

/// Generate `run.count` DAGs, each with the full workload and no
/// utilization or period.
pub fn generate_single<R: Rng + ?Sized>(run: &SingleDagRun, rng: &mut R) -> Result<Vec<DagTask>> {
    if run.count == 0 {
        return Err(DaggenError::invalid("set_number", "must be >= 1 (got 0)"));
    }
    run.topology.validate()?;

    let mut tasks = Vec::with_capacity(run.count);
    for index in 0..run.count {
        let mut task = DagTask::with_workload(index, run.workload);
        task.generate(&run.topology, rng)?;
        task.compute_execution_times(run.options, rng)?;
        tasks.push(task);
    }

    info!(dags = tasks.len(), workload = run.workload, "generated standalone DAGs");
    Ok(tasks)
}

/// Generate `run.set_count` tasksets in sequence from one RNG.
pub fn generate_multi<R: Rng + ?Sized>(run: &MultiDagRun, rng: &mut R) -> Result<Vec<DagTaskset>> {
    if run.set_count == 0 {
        return Err(DaggenError::invalid("set_number", "must be >= 1 (got 0)"));
    }

    (0..run.set_count)
        .map(|set_index| {
            info!(set_index, "generating taskset");
            DagTaskset::generate(&run.taskset, rng)
        })
        .collect()
}
