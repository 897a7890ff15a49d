// src/dag/taskset.rs

//! Groups of DAG tasks sharing one utilization/period sampling run.

use rand::Rng;
use tracing::{debug, info};

use crate::dag::task::DagTask;
use crate::dag::topology::Topology;
use crate::errors::{DaggenError, Result};
use crate::sampling::{
    split_utilization, PeriodPopulation, UtilizationSplit, WorkloadOptions,
};
use crate::types::UtilizationAlgorithm;

/// Everything needed to generate one taskset.
#[derive(Debug, Clone, PartialEq)]
pub struct TasksetParams {
    pub task_count: usize,
    pub total_utilization: f64,
    pub periods: PeriodPopulation,
    /// Per-task utilization ceiling (the core count).
    pub core_ceiling: f64,
    pub util_algorithm: UtilizationAlgorithm,
    /// Retry ceiling for UUniFast-discard.
    pub max_attempts: usize,
    pub topology: Topology,
    pub workload: WorkloadOptions,
}

impl TasksetParams {
    pub fn validate(&self) -> Result<()> {
        self.split().validate()?;
        self.periods.validate()?;
        self.topology.validate()
    }

    fn split(&self) -> UtilizationSplit {
        UtilizationSplit::new(self.task_count, self.total_utilization).with_ulimit(self.core_ceiling)
    }
}

/// Ordered DAG tasks from one generation run.
#[derive(Debug, Clone)]
pub struct DagTaskset {
    total_utilization: f64,
    utilizations: Vec<f64>,
    periods: Vec<u64>,
    tasks: Vec<DagTask>,
}

impl DagTaskset {
    /// Split the utilization, sample the periods, then build and annotate
    /// one DAG per task with workload `utilization[i] * period[i]`.
    pub fn generate<R: Rng + ?Sized>(params: &TasksetParams, rng: &mut R) -> Result<Self> {
        params.validate()?;

        let utilizations = split_utilization(
            rng,
            params.util_algorithm,
            &params.split(),
            params.max_attempts,
        )?
        .into_iter()
        .next()
        .ok_or_else(|| DaggenError::InvalidState("utilization split returned no set".into()))?;

        let periods = params.periods.sample(rng, params.task_count)?;
        debug!(?utilizations, ?periods, "sampled taskset scalars");

        let mut tasks = Vec::with_capacity(params.task_count);
        for (i, (&u, &t)) in utilizations.iter().zip(periods.iter()).enumerate() {
            let workload = u * t as f64;
            let mut task = DagTask::new(i, Some(u), Some(t), workload);
            task.generate(&params.topology, rng)?;
            task.compute_execution_times(params.workload, rng)?;
            tasks.push(task);
        }

        let taskset = Self {
            total_utilization: params.total_utilization,
            utilizations,
            periods,
            tasks,
        };
        info!(
            tasks = taskset.len(),
            target = taskset.total_utilization,
            achieved = taskset.achieved_utilization(),
            "generated taskset"
        );
        Ok(taskset)
    }

    /// Target total utilization.
    pub fn total_utilization(&self) -> f64 {
        self.total_utilization
    }

    /// Sampled per-task utilizations; they sum to the target.
    pub fn utilizations(&self) -> &[f64] {
        &self.utilizations
    }

    pub fn periods(&self) -> &[u64] {
        &self.periods
    }

    pub fn tasks(&self) -> &[DagTask] {
        &self.tasks
    }

    pub fn iter(&self) -> impl Iterator<Item = &DagTask> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Sum of per-task utilizations after execution-time rounding.
    pub fn achieved_utilization(&self) -> f64 {
        self.tasks
            .iter()
            .filter_map(DagTask::achieved_utilization)
            .sum()
    }
}
