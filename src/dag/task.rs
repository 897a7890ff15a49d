// src/dag/task.rs

//! A single DAG task: scalar timing parameters plus its precedence graph.

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use tracing::{debug, warn};

use crate::dag::graph::TaskGraph;
use crate::dag::topology::Topology;
use crate::errors::{DaggenError, Result};
use crate::sampling::{distribute_workload, ExecutionTimes, WorkloadOptions};

/// Relative rounding drift above which a warning is logged.
const DRIFT_WARN_RATIO: f64 = 0.01;

/// One DAG task, named `Tau_<index>`.
///
/// Lifecycle: construct with scalars, call [`DagTask::generate`] exactly
/// once, then [`DagTask::compute_execution_times`] exactly once.
#[derive(Debug, Clone)]
pub struct DagTask {
    index: usize,
    utilization: Option<f64>,
    period: Option<u64>,
    workload: f64,
    critical_path_length: Option<f64>,
    graph: Option<TaskGraph>,
    execution_times: Option<ExecutionTimes>,
}

impl DagTask {
    pub fn new(index: usize, utilization: Option<f64>, period: Option<u64>, workload: f64) -> Self {
        Self {
            index,
            utilization,
            period,
            workload,
            critical_path_length: None,
            graph: None,
            execution_times: None,
        }
    }

    /// A task with only a workload: no utilization or period.
    pub fn with_workload(index: usize, workload: f64) -> Self {
        Self::new(index, None, None, workload)
    }

    /// Rebuild a task from persisted state. Execution times already on the
    /// nodes are taken as-is.
    pub(crate) fn from_parts(
        index: usize,
        utilization: Option<f64>,
        period: Option<u64>,
        workload: f64,
        graph: TaskGraph,
    ) -> Self {
        let critical_path_length = graph.critical_path_length();
        let execution_times = graph
            .nodes()
            .map(|n| n.execution_time.map(|c| (n.id, c)))
            .collect::<Option<BTreeMap<_, _>>>()
            .map(|times| ExecutionTimes::from_map(times, workload));
        Self {
            index,
            utilization,
            period,
            workload,
            critical_path_length,
            graph: Some(graph),
            execution_times,
        }
    }

    /// Populate the graph. Fails with `InvalidState` if it already exists.
    pub fn generate<R: Rng + ?Sized>(&mut self, topology: &Topology, rng: &mut R) -> Result<()> {
        if self.graph.is_some() {
            return Err(DaggenError::InvalidState(format!(
                "{} already has a generated topology",
                self.name()
            )));
        }

        let graph = topology.generate(rng)?;
        graph.check_invariants()?;

        debug!(
            task = %self.name(),
            kind = ?topology.kind(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "generated topology"
        );
        self.graph = Some(graph);
        Ok(())
    }

    /// Distribute this task's workload over its nodes and mirror each node's
    /// time onto its outgoing edges.
    ///
    /// The workload is the one given at construction (see [`DagTask::workload`]);
    /// `options` carries the rounding and dummy source/sink switches.
    pub fn compute_execution_times<R: Rng + ?Sized>(
        &mut self,
        options: WorkloadOptions,
        rng: &mut R,
    ) -> Result<&ExecutionTimes> {
        let name = self.name();
        if self.execution_times.is_some() {
            return Err(DaggenError::InvalidState(format!(
                "{name} already has execution times"
            )));
        }
        let graph = self.graph.as_mut().ok_or_else(|| {
            DaggenError::InvalidState(format!(
                "{name} has no topology; generate it before computing execution times"
            ))
        })?;

        let times = distribute_workload(rng, graph.node_count(), self.workload, options)?;
        graph.apply_execution_times(&times)?;
        self.critical_path_length = graph.critical_path_length();

        if times.drift().abs() > DRIFT_WARN_RATIO * times.target() {
            warn!(
                task = %name,
                target = times.target(),
                achieved = times.achieved(),
                "rounded execution times drift from the target workload"
            );
        }
        debug!(
            task = %name,
            workload = times.achieved(),
            critical_path = ?self.critical_path_length,
            "assigned execution times"
        );

        Ok(self.execution_times.insert(times))
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> String {
        format!("Tau_{}", self.index)
    }

    pub fn utilization(&self) -> Option<f64> {
        self.utilization
    }

    pub fn period(&self) -> Option<u64> {
        self.period
    }

    /// Target workload.
    pub fn workload(&self) -> f64 {
        self.workload
    }

    pub fn critical_path_length(&self) -> Option<f64> {
        self.critical_path_length
    }

    pub fn graph(&self) -> Option<&TaskGraph> {
        self.graph.as_ref()
    }

    pub fn execution_times(&self) -> Option<&ExecutionTimes> {
        self.execution_times.as_ref()
    }

    pub fn node_count(&self) -> usize {
        self.graph.as_ref().map_or(0, TaskGraph::node_count)
    }

    pub fn edge_count(&self) -> usize {
        self.graph.as_ref().map_or(0, TaskGraph::edge_count)
    }

    /// Sum of the node execution times actually assigned.
    pub fn achieved_workload(&self) -> Option<f64> {
        let graph = self.graph.as_ref()?;
        graph.nodes().map(|n| n.execution_time).sum()
    }

    /// `achieved_workload / period`.
    pub fn achieved_utilization(&self) -> Option<f64> {
        let period = self.period?;
        Some(self.achieved_workload()? / period as f64)
    }
}

/// DOT rendering of the task graph.
impl fmt::Display for DagTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.graph {
            Some(graph) => write!(f, "// {}\n{}", self.name(), graph.to_dot()),
            None => writeln!(f, "// {}\ndigraph {{\n}}", self.name()),
        }
    }
}
