// src/sampling/mod.rs

//! Scalar samplers feeding DAG generation.
//!
//! - [`utilization`] splits a total utilization across tasks (UUniFast-discard, DRS).
//! - [`period`] draws task periods from a population.
//! - [`workload`] distributes a task's workload over its nodes.

pub mod period;
pub mod utilization;
pub mod workload;

pub use period::{sample_periods, PeriodPopulation};
pub use utilization::{
    drs, split_utilization, uunifast, uunifast_discard, UtilizationSplit, DEFAULT_MAX_ATTEMPTS,
};
pub use workload::{distribute_workload, ExecutionTimes, WorkloadOptions};
