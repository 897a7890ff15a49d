// src/dag/mod.rs

//! DAG task models.
//!
//! - [`graph`] holds the fixed-shape node/edge records and invariant checks.
//! - [`layered`] and [`fork_join`] are the two topology generators;
//!   [`topology`] selects between them.
//! - [`task`] is one DAG task (`Tau_<i>`) with its timing parameters.
//! - [`taskset`] composes utilization, periods, topology and workloads.

pub mod fork_join;
pub mod graph;
pub mod layered;
pub mod task;
pub mod taskset;
pub mod topology;

pub use fork_join::ForkJoinParams;
pub use graph::{Edge, EdgeData, Node, NodeId, TaskGraph};
pub use layered::LayeredParams;
pub use task::DagTask;
pub use taskset::{DagTaskset, TasksetParams};
pub use topology::Topology;
