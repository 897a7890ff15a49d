// src/sampling/workload.rs

//! Splitting a task's workload across its nodes.

use std::collections::BTreeMap;

use rand::Rng;

use crate::dag::NodeId;
use crate::errors::{DaggenError, Result};

/// Knobs for [`distribute_workload`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkloadOptions {
    /// Round every value to the nearest integer, never below 1.
    pub round: bool,
    /// Reserve node `1` and node `n` as unit-cost dummy source and sink.
    pub dummy: bool,
}

/// Per-node execution times produced by [`distribute_workload`].
///
/// With rounding enabled the achieved sum can drift from the target; both
/// are kept so callers can see by how much.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionTimes {
    times: BTreeMap<NodeId, f64>,
    target: f64,
}

impl ExecutionTimes {
    pub(crate) fn from_map(times: BTreeMap<NodeId, f64>, target: f64) -> Self {
        Self { times, target }
    }

    pub fn get(&self, id: NodeId) -> Option<f64> {
        self.times.get(&id).copied()
    }

    /// `(node id, execution time)` in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.times.iter().map(|(id, c)| (*id, *c))
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Requested total workload.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Sum of the assigned execution times.
    pub fn achieved(&self) -> f64 {
        self.times.values().sum()
    }

    /// `achieved - target`.
    pub fn drift(&self) -> f64 {
        self.achieved() - self.target
    }

    pub fn as_map(&self) -> &BTreeMap<NodeId, f64> {
        &self.times
    }
}

/// Distribute workload `w` over nodes `1..=n`.
///
/// Draws one uniform weight per distributed node and scales them so they sum
/// to `w`. In dummy mode nodes `1` and `n` get exactly `1` and the remaining
/// `w - 2` goes to nodes `2..n`.
pub fn distribute_workload<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    w: f64,
    options: WorkloadOptions,
) -> Result<ExecutionTimes> {
    if !w.is_finite() || w <= 0.0 {
        return Err(DaggenError::invalid(
            "w",
            format!("workload must be > 0 (got {w})"),
        ));
    }

    let mut times = BTreeMap::new();

    if options.dummy {
        if n < 3 {
            return Err(DaggenError::invalid(
                "n",
                format!("dummy source/sink needs at least 3 nodes (got {n})"),
            ));
        }
        if w <= 2.0 {
            return Err(DaggenError::invalid(
                "w",
                format!("dummy source/sink needs workload > 2 (got {w})"),
            ));
        }

        let inner = proportional_split(rng, n - 2, w - 2.0, options.round);
        times.insert(1, 1.0);
        for (offset, c) in inner.into_iter().enumerate() {
            times.insert(offset as NodeId + 2, c);
        }
        times.insert(n as NodeId, 1.0);
    } else {
        if n < 1 {
            return Err(DaggenError::invalid("n", "node count must be >= 1 (got 0)"));
        }
        for (offset, c) in proportional_split(rng, n, w, options.round)
            .into_iter()
            .enumerate()
        {
            times.insert(offset as NodeId + 1, c);
        }
    }

    Ok(ExecutionTimes { times, target: w })
}

fn proportional_split<R: Rng + ?Sized>(rng: &mut R, n: usize, w: f64, round: bool) -> Vec<f64> {
    let raw: Vec<f64> = (0..n).map(|_| rng.r#gen::<f64>()).collect();
    let factor = raw.iter().sum::<f64>() / w;

    raw.into_iter()
        .map(|c| {
            let scaled = c / factor;
            if round { scaled.round().max(1.0) } else { scaled }
        })
        .collect()
}
