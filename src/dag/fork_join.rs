// src/dag/fork_join.rs

//! Nested fork-join DAG generation.

use std::collections::{BTreeMap, HashMap, HashSet};

use rand::Rng;
use tracing::trace;

use crate::dag::graph::{NodeId, TaskGraph};
use crate::errors::{DaggenError, Result};

/// Shape parameters for [`generate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForkJoinParams {
    /// Number of fork rounds.
    pub depth: u32,
    /// Probability that an open node forks in a round (the source always does).
    pub fork_prob: f64,
    /// Probability that an open node is eligible for joining.
    pub join_prob: f64,
    pub fork_width_min: u32,
    pub fork_width_max: u32,
}

impl Default for ForkJoinParams {
    fn default() -> Self {
        Self {
            depth: 5,
            fork_prob: 0.3,
            join_prob: 0.8,
            fork_width_min: 2,
            fork_width_max: 4,
        }
    }
}

impl ForkJoinParams {
    pub fn validate(&self) -> Result<()> {
        if self.depth < 1 {
            return Err(DaggenError::invalid("depth", "must be >= 1 (got 0)"));
        }
        for (name, p) in [("fork_prob", self.fork_prob), ("join_prob", self.join_prob)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(DaggenError::invalid(
                    name,
                    format!("must be within [0, 1] (got {p})"),
                ));
            }
        }
        if self.fork_width_min < 1 {
            return Err(DaggenError::invalid(
                "fork_width_min",
                "must be >= 1 (got 0)",
            ));
        }
        if self.fork_width_max < self.fork_width_min {
            return Err(DaggenError::invalid(
                "fork_width_max",
                format!(
                    "must be >= fork_width_min {} (got {})",
                    self.fork_width_min, self.fork_width_max
                ),
            ));
        }
        Ok(())
    }
}

/// Build one nested fork-join DAG.
///
/// Fork phase: for `depth` rounds every open node draws a fork decision and,
/// when it forks, a width; its children replace it in the open set. Join
/// phase: each open node draws a join-eligibility flag, then for every
/// ancestor (ascending id) whose open descendants are all still eligible a
/// join node merges them. Any remaining open nodes are tied to one sink; a
/// single surviving open node is the sink itself.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, params: &ForkJoinParams) -> Result<TaskGraph> {
    params.validate()?;

    let mut graph = TaskGraph::new();
    let root = graph.add_node(0);
    let mut rank = 1u32;

    let mut open: Vec<NodeId> = vec![root];
    let mut ancestors: HashMap<NodeId, Vec<NodeId>> = HashMap::from([(root, Vec::new())]);

    for round in 0..params.depth {
        let mut next_open = Vec::with_capacity(open.len());
        let mut forked = false;

        for &node in &open {
            let roll: f64 = rng.r#gen();
            if roll < params.fork_prob || node == root {
                let width = rng.gen_range(params.fork_width_min..=params.fork_width_max);
                let mut lineage = ancestors.get(&node).cloned().unwrap_or_default();
                lineage.push(node);

                for _ in 0..width {
                    let child = graph.add_node(rank);
                    graph.connect(node, child);
                    ancestors.insert(child, lineage.clone());
                    next_open.push(child);
                }
                forked = true;
            } else {
                next_open.push(node);
            }
        }

        if forked {
            rank += 1;
        }
        trace!(round, open = next_open.len(), "fork round");
        open = next_open;
    }

    // Reverse index: ancestor -> open descendants, in open-set order.
    let mut descendants: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
    for &node in &open {
        for &ancestor in ancestors.get(&node).map(Vec::as_slice).unwrap_or(&[]) {
            descendants.entry(ancestor).or_default().push(node);
        }
    }

    let mut eligible: HashSet<NodeId> = HashSet::new();
    for &node in &open {
        if rng.r#gen::<f64>() < params.join_prob {
            eligible.insert(node);
        }
    }

    let mut joined = false;
    for (ancestor, group) in &descendants {
        if !group.iter().all(|node| eligible.contains(node)) {
            continue;
        }

        let join = graph.add_node(rank);
        for &node in group {
            graph.connect(node, join);
            eligible.remove(&node);
        }
        open.retain(|node| !group.contains(node));
        open.push(join);
        joined = true;
        trace!(ancestor, join, merged = group.len(), "joined branches");
    }

    if joined {
        rank += 1;
    }

    if open.len() > 1 {
        let sink = graph.add_node(rank);
        for &node in &open {
            graph.connect(node, sink);
        }
    }

    Ok(graph)
}
