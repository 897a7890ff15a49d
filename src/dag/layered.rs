// src/dag/layered.rs

//! Layer-by-layer random DAG generation.
//!
//! Node 1 is the source at rank 0. Each interior layer gets between 1 and
//! `parallelism` nodes, each connected to every node of the previous layer
//! with probability `connect_prob`. Nodes that end a layer without a parent
//! hang off the source; nodes that never gained a child feed the final sink.

use rand::Rng;
use tracing::trace;

use crate::dag::graph::{NodeId, TaskGraph};
use crate::errors::{DaggenError, Result};

/// Shape parameters for [`generate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayeredParams {
    /// Maximum nodes per interior layer.
    pub parallelism: u32,
    /// Minimum layer count, source and sink included.
    pub layer_num_min: u32,
    /// Maximum layer count, source and sink included.
    pub layer_num_max: u32,
    /// Probability of each candidate parent-child edge.
    pub connect_prob: f64,
}

impl Default for LayeredParams {
    fn default() -> Self {
        Self {
            parallelism: 8,
            layer_num_min: 5,
            layer_num_max: 12,
            connect_prob: 0.5,
        }
    }
}

impl LayeredParams {
    pub fn validate(&self) -> Result<()> {
        if self.parallelism < 1 {
            return Err(DaggenError::invalid(
                "parallelism",
                "must be >= 1 (got 0)",
            ));
        }
        if self.layer_num_min < 3 {
            return Err(DaggenError::invalid(
                "layer_num_min",
                format!("must be >= 3 (got {})", self.layer_num_min),
            ));
        }
        if self.layer_num_max < self.layer_num_min {
            return Err(DaggenError::invalid(
                "layer_num_max",
                format!(
                    "must be >= layer_num_min {} (got {})",
                    self.layer_num_min, self.layer_num_max
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.connect_prob) {
            return Err(DaggenError::invalid(
                "connect_prob",
                format!("must be within [0, 1] (got {})", self.connect_prob),
            ));
        }
        Ok(())
    }
}

/// Build one layered DAG.
///
/// Draw order: interior layer count; then per layer its width followed by
/// one Bernoulli trial per (new node, candidate parent) pair, new nodes in
/// creation order on the outside.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, params: &LayeredParams) -> Result<TaskGraph> {
    params.validate()?;

    let mut graph = TaskGraph::new();
    let root = graph.add_node(0);

    let interior_layers = rng.gen_range(
        params.layer_num_min.saturating_sub(2)..=params.layer_num_max.saturating_sub(2),
    );

    let mut parents: Vec<NodeId> = vec![root];
    let mut childless: Vec<NodeId> = Vec::new();
    let mut orphans: Vec<NodeId> = Vec::new();

    for layer in 0..interior_layers {
        let width = rng.gen_range(1..=params.parallelism);
        let layer_nodes: Vec<NodeId> = (0..width).map(|_| graph.add_node(layer + 1)).collect();

        // Every previous-layer node starts out childless.
        childless.extend(parents.iter().copied());

        let mut linked_children: Vec<NodeId> = Vec::new();
        let mut linked_parents: Vec<NodeId> = Vec::new();
        for &child in &layer_nodes {
            for &parent in &parents {
                if rng.r#gen::<f64>() < params.connect_prob {
                    graph.connect(parent, child);
                    linked_children.push(child);
                    linked_parents.push(parent);
                }
            }
        }

        childless.retain(|id| !linked_parents.contains(id));
        orphans.extend(
            layer_nodes
                .iter()
                .copied()
                .filter(|id| !linked_children.contains(id)),
        );

        for orphan in orphans.drain(..) {
            graph.connect(root, orphan);
        }

        trace!(
            layer = layer + 1,
            width,
            childless = childless.len(),
            "generated layer"
        );
        parents = layer_nodes;
    }

    let sink = graph.add_node(interior_layers + 1);
    for &node in parents.iter().chain(childless.iter()) {
        graph.connect(node, sink);
    }

    for orphan in orphans.drain(..) {
        graph.connect(root, orphan);
    }

    Ok(graph)
}
