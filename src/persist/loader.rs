// src/persist/loader.rs

//! Flattened view of a saved task for schedulability analyses.

use std::collections::BTreeMap;
use std::path::Path;

use crate::dag::NodeId;
use crate::errors::{DaggenError, Result};
use crate::fs::FileSystem;
use crate::persist::store::{self, PersistedDag};

/// A saved DAG task reduced to plain maps and lists.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTask {
    /// Node -> children, in edge order. The sink maps to an empty list.
    pub graph: BTreeMap<NodeId, Vec<NodeId>>,
    /// All node ids, ascending.
    pub nodes: Vec<NodeId>,
    /// Node -> execution time.
    pub exec_times: BTreeMap<NodeId, f64>,
    /// Execution times in node-id order.
    pub exec_list: Vec<f64>,
    /// `None` when the task was saved without a period.
    pub period: Option<u64>,
    /// Sum of all execution times.
    pub workload: f64,
}

/// Load `Tau_<index>` from `dir` in the flattened form.
///
/// A node's execution time comes from its `C` attribute, falling back to
/// the label of one of its outgoing edges. The sink defaults to `1` when it
/// carries no time of its own.
pub fn load_task(fs: &dyn FileSystem, dir: &Path, index: usize) -> Result<LoadedTask> {
    let path = dir.join(format!("{}.json", store::task_stem(index)));
    let contents = fs.read_to_string(&path)?;
    let dag: PersistedDag = serde_json::from_str(&contents)?;
    flatten(&dag)
}

pub(crate) fn flatten(dag: &PersistedDag) -> Result<LoadedTask> {
    let sink = dag
        .edges
        .iter()
        .map(|e| e.head)
        .max()
        .or_else(|| dag.nodes.iter().map(|n| n.id).max())
        .ok_or_else(|| DaggenError::GraphFormat("task has no nodes".into()))?;

    let mut graph: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
    let mut edge_labels: BTreeMap<NodeId, f64> = BTreeMap::new();
    for edge in &dag.edges {
        graph.entry(edge.tail).or_default().push(edge.head);
        if let Some(label) = edge.label {
            edge_labels.insert(edge.tail, label);
        }
    }
    graph.insert(sink, Vec::new());

    let mut exec_times = BTreeMap::new();
    for node in &dag.nodes {
        let c = node
            .execution_time
            .or_else(|| edge_labels.get(&node.id).copied())
            .or((node.id == sink).then_some(1.0))
            .ok_or_else(|| {
                DaggenError::GraphFormat(format!("node {} has no execution time", node.id))
            })?;
        exec_times.insert(node.id, c);
    }

    let nodes: Vec<NodeId> = exec_times.keys().copied().collect();
    let exec_list: Vec<f64> = exec_times.values().copied().collect();
    let workload: f64 = exec_list.iter().sum();
    let period = (dag.period >= 0.0).then(|| dag.period.round() as u64);

    Ok(LoadedTask {
        graph,
        nodes,
        exec_times,
        exec_list,
        period,
        workload,
    })
}
