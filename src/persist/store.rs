// src/persist/store.rs

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dag::{DagTask, Edge, Node, NodeId, TaskGraph};
use crate::errors::{DaggenError, Result};
use crate::fs::FileSystem;
use crate::persist::gml;

/// Stand-in for graph-level values that are not defined (e.g. `U` and `T`
/// of a single-DAG run).
pub const UNDEFINED: f64 = -1.0;

/// On-disk form of one DAG task.
///
/// Graph-level keys keep their short names (`Index`, `U`, `T`, `W`, `L`) so
/// existing analysis scripts can read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedDag {
    #[serde(rename = "Index")]
    pub index: usize,
    #[serde(rename = "U")]
    pub utilization: f64,
    #[serde(rename = "T")]
    pub period: f64,
    #[serde(rename = "W")]
    pub workload: f64,
    #[serde(rename = "L", default = "undefined")]
    pub critical_path_length: f64,
    pub nodes: Vec<PersistedNode>,
    pub edges: Vec<PersistedEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedNode {
    pub id: NodeId,
    pub rank: u32,
    #[serde(rename = "C", default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedEdge {
    pub tail: NodeId,
    pub head: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<f64>,
}

fn undefined() -> f64 {
    UNDEFINED
}

fn defined(value: f64) -> Option<f64> {
    (value >= 0.0).then_some(value)
}

impl TryFrom<&DagTask> for PersistedDag {
    type Error = DaggenError;

    fn try_from(task: &DagTask) -> Result<Self> {
        let graph = task.graph().ok_or_else(|| {
            DaggenError::InvalidState(format!("{} has no topology to save", task.name()))
        })?;

        Ok(PersistedDag {
            index: task.index(),
            utilization: task.utilization().unwrap_or(UNDEFINED),
            period: task.period().map_or(UNDEFINED, |t| t as f64),
            workload: task.workload(),
            critical_path_length: task.critical_path_length().unwrap_or(UNDEFINED),
            nodes: graph
                .nodes()
                .map(|n| PersistedNode {
                    id: n.id,
                    rank: n.rank,
                    execution_time: n.execution_time,
                })
                .collect(),
            edges: graph
                .edges()
                .map(|e| PersistedEdge {
                    tail: e.tail,
                    head: e.head,
                    label: e.weight,
                })
                .collect(),
        })
    }
}

impl TryFrom<PersistedDag> for DagTask {
    type Error = DaggenError;

    fn try_from(dag: PersistedDag) -> Result<Self> {
        let nodes = dag
            .nodes
            .into_iter()
            .map(|n| Node {
                id: n.id,
                rank: n.rank,
                execution_time: n.execution_time,
            })
            .collect();
        let edges = dag
            .edges
            .into_iter()
            .map(|e| Edge {
                tail: e.tail,
                head: e.head,
                weight: e.label,
            })
            .collect();
        let graph = TaskGraph::from_parts(nodes, edges)?;

        Ok(DagTask::from_parts(
            dag.index,
            defined(dag.utilization),
            defined(dag.period).map(|t| t.round() as u64),
            dag.workload,
            graph,
        ))
    }
}

/// File stem for task `index`: `Tau_<index>`.
pub fn task_stem(index: usize) -> String {
    format!("Tau_{index}")
}

/// Paths written by [`save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFiles {
    pub dot: PathBuf,
    pub json: PathBuf,
    pub gml: PathBuf,
}

/// Write `Tau_<i>.{dot,json,gml}` into `dir`.
pub fn save(fs: &dyn FileSystem, dir: &Path, task: &DagTask) -> Result<SavedFiles> {
    let persisted = PersistedDag::try_from(task)?;
    let stem = task_stem(task.index());

    let files = SavedFiles {
        dot: dir.join(format!("{stem}.dot")),
        json: dir.join(format!("{stem}.json")),
        gml: dir.join(format!("{stem}.gml")),
    };

    fs.write(&files.dot, task.to_string().as_bytes())?;
    fs.write(&files.json, serde_json::to_string_pretty(&persisted)?.as_bytes())?;
    fs.write(&files.gml, gml::write(&persisted)?.as_bytes())?;

    debug!(task = %stem, dir = ?dir, "saved task");
    Ok(files)
}

/// Reload `Tau_<index>.json` from `dir`.
pub fn load(fs: &dyn FileSystem, dir: &Path, index: usize) -> Result<DagTask> {
    let path = dir.join(format!("{}.json", task_stem(index)));
    let contents = fs.read_to_string(&path)?;
    let persisted: PersistedDag = serde_json::from_str(&contents)?;
    DagTask::try_from(persisted)
}

/// Reload `Tau_<index>.gml` from `dir`.
pub fn load_interchange(fs: &dyn FileSystem, dir: &Path, index: usize) -> Result<DagTask> {
    let path = dir.join(format!("{}.gml", task_stem(index)));
    let contents = fs.read_to_string(&path)?;
    let persisted = gml::parse(&contents)?;
    DagTask::try_from(persisted)
}
