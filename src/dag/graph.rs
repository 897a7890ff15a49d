// src/dag/graph.rs

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use petgraph::algo::toposort;
use petgraph::dot::{Config, Dot};
use petgraph::graphmap::DiGraphMap;
use petgraph::unionfind::UnionFind;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::errors::{DaggenError, Result};
use crate::sampling::ExecutionTimes;

/// Node identity within one DAG. Assigned from 1 (the source) in creation order.
pub type NodeId = u32;

/// Fixed-shape node record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Topological layer depth.
    pub rank: u32,
    /// Set once the workload has been distributed.
    pub execution_time: Option<f64>,
}

/// Edge payload stored in the graph.
///
/// `weight` mirrors the tail node's execution time once it is known.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeData {
    pub weight: Option<f64>,
}

impl fmt::Display for EdgeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.weight {
            Some(w) => write!(f, "{w}"),
            None => write!(f, "n/a"),
        }
    }
}

/// Owned view of one edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub tail: NodeId,
    pub head: NodeId,
    pub weight: Option<f64>,
}

/// Precedence graph of one DAG task.
///
/// Structure lives in a petgraph `DiGraphMap` keyed by [`NodeId`] (which
/// keeps node and edge insertion order); node attributes live alongside it.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    graph: DiGraphMap<NodeId, EdgeData>,
    nodes: BTreeMap<NodeId, Node>,
    next_id: NodeId,
}

impl Default for TaskGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraphMap::new(),
            nodes: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Create the next node at `rank` and return its id.
    pub(crate) fn add_node(&mut self, rank: u32) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        self.graph.add_node(id);
        self.nodes.insert(
            id,
            Node {
                id,
                rank,
                execution_time: None,
            },
        );
        id
    }

    /// Add `tail -> head` unless that pair is already connected.
    ///
    /// Returns `true` when a new edge was inserted.
    pub(crate) fn connect(&mut self, tail: NodeId, head: NodeId) -> bool {
        debug_assert_ne!(tail, head, "self-loop on node {tail}");
        if self.graph.contains_edge(tail, head) {
            return false;
        }
        self.graph.add_edge(tail, head, EdgeData::default());
        true
    }

    /// Rebuild a graph from persisted parts, checking references.
    pub(crate) fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self> {
        let mut graph = TaskGraph::new();
        for node in nodes {
            if graph.nodes.contains_key(&node.id) {
                return Err(DaggenError::GraphFormat(format!(
                    "duplicate node id {}",
                    node.id
                )));
            }
            graph.graph.add_node(node.id);
            graph.next_id = graph.next_id.max(node.id + 1);
            graph.nodes.insert(node.id, node);
        }
        for edge in edges {
            if !graph.nodes.contains_key(&edge.tail) || !graph.nodes.contains_key(&edge.head) {
                return Err(DaggenError::GraphFormat(format!(
                    "edge {} -> {} references an unknown node",
                    edge.tail, edge.head
                )));
            }
            if edge.tail == edge.head {
                return Err(DaggenError::GraphFormat(format!(
                    "self-loop on node {}",
                    edge.tail
                )));
            }
            if !graph.connect(edge.tail, edge.head) {
                return Err(DaggenError::GraphFormat(format!(
                    "duplicate edge {} -> {}",
                    edge.tail, edge.head
                )));
            }
            if let Some(data) = graph.graph.edge_weight_mut(edge.tail, edge.head) {
                data.weight = edge.weight;
            }
        }
        Ok(graph)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.graph.all_edges().map(|(tail, head, data)| Edge {
            tail,
            head,
            weight: data.weight,
        })
    }

    pub fn contains_edge(&self, tail: NodeId, head: NodeId) -> bool {
        self.graph.contains_edge(tail, head)
    }

    /// Direct successors, in the order their edges were added.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.graph
            .neighbors_directed(id, Direction::Outgoing)
            .collect()
    }

    /// Direct predecessors.
    pub fn parents(&self, id: NodeId) -> Vec<NodeId> {
        self.graph
            .neighbors_directed(id, Direction::Incoming)
            .collect()
    }

    pub fn in_degree(&self, id: NodeId) -> usize {
        self.graph
            .neighbors_directed(id, Direction::Incoming)
            .count()
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.graph
            .neighbors_directed(id, Direction::Outgoing)
            .count()
    }

    /// Nodes without incoming edges.
    pub fn sources(&self) -> Vec<NodeId> {
        self.node_ids().filter(|&id| self.in_degree(id) == 0).collect()
    }

    /// Nodes without outgoing edges.
    pub fn sinks(&self) -> Vec<NodeId> {
        self.node_ids().filter(|&id| self.out_degree(id) == 0).collect()
    }

    pub fn max_rank(&self) -> u32 {
        self.nodes.values().map(|n| n.rank).max().unwrap_or(0)
    }

    pub fn topological_order(&self) -> Result<Vec<NodeId>> {
        toposort(&self.graph, None).map_err(|cycle| {
            DaggenError::InvalidState(format!(
                "cycle detected in task graph involving node {}",
                cycle.node_id()
            ))
        })
    }

    pub fn is_acyclic(&self) -> bool {
        toposort(&self.graph, None).is_ok()
    }

    /// Connected when edge directions are ignored.
    pub fn is_weakly_connected(&self) -> bool {
        if self.nodes.is_empty() {
            return false;
        }

        let position: HashMap<NodeId, usize> = self
            .node_ids()
            .enumerate()
            .map(|(pos, id)| (id, pos))
            .collect();
        let mut components = UnionFind::<usize>::new(position.len());
        for (tail, head, _) in self.graph.all_edges() {
            components.union(position[&tail], position[&head]);
        }

        let root = components.find(0);
        (1..position.len()).all(|pos| components.find(pos) == root)
    }

    /// Check the DAG task invariants: acyclic, weakly connected, exactly one
    /// source (node 1) and exactly one sink (the highest id).
    pub fn check_invariants(&self) -> Result<()> {
        if !self.is_acyclic() {
            return Err(DaggenError::InvalidState("task graph contains a cycle".into()));
        }
        if !self.is_weakly_connected() {
            return Err(DaggenError::InvalidState(
                "task graph is not weakly connected".into(),
            ));
        }

        let sources = self.sources();
        if sources != [1] {
            return Err(DaggenError::InvalidState(format!(
                "expected node 1 as the only source, found {sources:?}"
            )));
        }

        let last = self.nodes.keys().next_back().copied().unwrap_or(1);
        let sinks = self.sinks();
        if sinks != [last] {
            return Err(DaggenError::InvalidState(format!(
                "expected node {last} as the only sink, found {sinks:?}"
            )));
        }

        Ok(())
    }

    /// Copy execution times onto nodes, and each tail's time onto its
    /// outgoing edges.
    pub(crate) fn apply_execution_times(&mut self, times: &ExecutionTimes) -> Result<()> {
        for (id, node) in self.nodes.iter_mut() {
            let c = times.get(*id).ok_or_else(|| {
                DaggenError::InvalidState(format!("no execution time for node {id}"))
            })?;
            node.execution_time = Some(c);
        }

        let edges: Vec<(NodeId, NodeId)> =
            self.graph.all_edges().map(|(t, h, _)| (t, h)).collect();
        for (tail, head) in edges {
            let weight = self.nodes.get(&tail).and_then(|n| n.execution_time);
            if let Some(data) = self.graph.edge_weight_mut(tail, head) {
                data.weight = weight;
            }
        }

        Ok(())
    }

    /// Longest source-to-sink path, summing node execution times.
    ///
    /// `None` until every node carries an execution time.
    pub fn critical_path_length(&self) -> Option<f64> {
        let order = self.topological_order().ok()?;
        let mut finish: HashMap<NodeId, f64> = HashMap::with_capacity(order.len());

        for id in order {
            let c = self.nodes.get(&id)?.execution_time?;
            let start = self
                .graph
                .neighbors_directed(id, Direction::Incoming)
                .filter_map(|p| finish.get(&p).copied())
                .fold(0.0, f64::max);
            finish.insert(id, start + c);
        }

        finish.values().copied().reduce(f64::max)
    }

    /// Graphviz DOT source, one statement per node and edge.
    pub fn to_dot(&self) -> String {
        let node_attrs = |_: &DiGraphMap<NodeId, EdgeData>, (id, _): (NodeId, &NodeId)| {
            let rank = self.nodes.get(&id).map(|n| n.rank).unwrap_or(0);
            match self.nodes.get(&id).and_then(|n| n.execution_time) {
                Some(c) => format!("label = \"{id}\" rank = {rank} C = {c}"),
                None => format!("label = \"{id}\" rank = {rank}"),
            }
        };
        let edge_attrs =
            |_: &DiGraphMap<NodeId, EdgeData>, (_, _, data): (NodeId, NodeId, &EdgeData)| {
                match data.weight {
                    Some(w) => format!("label = \"{w}\""),
                    None => String::new(),
                }
            };

        let dot = Dot::with_attr_getters(
            &self.graph,
            &[Config::NodeNoLabel, Config::EdgeNoLabel],
            &edge_attrs,
            &node_attrs,
        );
        format!("{dot}")
    }
}
