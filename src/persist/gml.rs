// src/persist/gml.rs

//! Minimal GML reader/writer for DAG tasks.
//!
//! Nodes get a 0-based GML `id` in ascending node-id order and carry the real
//! node id as their `label`; edges refer to the GML ids.

use std::collections::HashMap;
use std::fmt::{self, Write as _};

use crate::dag::NodeId;
use crate::errors::{DaggenError, Result};
use crate::persist::store::{PersistedDag, PersistedEdge, PersistedNode, UNDEFINED};

/// Serialise a task as a directed GML graph.
pub fn write(dag: &PersistedDag) -> Result<String> {
    let mut out = String::new();
    write_graph(&mut out, dag)
        .map_err(|e| DaggenError::GraphFormat(format!("failed to render GML: {e}")))?;
    Ok(out)
}

fn write_graph(out: &mut String, dag: &PersistedDag) -> fmt::Result {
    writeln!(out, "graph [")?;
    writeln!(out, "  directed 1")?;
    writeln!(out, "  Index {}", dag.index)?;
    writeln!(out, "  U {}", dag.utilization)?;
    writeln!(out, "  T {}", dag.period)?;
    writeln!(out, "  W {}", dag.workload)?;
    writeln!(out, "  L {}", dag.critical_path_length)?;

    let mut gml_ids: HashMap<NodeId, usize> = HashMap::with_capacity(dag.nodes.len());
    for (gml_id, node) in dag.nodes.iter().enumerate() {
        gml_ids.insert(node.id, gml_id);
        writeln!(out, "  node [")?;
        writeln!(out, "    id {gml_id}")?;
        writeln!(out, "    label \"{}\"", node.id)?;
        writeln!(out, "    rank {}", node.rank)?;
        if let Some(c) = node.execution_time {
            writeln!(out, "    C {c}")?;
        }
        writeln!(out, "  ]")?;
    }

    for edge in &dag.edges {
        let (Some(source), Some(target)) = (gml_ids.get(&edge.tail), gml_ids.get(&edge.head))
        else {
            continue;
        };
        writeln!(out, "  edge [")?;
        writeln!(out, "    source {source}")?;
        writeln!(out, "    target {target}")?;
        if let Some(label) = edge.label {
            writeln!(out, "    label {label}")?;
        }
        writeln!(out, "  ]")?;
    }

    writeln!(out, "]")
}

/// Parse GML text produced by [`write`] (or any GML using the same keys).
pub fn parse(text: &str) -> Result<PersistedDag> {
    let tokens = tokenize(text)?;
    let mut pos = 0;
    let top = parse_list(&tokens, &mut pos, false)?;

    let graph = top
        .iter()
        .find_map(|(key, value)| match (key.as_str(), value) {
            ("graph", Value::List(items)) => Some(items),
            _ => None,
        })
        .ok_or_else(|| DaggenError::GraphFormat("missing top-level `graph [ ... ]`".into()))?;

    let mut dag = PersistedDag {
        index: 0,
        utilization: UNDEFINED,
        period: UNDEFINED,
        workload: UNDEFINED,
        critical_path_length: UNDEFINED,
        nodes: Vec::new(),
        edges: Vec::new(),
    };
    let mut node_ids: HashMap<i64, NodeId> = HashMap::new();
    let mut raw_edges: Vec<&[(String, Value)]> = Vec::new();

    for (key, value) in graph {
        match (key.as_str(), value) {
            ("Index", v) => dag.index = v.number("Index")? as usize,
            ("U", v) => dag.utilization = v.number("U")?,
            ("T", v) => dag.period = v.number("T")?,
            ("W", v) => dag.workload = v.number("W")?,
            ("L", v) => dag.critical_path_length = v.number("L")?,
            ("node", Value::List(items)) => {
                let gml_id = field(items, "id")?.number("node.id")? as i64;
                let id = match lookup(items, "label") {
                    Some(Value::Str(s)) => s.parse::<NodeId>().map_err(|_| {
                        DaggenError::GraphFormat(format!("node label {s:?} is not a node id"))
                    })?,
                    Some(v) => v.number("node.label")? as NodeId,
                    None => (gml_id + 1) as NodeId,
                };
                let rank = match lookup(items, "rank") {
                    Some(v) => v.number("node.rank")? as u32,
                    None => 0,
                };
                let execution_time = lookup(items, "C").map(|v| v.number("node.C")).transpose()?;
                node_ids.insert(gml_id, id);
                dag.nodes.push(PersistedNode {
                    id,
                    rank,
                    execution_time,
                });
            }
            ("edge", Value::List(items)) => raw_edges.push(items),
            _ => {}
        }
    }

    for items in raw_edges {
        let endpoint = |key: &'static str| -> Result<NodeId> {
            let gml_id = field(items, key)?.number(key)? as i64;
            node_ids.get(&gml_id).copied().ok_or_else(|| {
                DaggenError::GraphFormat(format!("edge {key} {gml_id} is not a known node"))
            })
        };
        let tail = endpoint("source")?;
        let head = endpoint("target")?;
        let label = match lookup(items, "label") {
            Some(Value::Str(_)) | None => None,
            Some(v) => Some(v.number("edge.label")?),
        };
        dag.edges.push(PersistedEdge { tail, head, label });
    }

    Ok(dag)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Open,
    Close,
    Str(String),
    Word(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Number(f64),
    Str(String),
    List(Vec<(String, Value)>),
}

impl Value {
    fn number(&self, key: &str) -> Result<f64> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Str(s) => s
                .parse()
                .map_err(|_| DaggenError::GraphFormat(format!("`{key}` is not numeric: {s:?}"))),
            Value::List(_) => Err(DaggenError::GraphFormat(format!(
                "`{key}` is a list, expected a number"
            ))),
        }
    }
}

fn lookup<'a>(items: &'a [(String, Value)], key: &str) -> Option<&'a Value> {
    items.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

fn field<'a>(items: &'a [(String, Value)], key: &str) -> Result<&'a Value> {
    lookup(items, key).ok_or_else(|| DaggenError::GraphFormat(format!("missing `{key}`")))
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                while let Some(c) = chars.next() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '[' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ']' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '"' => {
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => s.push(c),
                        None => {
                            return Err(DaggenError::GraphFormat("unterminated string".into()));
                        }
                    }
                }
                tokens.push(Token::Str(s));
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == '[' || c == ']' || c == '"' {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push(Token::Word(word));
            }
        }
    }

    Ok(tokens)
}

/// Parse `key value` pairs until `]` (when `nested`) or end of input.
fn parse_list(tokens: &[Token], pos: &mut usize, nested: bool) -> Result<Vec<(String, Value)>> {
    let mut items = Vec::new();

    loop {
        let key = match tokens.get(*pos) {
            None if nested => return Err(DaggenError::GraphFormat("unclosed `[`".into())),
            None => return Ok(items),
            Some(Token::Close) if nested => {
                *pos += 1;
                return Ok(items);
            }
            Some(Token::Word(key)) => key.clone(),
            Some(other) => {
                return Err(DaggenError::GraphFormat(format!(
                    "expected a key, found {other:?}"
                )));
            }
        };
        *pos += 1;

        let value = match tokens.get(*pos) {
            Some(Token::Open) => {
                *pos += 1;
                Value::List(parse_list(tokens, pos, true)?)
            }
            Some(Token::Str(s)) => {
                *pos += 1;
                Value::Str(s.clone())
            }
            Some(Token::Word(w)) => {
                *pos += 1;
                let n = w.parse::<f64>().map_err(|_| {
                    DaggenError::GraphFormat(format!("value of `{key}` is not a number: {w}"))
                })?;
                Value::Number(n)
            }
            _ => {
                return Err(DaggenError::GraphFormat(format!("missing value for `{key}`")));
            }
        };
        items.push((key, value));
    }
}
