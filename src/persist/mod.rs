// src/persist/mod.rs

//! Saving and reloading DAG tasks.
//!
//! Each task `Tau_<i>` is written as three files:
//! - `Tau_<i>.dot`: Graphviz source for rendering (run `dot` externally),
//! - `Tau_<i>.json`: full-fidelity record used for exact reload,
//! - `Tau_<i>.gml`: GML interchange copy for other graph tools.
//!
//! [`loader::load_task`] gives downstream analyses the flattened adjacency
//! and execution-time view of a saved task.

pub mod gml;
pub mod loader;
pub mod store;

pub use loader::{load_task, LoadedTask};
pub use store::{load, load_interchange, save, task_stem, PersistedDag, SavedFiles};
