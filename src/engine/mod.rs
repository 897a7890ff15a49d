// src/engine/mod.rs

//! Run orchestration for daggen.
//!
//! - [`runner`] is the pure part: typed run parameters in, generated DAG
//!   tasks / tasksets out. Given the same seeded RNG it is deterministic.
//! - [`output`] is the IO shell: printing and saving generated tasks.

pub mod output;
pub mod runner;

pub use output::{emit_multi, emit_single, multi_set_dir, OutputOptions};
pub use runner::{generate_multi, generate_single, MultiDagRun, SingleDagRun};
