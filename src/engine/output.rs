// src/engine/output.rs

use std::path::{Path, PathBuf};

use tracing::info;

use crate::dag::{DagTask, DagTaskset};
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::persist;

/// What to do with generated tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    /// Print each task's DOT rendering to stdout.
    pub print_dag: bool,
    pub save_to_file: bool,
    /// Base output directory.
    pub output_dir: PathBuf,
}

/// Directory for taskset `set_index` of a multi-DAG run:
/// `<base>/data-multi-m<cores>-u<utilization>/<set_index>`.
pub fn multi_set_dir(base: &Path, cores: u32, utilization: f64, set_index: usize) -> PathBuf {
    base.join(format!("data-multi-m{cores}-u{utilization:.1}"))
        .join(set_index.to_string())
}

/// Print and/or save standalone DAGs into the output directory.
pub fn emit_single(fs: &dyn FileSystem, options: &OutputOptions, tasks: &[DagTask]) -> Result<()> {
    for task in tasks {
        emit_task(fs, options, &options.output_dir, task)?;
    }
    if options.save_to_file {
        info!(dags = tasks.len(), dir = ?options.output_dir, "saved DAGs");
    }
    Ok(())
}

/// Print and/or save every taskset into its own directory.
pub fn emit_multi(
    fs: &dyn FileSystem,
    options: &OutputOptions,
    cores: u32,
    tasksets: &[DagTaskset],
) -> Result<()> {
    for (set_index, taskset) in tasksets.iter().enumerate() {
        let dir = multi_set_dir(
            &options.output_dir,
            cores,
            taskset.total_utilization(),
            set_index,
        );
        for task in taskset.iter() {
            emit_task(fs, options, &dir, task)?;
        }
        info!(
            set_index,
            target = taskset.total_utilization(),
            achieved = taskset.achieved_utilization(),
            "taskset utilization"
        );
    }
    Ok(())
}

fn emit_task(fs: &dyn FileSystem, options: &OutputOptions, dir: &Path, task: &DagTask) -> Result<()> {
    if options.print_dag {
        println!("{task}");
    }
    if options.save_to_file {
        persist::save(fs, dir, task)?;
    }
    Ok(())
}
