// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod persist;
pub mod sampling;
pub mod types;

use std::path::PathBuf;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate_with;
use crate::config::model::ConfigFile;
use crate::engine::{MultiDagRun, OutputOptions, SingleDagRun};
use crate::fs::RealFileSystem;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and validation
/// - seeding the one RNG every generator draws from
/// - single- or multi-DAG generation
/// - printing / saving the results
pub fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate_with(&config_path, |raw| args.apply_overrides(raw))?;

    if args.dry_run {
        print_dry_run(&cfg)?;
        return Ok(());
    }

    let seed = cfg.misc.rnd_seed;
    let mut rng = StdRng::seed_from_u64(seed);
    info!(seed, multi_dag = cfg.misc.multi_dag, "starting generation");

    let output = OutputOptions {
        print_dag: cfg.misc.print_dag,
        save_to_file: cfg.misc.save_to_file,
        output_dir: PathBuf::from(&args.output),
    };
    let fs = RealFileSystem;

    if cfg.misc.multi_dag {
        let run = MultiDagRun::from_config(&cfg)?;
        let tasksets = engine::generate_multi(&run, &mut rng)?;
        engine::emit_multi(&fs, &output, cfg.misc.cores, &tasksets)?;
    } else {
        let run = SingleDagRun::from_config(&cfg);
        let tasks = engine::generate_single(&run, &mut rng)?;
        engine::emit_single(&fs, &output, &tasks)?;
    }

    Ok(())
}

/// Dry-run output: the effective configuration after defaults.
fn print_dry_run(cfg: &ConfigFile) -> Result<()> {
    println!("daggen dry-run");
    println!(
        "  mode = {}",
        if cfg.misc.multi_dag { "multi-DAG" } else { "single-DAG" }
    );
    println!("  topology = {:?}", cfg.dag_config.topology());
    println!();
    print!("{}", toml::to_string_pretty(cfg)?);

    debug!("dry-run complete (nothing generated)");
    Ok(())
}
