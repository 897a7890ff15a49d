// src/cli.rs

//! CLI argument parsing using `clap`.

use std::str::FromStr;

use clap::{Parser, ValueEnum};

use crate::config::loader::default_config_path;
use crate::config::model::RawConfigFile;
use crate::types::{PeriodMode, TopologyKind, UtilizationAlgorithm};

/// Command-line arguments for `daggen`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "daggen",
    version,
    about = "Generate random DAG tasks and tasksets for real-time scheduling research.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `daggen.toml` in the current working directory.
    #[arg(
        long,
        short,
        value_name = "PATH",
        default_value_t = default_config_path().display().to_string()
    )]
    pub config: String,

    /// Directory that receives the generated `Tau_<i>` files.
    #[arg(long, short, value_name = "DIR", default_value = "data")]
    pub output: String,

    /// Override `[misc].rnd_seed`.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Override `[dag_config].algorithm` (layered/rnd, fork_join/nfj).
    #[arg(long, value_name = "KIND", value_parser = TopologyKind::from_str)]
    pub algorithm: Option<TopologyKind>,

    /// Override `[misc].util_algorithm` (uunifast_discard, drs).
    #[arg(long, value_name = "ALG", value_parser = UtilizationAlgorithm::from_str)]
    pub util_algorithm: Option<UtilizationAlgorithm>,

    /// Override `[multi_task].period_mode` (choices, range).
    #[arg(long, value_name = "MODE", value_parser = PeriodMode::from_str)]
    pub period_mode: Option<PeriodMode>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DAGGEN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the effective config, but generate nothing.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Fold the command-line overrides into a freshly loaded config, before
    /// it is validated.
    pub fn apply_overrides(&self, raw: &mut RawConfigFile) {
        if let Some(seed) = self.seed {
            raw.misc.rnd_seed = seed;
        }
        if let Some(algorithm) = self.algorithm {
            raw.dag_config.algorithm = algorithm;
        }
        if let Some(util_algorithm) = self.util_algorithm {
            raw.misc.util_algorithm = util_algorithm;
        }
        if let Some(mode) = self.period_mode {
            raw.multi_task.period_mode = Some(mode);
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
