// src/config/model.rs

use serde::{Deserialize, Serialize};

use crate::dag::{ForkJoinParams, LayeredParams, TasksetParams, Topology};
use crate::errors::Result;
use crate::sampling::{PeriodPopulation, WorkloadOptions};
use crate::types::{PeriodMode, TopologyKind, UtilizationAlgorithm};

/// Configuration exactly as read from a TOML file.
///
/// ```toml
/// [misc]
/// multi_dag = true
/// rnd_seed = 42
/// cores = 4
/// util_algorithm = "drs"
///
/// [multi_task]
/// set_number = 2
/// task_number_per_set = 3
/// utilization = 0.8
/// periods = [1000, 2000, 5000]
///
/// [dag_config]
/// parallelism = 4
/// layer_num_min = 3
/// layer_num_max = 6
/// connect_prob = 0.5
/// ```
///
/// All sections are optional and have defaults. Turn into a [`ConfigFile`]
/// with `ConfigFile::try_from`, which validates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub misc: MiscSection,
    #[serde(default)]
    pub single_task: SingleTaskSection,
    #[serde(default)]
    pub multi_task: MultiTaskSection,
    #[serde(default)]
    pub dag_config: DagConfigSection,
}

/// Validated configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigFile {
    pub misc: MiscSection,
    pub single_task: SingleTaskSection,
    pub multi_task: MultiTaskSection,
    pub dag_config: DagConfigSection,
}

/// `[misc]` section: run mode and options shared by both modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiscSection {
    /// Generate tasksets (`true`) or standalone DAGs (`false`).
    #[serde(default)]
    pub multi_dag: bool,

    #[serde(default = "default_seed")]
    pub rnd_seed: u64,

    /// Per-task utilization ceiling for tasksets.
    #[serde(default = "default_cores")]
    pub cores: u32,

    /// Print each DAG (DOT) to stdout.
    #[serde(default)]
    pub print_dag: bool,

    #[serde(default = "default_true")]
    pub save_to_file: bool,

    /// Unit-cost dummy source and sink nodes.
    #[serde(default)]
    pub dummy_source_and_sink: bool,

    #[serde(default = "default_true")]
    pub round_execution_times: bool,

    #[serde(default)]
    pub util_algorithm: UtilizationAlgorithm,

    /// Retry ceiling for UUniFast-discard.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

/// `[single_task]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleTaskSection {
    /// Number of DAGs to generate.
    #[serde(default = "default_set_number")]
    pub set_number: usize,
    #[serde(default = "default_workload")]
    pub workload: f64,
}

/// `[multi_task]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiTaskSection {
    /// Number of tasksets.
    #[serde(default = "default_multi_set_number")]
    pub set_number: usize,
    #[serde(default = "default_task_number")]
    pub task_number_per_set: usize,
    #[serde(default = "default_utilization")]
    pub utilization: f64,
    #[serde(default = "default_periods")]
    pub periods: Vec<u64>,
    /// How to read `periods`. When omitted, exactly two values mean a
    /// `[min, max]` range and anything else a set of choices.
    #[serde(default)]
    pub period_mode: Option<PeriodMode>,
}

/// `[dag_config]` section: shape of every generated DAG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DagConfigSection {
    #[serde(default)]
    pub algorithm: TopologyKind,

    // layered
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
    #[serde(default = "default_layer_num_min")]
    pub layer_num_min: u32,
    #[serde(default = "default_layer_num_max")]
    pub layer_num_max: u32,
    #[serde(default = "default_connect_prob")]
    pub connect_prob: f64,

    // fork-join
    #[serde(default = "default_depth")]
    pub depth: u32,
    #[serde(default = "default_fork_prob")]
    pub fork_prob: f64,
    #[serde(default = "default_join_prob")]
    pub join_prob: f64,
    #[serde(default = "default_fork_width_min")]
    pub fork_width_min: u32,
    #[serde(default = "default_fork_width_max")]
    pub fork_width_max: u32,
}

fn default_seed() -> u64 {
    42
}

fn default_cores() -> u32 {
    4
}

fn default_true() -> bool {
    true
}

fn default_max_attempts() -> usize {
    crate::sampling::DEFAULT_MAX_ATTEMPTS
}

fn default_set_number() -> usize {
    5
}

fn default_workload() -> f64 {
    10_000.0
}

fn default_multi_set_number() -> usize {
    1
}

fn default_task_number() -> usize {
    3
}

fn default_utilization() -> f64 {
    0.8
}

fn default_periods() -> Vec<u64> {
    vec![1000, 2000, 5000]
}

fn default_parallelism() -> u32 {
    LayeredParams::default().parallelism
}

fn default_layer_num_min() -> u32 {
    LayeredParams::default().layer_num_min
}

fn default_layer_num_max() -> u32 {
    LayeredParams::default().layer_num_max
}

fn default_connect_prob() -> f64 {
    LayeredParams::default().connect_prob
}

fn default_depth() -> u32 {
    ForkJoinParams::default().depth
}

fn default_fork_prob() -> f64 {
    ForkJoinParams::default().fork_prob
}

fn default_join_prob() -> f64 {
    ForkJoinParams::default().join_prob
}

fn default_fork_width_min() -> u32 {
    ForkJoinParams::default().fork_width_min
}

fn default_fork_width_max() -> u32 {
    ForkJoinParams::default().fork_width_max
}

impl Default for MiscSection {
    fn default() -> Self {
        Self {
            multi_dag: false,
            rnd_seed: default_seed(),
            cores: default_cores(),
            print_dag: false,
            save_to_file: true,
            dummy_source_and_sink: false,
            round_execution_times: true,
            util_algorithm: UtilizationAlgorithm::default(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for SingleTaskSection {
    fn default() -> Self {
        Self {
            set_number: default_set_number(),
            workload: default_workload(),
        }
    }
}

impl Default for MultiTaskSection {
    fn default() -> Self {
        Self {
            set_number: default_multi_set_number(),
            task_number_per_set: default_task_number(),
            utilization: default_utilization(),
            periods: default_periods(),
            period_mode: None,
        }
    }
}

impl Default for DagConfigSection {
    fn default() -> Self {
        Self {
            algorithm: TopologyKind::default(),
            parallelism: default_parallelism(),
            layer_num_min: default_layer_num_min(),
            layer_num_max: default_layer_num_max(),
            connect_prob: default_connect_prob(),
            depth: default_depth(),
            fork_prob: default_fork_prob(),
            join_prob: default_join_prob(),
            fork_width_min: default_fork_width_min(),
            fork_width_max: default_fork_width_max(),
        }
    }
}

impl DagConfigSection {
    pub fn layered_params(&self) -> LayeredParams {
        LayeredParams {
            parallelism: self.parallelism,
            layer_num_min: self.layer_num_min,
            layer_num_max: self.layer_num_max,
            connect_prob: self.connect_prob,
        }
    }

    pub fn fork_join_params(&self) -> ForkJoinParams {
        ForkJoinParams {
            depth: self.depth,
            fork_prob: self.fork_prob,
            join_prob: self.join_prob,
            fork_width_min: self.fork_width_min,
            fork_width_max: self.fork_width_max,
        }
    }

    /// The selected generator with its parameters.
    pub fn topology(&self) -> Topology {
        match self.algorithm {
            TopologyKind::Layered => Topology::Layered(self.layered_params()),
            TopologyKind::ForkJoin => Topology::ForkJoin(self.fork_join_params()),
        }
    }
}

impl MultiTaskSection {
    pub fn period_population(&self) -> Result<PeriodPopulation> {
        match self.period_mode {
            Some(mode) => PeriodPopulation::with_mode(&self.periods, mode),
            None => PeriodPopulation::from_legacy(&self.periods),
        }
    }
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        misc: MiscSection,
        single_task: SingleTaskSection,
        multi_task: MultiTaskSection,
        dag_config: DagConfigSection,
    ) -> Self {
        Self {
            misc,
            single_task,
            multi_task,
            dag_config,
        }
    }

    pub fn workload_options(&self) -> WorkloadOptions {
        WorkloadOptions {
            round: self.misc.round_execution_times,
            dummy: self.misc.dummy_source_and_sink,
        }
    }

    /// Typed parameters for one taskset of the multi-DAG run.
    pub fn taskset_params(&self) -> Result<TasksetParams> {
        Ok(TasksetParams {
            task_count: self.multi_task.task_number_per_set,
            total_utilization: self.multi_task.utilization,
            periods: self.multi_task.period_population()?,
            core_ceiling: f64::from(self.misc.cores),
            util_algorithm: self.misc.util_algorithm,
            max_attempts: self.misc.max_attempts,
            topology: self.dag_config.topology(),
            workload: self.workload_options(),
        })
    }
}
