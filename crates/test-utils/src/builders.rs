#![allow(dead_code)]

use daggen::config::{ConfigFile, RawConfigFile};
use daggen::types::{PeriodMode, TopologyKind, UtilizationAlgorithm};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the defaults with saving and printing switched off.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        let mut config = RawConfigFile::default();
        config.misc.save_to_file = false;
        config.misc.print_dag = false;
        Self { config }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.misc.rnd_seed = seed;
        self
    }

    pub fn multi_dag(mut self, val: bool) -> Self {
        self.config.misc.multi_dag = val;
        self
    }

    pub fn cores(mut self, cores: u32) -> Self {
        self.config.misc.cores = cores;
        self
    }

    pub fn dummy_source_and_sink(mut self, val: bool) -> Self {
        self.config.misc.dummy_source_and_sink = val;
        self
    }

    pub fn round_execution_times(mut self, val: bool) -> Self {
        self.config.misc.round_execution_times = val;
        self
    }

    pub fn util_algorithm(mut self, algorithm: UtilizationAlgorithm) -> Self {
        self.config.misc.util_algorithm = algorithm;
        self
    }

    pub fn single_task(mut self, set_number: usize, workload: f64) -> Self {
        self.config.single_task.set_number = set_number;
        self.config.single_task.workload = workload;
        self
    }

    pub fn multi_task(mut self, set_number: usize, tasks: usize, utilization: f64) -> Self {
        self.config.multi_task.set_number = set_number;
        self.config.multi_task.task_number_per_set = tasks;
        self.config.multi_task.utilization = utilization;
        self
    }

    pub fn periods(mut self, periods: &[u64], mode: Option<PeriodMode>) -> Self {
        self.config.multi_task.periods = periods.to_vec();
        self.config.multi_task.period_mode = mode;
        self
    }

    pub fn layered(mut self, parallelism: u32, layer_min: u32, layer_max: u32, p: f64) -> Self {
        let dag = &mut self.config.dag_config;
        dag.algorithm = TopologyKind::Layered;
        dag.parallelism = parallelism;
        dag.layer_num_min = layer_min;
        dag.layer_num_max = layer_max;
        dag.connect_prob = p;
        self
    }

    pub fn fork_join(mut self, depth: u32, fork_prob: f64, join_prob: f64) -> Self {
        let dag = &mut self.config.dag_config;
        dag.algorithm = TopologyKind::ForkJoin;
        dag.depth = depth;
        dag.fork_prob = fork_prob;
        dag.join_prob = join_prob;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
