use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Algorithm used to split a taskset's total utilization across its tasks.
///
/// - `UUniFastDiscard`: classic UUniFast with rejection of any vector holding
///   an element above the per-task ceiling (bounded by a retry ceiling).
/// - `Drs`: fixed-sum sampler that honours the ceiling directly, without
///   rejection. Always terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationAlgorithm {
    #[serde(rename = "uunifast_discard")]
    UUniFastDiscard,
    Drs,
}

impl Default for UtilizationAlgorithm {
    fn default() -> Self {
        UtilizationAlgorithm::UUniFastDiscard
    }
}

impl FromStr for UtilizationAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uunifast_discard" | "uunifast-discard" => Ok(UtilizationAlgorithm::UUniFastDiscard),
            "drs" => Ok(UtilizationAlgorithm::Drs),
            other => Err(format!(
                "invalid util_algorithm: {other} (expected \"uunifast_discard\" or \"drs\")"
            )),
        }
    }
}

/// Which DAG shape generator to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopologyKind {
    /// Layer-by-layer random DAG.
    Layered,
    /// Nested fork-join DAG.
    ForkJoin,
}

impl Default for TopologyKind {
    fn default() -> Self {
        TopologyKind::Layered
    }
}

impl FromStr for TopologyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "layered" | "rnd" => Ok(TopologyKind::Layered),
            "fork_join" | "nfj" => Ok(TopologyKind::ForkJoin),
            other => Err(format!(
                "invalid algorithm: {other} (expected \"layered\" or \"fork_join\")"
            )),
        }
    }
}

/// How a list of candidate periods is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodMode {
    /// Sample uniformly (with replacement) from the listed values.
    Choices,
    /// The two listed values are an inclusive `[min, max]` integer range.
    Range,
}

impl FromStr for PeriodMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "choices" => Ok(PeriodMode::Choices),
            "range" => Ok(PeriodMode::Range),
            other => Err(format!(
                "invalid period_mode: {other} (expected \"choices\" or \"range\")"
            )),
        }
    }
}
