// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{DaggenError, Result};
use crate::sampling::UtilizationSplit;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::DaggenError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;
        Ok(ConfigFile::new_unchecked(
            raw.misc,
            raw.single_task,
            raw.multi_task,
            raw.dag_config,
        ))
    }
}

/// Validate an already-parsed configuration.
///
/// Only the section of the selected run mode is checked; `[misc]` and
/// `[dag_config]` always are.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    validate_misc(cfg)?;
    validate_dag_config(cfg)?;
    if cfg.misc.multi_dag {
        validate_multi_task(cfg)?;
    } else {
        validate_single_task(cfg)?;
    }
    Ok(())
}

/// Re-label a parameter error with the TOML section it came from.
fn in_section(section: &str, err: DaggenError) -> DaggenError {
    match err {
        DaggenError::InvalidParameter { name, reason } => {
            DaggenError::ConfigError(format!("[{section}].{name} {reason}"))
        }
        DaggenError::InfeasibleRequest(msg) => {
            DaggenError::ConfigError(format!("[{section}] is infeasible: {msg}"))
        }
        other => other,
    }
}

fn validate_misc(cfg: &RawConfigFile) -> Result<()> {
    if cfg.misc.cores == 0 {
        return Err(DaggenError::ConfigError(
            "[misc].cores must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.misc.max_attempts == 0 {
        return Err(DaggenError::ConfigError(
            "[misc].max_attempts must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_dag_config(cfg: &RawConfigFile) -> Result<()> {
    cfg.dag_config
        .topology()
        .validate()
        .map_err(|e| in_section("dag_config", e))
}

fn validate_single_task(cfg: &RawConfigFile) -> Result<()> {
    let single = &cfg.single_task;
    if single.set_number == 0 {
        return Err(DaggenError::ConfigError(
            "[single_task].set_number must be >= 1 (got 0)".to_string(),
        ));
    }
    let min_workload = if cfg.misc.dummy_source_and_sink { 2.0 } else { 0.0 };
    if single.workload.is_nan() || single.workload <= min_workload {
        return Err(DaggenError::ConfigError(format!(
            "[single_task].workload must be > {min_workload} (got {})",
            single.workload
        )));
    }
    Ok(())
}

fn validate_multi_task(cfg: &RawConfigFile) -> Result<()> {
    let multi = &cfg.multi_task;
    if multi.set_number == 0 {
        return Err(DaggenError::ConfigError(
            "[multi_task].set_number must be >= 1 (got 0)".to_string(),
        ));
    }

    UtilizationSplit::new(multi.task_number_per_set, multi.utilization)
        .with_ulimit(f64::from(cfg.misc.cores))
        .validate()
        .map_err(|e| in_section("multi_task", e))?;

    multi
        .period_population()
        .map(|_| ())
        .map_err(|e| in_section("multi_task", e))
}
