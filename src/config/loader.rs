// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks shape parameters, probabilities, utilization feasibility and
///   the period population of the selected run mode.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    load_and_validate_with(path, |_| {})
}

/// Like [`load_and_validate`], but lets the caller adjust the raw config
/// (e.g. CLI overrides) before it is validated.
pub fn load_and_validate_with(
    path: impl AsRef<Path>,
    adjust: impl FnOnce(&mut RawConfigFile),
) -> Result<ConfigFile> {
    let mut raw_config = load_from_path(&path)?;
    adjust(&mut raw_config);
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Config file used when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("daggen.toml")
}
