// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DaggenError {
    /// A generation argument is out of range. `name` is the offending parameter.
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The request cannot be satisfied for the given task count and ceiling.
    #[error("Infeasible request: {0}")]
    InfeasibleRequest(String),

    /// An operation was invoked out of lifecycle order.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A persisted graph file could not be interpreted.
    #[error("Malformed graph file: {0}")]
    GraphFormat(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DaggenError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        DaggenError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DaggenError>;
