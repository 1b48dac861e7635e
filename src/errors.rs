// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SequencerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unit not found: {0}")]
    UnitNotFound(String),

    /// The constraints form a cycle; no unit was started.
    #[error("Circular dependencies cannot exist in a sequencer: cycle among {0:?}")]
    CyclicDependency(Vec<String>),

    #[error("Invalid constraint: {0}")]
    InvalidConstraint(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SequencerError>;
