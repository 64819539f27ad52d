// src/errors.rs

//! Crate-wide error type.
//!
//! Only failures of the wrapper itself live here. Failures of the
//! collaborators it launches (environment setup, the computation) are exit
//! codes carried in a [`crate::launcher::RunReport`], not errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoidjobError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid resource request: {0}")]
    ResourceError(String),

    #[error("Invalid node list '{input}': {reason}")]
    NodeListError { input: String, reason: String },

    #[error("Submission failed: {0}")]
    SubmitError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, VoidjobError>;
