// src/config/mod.rs

//! Configuration loading and validation for voidjob.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Turn the raw model into typed, validated values (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, resolve_config_path};
pub use model::{
    ConfigFile, EnvironmentSection, JobDescriptor, JobSection, ProgramSection, ProgramSpec,
    RawConfigFile, ResourcesSection,
};
