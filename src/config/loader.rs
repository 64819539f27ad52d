// src/config/loader.rs

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, VoidjobError};

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV_VAR: &str = "VOIDJOB_CONFIG";

/// Load a configuration file from a given path and return the `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** parse resource
/// quantities or check invariants. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        VoidjobError::ConfigError(format!("reading config file at {}: {e}", path.display()))
    })?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` defaults).
/// - Parses memory, wall clock and notification policy and checks that the
///   request is satisfiable in form (non-zero limits, at least one task).
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Pick the config path: CLI flag, then `VOIDJOB_CONFIG`, then the default.
pub fn resolve_config_path(cli: Option<PathBuf>) -> PathBuf {
    resolve_config_path_from(cli, std::env::var_os(CONFIG_ENV_VAR))
}

pub fn resolve_config_path_from(cli: Option<PathBuf>, env: Option<OsString>) -> PathBuf {
    cli.or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
        .unwrap_or_else(default_config_path)
}

/// `Voidjob.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Voidjob.toml")
}
