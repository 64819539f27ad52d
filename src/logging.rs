// src/logging.rs

//! Diagnostic logging for the wrapper.
//!
//! The level comes from `--log-level`, else `VOIDJOB_LOG`, else `info`.
//! Events go to stderr, which the scheduler routes to the job's error sink;
//! stdout is reserved for the provenance block, the timestamps and the
//! computation's own output.

use anyhow::{Result, anyhow};
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "VOIDJOB_LOG";

/// Install the stderr subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let level = resolve_level(cli_level, env_value.as_deref());

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}

fn resolve_level(cli_level: Option<LogLevel>, env_value: Option<&str>) -> Level {
    if let Some(lvl) = cli_level {
        return lvl.into();
    }
    env_value.and_then(level_from_env).unwrap_or(Level::INFO)
}

/// Accepts level names in any case, plus `warning`.
fn level_from_env(value: &str) -> Option<Level> {
    let value = value.trim().to_ascii_lowercase();
    match value.as_str() {
        "warning" => Some(Level::WARN),
        "error" | "warn" | "info" | "debug" | "trace" => value.parse().ok(),
        _ => None,
    }
}

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
