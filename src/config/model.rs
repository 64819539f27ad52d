// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::exec::EnvironmentSpec;
use crate::resources::ResourceRequest;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [job]
/// name = "vsquared"
/// working_dir = "/scratch/voids"
/// output = "%x-%j.out"
/// error = "%x-%j.err"
///
/// [resources]
/// memory = "200G"
/// time = "01:00:00"
/// ntasks = 1
/// mail_type = "all"
///
/// [environment]
/// modules = ["python/3.11"]
/// fail_fast = false
///
/// [program]
/// path = "./run_vsquared.sh"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    pub job: JobSection,

    pub resources: ResourcesSection,

    #[serde(default)]
    pub environment: EnvironmentSection,

    pub program: ProgramSection,
}

/// `[job]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobSection {
    pub name: String,

    /// Directory the job runs in. Relative program paths resolve against it.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Standard log sink; may use scheduler filename patterns (`%j`, `%x`).
    #[serde(default = "default_output")]
    pub output: String,

    /// Error log sink.
    #[serde(default = "default_error")]
    pub error: String,

    #[serde(default)]
    pub partition: Option<String>,

    #[serde(default)]
    pub account: Option<String>,
}

fn default_output() -> String {
    "%x-%j.out".to_string()
}

fn default_error() -> String {
    "%x-%j.err".to_string()
}

/// `[resources]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourcesSection {
    /// Memory ceiling, e.g. `"200G"`.
    pub memory: String,

    /// Wall-clock limit in any of the scheduler's formats, e.g. `"01:00:00"`.
    pub time: String,

    #[serde(default = "default_ntasks")]
    pub ntasks: u32,

    /// `"all"`, `"fail"`, `"none"`, or a comma separated list.
    #[serde(default = "default_mail_type")]
    pub mail_type: String,

    #[serde(default)]
    pub mail_user: Option<String>,
}

fn default_ntasks() -> u32 {
    1
}

fn default_mail_type() -> String {
    "none".to_string()
}

/// `[environment]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentSection {
    #[serde(default = "default_shell")]
    pub shell: PathBuf,

    #[serde(default)]
    pub modules: Vec<String>,

    #[serde(default)]
    pub commands: Vec<String>,

    /// Stop before invoking the program when preparation fails.
    ///
    /// Defaults to `false`: a failed preparation is logged and the program
    /// is invoked anyway.
    #[serde(default)]
    pub fail_fast: bool,
}

fn default_shell() -> PathBuf {
    PathBuf::from("bash")
}

impl Default for EnvironmentSection {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            modules: Vec::new(),
            commands: Vec::new(),
            fail_fast: false,
        }
    }
}

/// `[program]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgramSection {
    /// Entry point of the computation. Started with no arguments.
    pub path: PathBuf,

    /// Start the job body through `srun`, once per task.
    #[serde(default)]
    pub srun: bool,
}

/// Validated configuration. Built from [`RawConfigFile`] via `TryFrom`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub job: JobDescriptor,
    pub resources: ResourceRequest,
    pub environment: EnvironmentSpec,
    pub program: ProgramSpec,
}

/// Non-resource fields of the submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptor {
    pub name: String,
    pub working_dir: Option<PathBuf>,
    pub output: String,
    pub error: String,
    pub partition: Option<String>,
    pub account: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSpec {
    pub path: PathBuf,
    pub srun: bool,
}

impl ProgramSpec {
    /// Program path with a relative path anchored at `working_dir`.
    pub fn resolved_path(&self, working_dir: Option<&Path>) -> PathBuf {
        match working_dir {
            Some(dir) if self.path.is_relative() => dir.join(&self.path),
            _ => self.path.clone(),
        }
    }
}
