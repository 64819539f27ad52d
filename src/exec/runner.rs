// src/exec/runner.rs

//! Pluggable process runner.
//!
//! The launcher talks to a `ProcessRunner` instead of spawning processes
//! itself, so tests can swap in a fake that records what would have run.
//!
//! - `TokioProcessRunner` is the production implementation on top of
//!   `tokio::process::Command`.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use super::exit::JobExit;

/// Full environment handed to a child process.
pub type EnvVars = BTreeMap<OsString, OsString>;

/// One run of the external computation.
///
/// The program is always started with zero arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub working_dir: Option<PathBuf>,
    /// `None` inherits the wrapper's environment.
    pub env: Option<EnvVars>,
}

/// A setup script run through a login shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupScript {
    pub shell: PathBuf,
    pub script: String,
    /// Same directory the computation will run in.
    pub working_dir: Option<PathBuf>,
}

/// Result of a process whose stdout was captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub exit: JobExit,
    pub stdout: Vec<u8>,
}

pub type RunnerFuture<'a, T> = Pin<Box<dyn Future<Output = io::Result<T>> + Send + 'a>>;

/// Trait abstracting how child processes are started.
pub trait ProcessRunner: Send {
    /// Run the computation to completion with inherited stdio.
    ///
    /// An `Err` means the process could not be started at all.
    fn invoke(&mut self, invocation: &Invocation) -> RunnerFuture<'_, JobExit>;

    /// Run a setup script, capturing stdout. Stderr stays inherited.
    fn capture(&mut self, setup: &SetupScript) -> RunnerFuture<'_, Captured>;
}

/// Real runner used in production.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner;

impl ProcessRunner for TokioProcessRunner {
    fn invoke(&mut self, invocation: &Invocation) -> RunnerFuture<'_, JobExit> {
        let mut cmd = Command::new(&invocation.program);

        if let Some(ref dir) = invocation.working_dir {
            cmd.current_dir(dir);
        }
        if let Some(ref env) = invocation.env {
            cmd.env_clear().envs(env);
        }
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let program = invocation.program.clone();
        Box::pin(async move {
            let mut child = cmd.spawn()?;
            debug!(program = %program.display(), pid = ?child.id(), "computation spawned");
            let status = child.wait().await?;
            Ok(JobExit::from_status(status))
        })
    }

    fn capture(&mut self, setup: &SetupScript) -> RunnerFuture<'_, Captured> {
        let mut cmd = Command::new(&setup.shell);
        cmd.arg("-l")
            .arg("-c")
            .arg(&setup.script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        if let Some(ref dir) = setup.working_dir {
            cmd.current_dir(dir);
        }

        Box::pin(async move {
            let output = cmd.output().await?;
            Ok(Captured {
                exit: JobExit::from_status(output.status),
                stdout: output.stdout,
            })
        })
    }
}
