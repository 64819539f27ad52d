// src/launcher.rs

//! The job body: a linear run from resource declaration to completion.
//!
//! ```text
//! Start → ResourceDeclared → EnvironmentPrepared → Invoking → Completed
//!                                    └──(fail_fast)──→ Aborted
//! ```
//!
//! The computation's outcome never changes the path through the phases; it
//! only becomes the exit code in the [`RunReport`].

use std::future::Future;
use std::io::{self, Write};

use chrono::{DateTime, Local};
use tracing::{error, info, warn};

use crate::config::ConfigFile;
use crate::context::{RunContext, identify_run};
use crate::errors::Result;
use crate::exec::{Invocation, JobExit, ProcessRunner, invoke_computation, prepare_environment};
use crate::resources::declare_resources;

/// Human-readable wall-clock format, e.g. `Sat Oct 17 09:30:02 +00:00 2026`.
pub const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Z %Y";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LaunchPhase {
    Start,
    ResourceDeclared,
    EnvironmentPrepared,
    Invoking,
    Completed,
    Aborted,
}

/// What a run did, returned to `main` which exits with `exit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub exit: JobExit,
    pub phase: LaunchPhase,
    pub primary: bool,
    pub started_at: Option<DateTime<Local>>,
    pub finished_at: Option<DateTime<Local>>,
}

/// A value produced between two printed timestamps.
#[derive(Debug, Clone)]
pub struct Timed<T> {
    pub value: T,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

/// Print a start timestamp, await `work`, print an end timestamp.
///
/// Both lines are written exactly once, whatever `work` yields. Uses the
/// host wall clock, not a monotonic one.
pub async fn record_timestamps<F, T>(out: &mut dyn Write, work: F) -> io::Result<Timed<T>>
where
    F: Future<Output = T>,
{
    let started_at = Local::now();
    writeln!(out, "Start time: {}", started_at.format(TIMESTAMP_FORMAT))?;
    out.flush()?;

    let value = work.await;

    let finished_at = Local::now();
    writeln!(out, "End time: {}", finished_at.format(TIMESTAMP_FORMAT))?;
    out.flush()?;

    Ok(Timed {
        value,
        started_at,
        finished_at,
    })
}

/// Runs one job body against a config and a process runner.
pub struct Launcher<R: ProcessRunner> {
    config: ConfigFile,
    runner: R,
}

impl<R: ProcessRunner> Launcher<R> {
    pub fn new(config: ConfigFile, runner: R) -> Self {
        Self { config, runner }
    }

    /// Execute the job body for the replica described by `ctx`.
    ///
    /// Errors are limited to writing the log stream; every failure of the
    /// environment setup or the computation ends up in `RunReport::exit`.
    pub async fn launch(&mut self, ctx: &RunContext, out: &mut dyn Write) -> Result<RunReport> {
        let mut phase = LaunchPhase::Start;
        info!(job = %self.config.job.name, ?phase, "job body starting");

        for directive in declare_resources(&self.config.resources) {
            info!(job = %self.config.job.name, %directive, "declared resource");
        }
        phase = self.advance(phase, LaunchPhase::ResourceDeclared);

        let primary = identify_run(ctx, out)?;

        let prepared = prepare_environment(
            &self.config.environment,
            self.config.job.working_dir.as_deref(),
            &mut self.runner,
        )
        .await;
        if !prepared.output.is_empty() {
            out.write_all(&prepared.output)?;
            out.flush()?;
        }
        if !prepared.succeeded() {
            if self.config.environment.fail_fast {
                error!(
                    exit_code = prepared.status.code(),
                    "environment preparation failed; not invoking computation"
                );
                self.advance(phase, LaunchPhase::Aborted);
                return Ok(RunReport {
                    exit: prepared.status,
                    phase: LaunchPhase::Aborted,
                    primary,
                    started_at: None,
                    finished_at: None,
                });
            }
            warn!(
                exit_code = prepared.status.code(),
                "environment preparation failed; invoking computation anyway"
            );
        }
        phase = self.advance(phase, LaunchPhase::EnvironmentPrepared);

        let invocation = Invocation {
            program: self
                .config
                .program
                .resolved_path(self.config.job.working_dir.as_deref()),
            working_dir: self.config.job.working_dir.clone(),
            env: prepared.env,
        };

        phase = self.advance(phase, LaunchPhase::Invoking);
        let timed = record_timestamps(out, invoke_computation(&invocation, &mut self.runner)).await?;
        phase = self.advance(phase, LaunchPhase::Completed);

        info!(
            job = %self.config.job.name,
            exit_code = timed.value.code(),
            elapsed_secs = (timed.finished_at - timed.started_at).num_seconds(),
            "job body finished"
        );

        Ok(RunReport {
            exit: timed.value,
            phase,
            primary,
            started_at: Some(timed.started_at),
            finished_at: Some(timed.finished_at),
        })
    }

    fn advance(&self, from: LaunchPhase, to: LaunchPhase) -> LaunchPhase {
        info!(job = %self.config.job.name, ?from, ?to, "phase transition");
        to
    }
}
