// src/lib.rs

pub mod batch;
pub mod cli;
pub mod config;
pub mod context;
pub mod errors;
pub mod exec;
pub mod launcher;
pub mod logging;
pub mod resources;

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::batch::{BatchScript, render_script, submit};
use crate::cli::{CliArgs, Command};
use crate::config::{ConfigFile, load_and_validate, resolve_config_path};
use crate::context::RunContext;
use crate::errors::Result;
use crate::exec::{JobExit, TokioProcessRunner};
use crate::launcher::Launcher;

/// High-level entry point used by `main.rs`.
///
/// Returns the exit code the process should terminate with. For `run` this
/// is the computation's exit code.
pub async fn run(args: CliArgs) -> Result<JobExit> {
    let config_path = resolve_config_path(args.config.clone());
    let cfg = load_and_validate(&config_path)?;
    debug!(config = %config_path.display(), "config loaded");

    match args.command {
        Command::Run => run_job(cfg).await,
        Command::Script { output } => {
            let script = build_script(&cfg, &config_path)?;
            match output {
                Some(path) => {
                    fs::write(&path, script.to_string())?;
                    info!(path = %path.display(), "batch script written");
                }
                None => print!("{script}"),
            }
            Ok(JobExit::SUCCESS)
        }
        Command::Submit { dry_run, sbatch } => {
            let script = build_script(&cfg, &config_path)?;
            if dry_run {
                print!("{script}");
                return Ok(JobExit::SUCCESS);
            }
            let job = submit(&script, &sbatch).await?;
            println!("Submitted batch job {}", job.job_id);
            Ok(JobExit::SUCCESS)
        }
        Command::Check => {
            print_summary(&cfg, &config_path);
            Ok(JobExit::SUCCESS)
        }
    }
}

/// Execute the job body on the allocated node.
async fn run_job(cfg: ConfigFile) -> Result<JobExit> {
    let ctx = RunContext::from_env();
    let mut launcher = Launcher::new(cfg, TokioProcessRunner);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let report = launcher.launch(&ctx, &mut out).await?;
    out.flush()?;

    Ok(report.exit)
}

fn build_script(cfg: &ConfigFile, config_path: &Path) -> Result<BatchScript> {
    let launcher = std::env::current_exe()?;
    let config_path = fs::canonicalize(config_path)?;
    Ok(render_script(cfg, &launcher, &config_path))
}

/// `check` output: the validated job at a glance.
fn print_summary(cfg: &ConfigFile, config_path: &Path) {
    println!("voidjob check: {}", config_path.display());
    println!("  job.name = {}", cfg.job.name);
    if let Some(ref dir) = cfg.job.working_dir {
        println!("  job.working_dir = {}", dir.display());
    }
    println!("  job.output = {}", cfg.job.output);
    println!("  job.error = {}", cfg.job.error);
    println!();

    println!("resources:");
    println!("  memory = {}", cfg.resources.memory_limit);
    println!("  time = {}", cfg.resources.wall_clock_limit);
    println!("  ntasks = {}", cfg.resources.task_count);
    println!("  mail_type = {}", cfg.resources.notification_policy);
    if let Some(ref user) = cfg.resources.notify_user {
        println!("  mail_user = {user}");
    }
    println!();

    println!("environment:");
    println!("  shell = {}", cfg.environment.shell.display());
    if !cfg.environment.modules.is_empty() {
        println!("  modules: {:?}", cfg.environment.modules);
    }
    if !cfg.environment.commands.is_empty() {
        println!("  commands: {:?}", cfg.environment.commands);
    }
    println!("  fail_fast = {}", cfg.environment.fail_fast);
    println!();

    println!("program:");
    println!(
        "  path = {}",
        cfg.program
            .resolved_path(cfg.job.working_dir.as_deref())
            .display()
    );
    if cfg.program.srun {
        println!("  srun: true");
    }

    debug!("check complete (no execution)");
}
