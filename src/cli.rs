// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `voidjob`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "voidjob",
    version,
    about = "Submit and run the void-finding computation as a Slurm batch job.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the job config file (TOML).
    ///
    /// Default: `VOIDJOB_CONFIG` if set, otherwise `Voidjob.toml` in the
    /// current working directory.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `VOIDJOB_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Execute the job body: identify, prepare the environment, invoke the
    /// computation. Exits with the computation's exit code.
    Run,

    /// Render the batch script for this job.
    Script {
        /// Write the script here instead of stdout.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Render the batch script and hand it to `sbatch`.
    Submit {
        /// Print the script that would be submitted and stop.
        #[arg(long)]
        dry_run: bool,

        /// The `sbatch` executable to use.
        #[arg(long, value_name = "PATH", default_value = "sbatch")]
        sbatch: PathBuf,
    },

    /// Parse + validate the config and print a summary.
    Check,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_are_accepted_after_subcommand() {
        let args = CliArgs::try_parse_from([
            "voidjob",
            "submit",
            "--dry-run",
            "--config",
            "jobs/vsquared.toml",
        ])
        .unwrap();

        assert_eq!(args.config, Some(PathBuf::from("jobs/vsquared.toml")));
        match args.command {
            Command::Submit { dry_run, sbatch } => {
                assert!(dry_run);
                assert_eq!(sbatch, PathBuf::from("sbatch"));
            }
            other => panic!("expected submit, got {other:?}"),
        }
    }

    #[test]
    fn run_takes_no_arguments() {
        assert!(CliArgs::try_parse_from(["voidjob", "run", "extra"]).is_err());
    }
}
