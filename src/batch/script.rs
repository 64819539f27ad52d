// src/batch/script.rs

use std::fmt;
use std::path::Path;

use crate::config::{ConfigFile, JobDescriptor};
use crate::exec::quote::shell_quote;
use crate::resources::{Directive, declare_resources};

pub const SHEBANG: &str = "#!/bin/bash";

/// A batch script: directive header plus the body that runs on the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchScript {
    pub directives: Vec<Directive>,
    pub body: Vec<String>,
}

impl BatchScript {
    /// The `#SBATCH` lines only.
    pub fn header(&self) -> String {
        let mut header = String::new();
        for directive in &self.directives {
            header.push_str(&directive.header_line());
            header.push('\n');
        }
        header
    }
}

impl fmt::Display for BatchScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{SHEBANG}")?;
        f.write_str(&self.header())?;
        writeln!(f)?;
        for line in &self.body {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Directives for the job identity, working directory and log sinks.
pub fn job_directives(job: &JobDescriptor) -> Vec<Directive> {
    let mut directives = vec![Directive::new("job-name", job.name.clone())];

    if let Some(ref dir) = job.working_dir {
        directives.push(Directive::new("chdir", dir.display().to_string()));
    }
    directives.push(Directive::new("output", job.output.clone()));
    directives.push(Directive::new("error", job.error.clone()));

    if let Some(ref partition) = job.partition {
        directives.push(Directive::new("partition", partition.clone()));
    }
    if let Some(ref account) = job.account {
        directives.push(Directive::new("account", account.clone()));
    }

    directives
}

/// Render the batch script that runs `launcher --config <config_path> run`
/// on the allocated node.
pub fn render_script(config: &ConfigFile, launcher: &Path, config_path: &Path) -> BatchScript {
    let mut directives = job_directives(&config.job);
    directives.extend(declare_resources(&config.resources));

    let srun = if config.program.srun { "srun " } else { "" };
    let body = vec![format!(
        "exec {srun}{} --config {} run",
        shell_quote(&launcher.display().to_string()),
        shell_quote(&config_path.display().to_string()),
    )];

    BatchScript { directives, body }
}
