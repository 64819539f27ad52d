// src/config/validate.rs

use std::num::NonZeroU32;

use crate::config::model::{
    ConfigFile, EnvironmentSection, JobDescriptor, JobSection, ProgramSection, ProgramSpec,
    RawConfigFile, ResourcesSection,
};
use crate::errors::{Result, VoidjobError};
use crate::exec::EnvironmentSpec;
use crate::resources::{MemoryQuantity, NotificationPolicy, ResourceRequest, WallClock};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = VoidjobError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        Ok(ConfigFile {
            job: validate_job(raw.job)?,
            resources: validate_resources(&raw.resources)?,
            environment: validate_environment(raw.environment)?,
            program: validate_program(raw.program)?,
        })
    }
}

fn config_error(msg: impl Into<String>) -> VoidjobError {
    VoidjobError::ConfigError(msg.into())
}

fn validate_job(job: JobSection) -> Result<JobDescriptor> {
    if job.name.trim().is_empty() {
        return Err(config_error("[job].name must not be empty"));
    }
    if job.name.chars().any(char::is_whitespace) {
        return Err(config_error(format!(
            "[job].name '{}' must not contain whitespace",
            job.name
        )));
    }
    if job.output.trim().is_empty() {
        return Err(config_error("[job].output must not be empty"));
    }
    if job.error.trim().is_empty() {
        return Err(config_error("[job].error must not be empty"));
    }

    Ok(JobDescriptor {
        name: job.name,
        working_dir: job.working_dir,
        output: job.output,
        error: job.error,
        partition: job.partition.filter(|p| !p.trim().is_empty()),
        account: job.account.filter(|a| !a.trim().is_empty()),
    })
}

fn validate_resources(res: &ResourcesSection) -> Result<ResourceRequest> {
    let memory_limit: MemoryQuantity = res
        .memory
        .parse()
        .map_err(|e| config_error(format!("[resources].memory: {e}")))?;

    let wall_clock_limit: WallClock = res
        .time
        .parse()
        .map_err(|e| config_error(format!("[resources].time: {e}")))?;

    let task_count = NonZeroU32::new(res.ntasks)
        .ok_or_else(|| config_error("[resources].ntasks must be >= 1 (got 0)"))?;

    let notification_policy: NotificationPolicy = res
        .mail_type
        .parse()
        .map_err(|e| config_error(format!("[resources].mail_type: {e}")))?;

    let notify_user = res.mail_user.clone().filter(|u| !u.trim().is_empty());

    Ok(ResourceRequest {
        memory_limit,
        wall_clock_limit,
        task_count,
        notification_policy,
        notify_user,
    })
}

fn validate_environment(env: EnvironmentSection) -> Result<EnvironmentSpec> {
    if env.shell.as_os_str().is_empty() {
        return Err(config_error("[environment].shell must not be empty"));
    }
    if env.modules.iter().any(|m| m.trim().is_empty()) {
        return Err(config_error("[environment].modules must not contain empty names"));
    }
    if env.commands.iter().any(|c| c.trim().is_empty()) {
        return Err(config_error("[environment].commands must not contain empty commands"));
    }

    Ok(EnvironmentSpec {
        shell: env.shell,
        modules: env.modules,
        commands: env.commands,
        fail_fast: env.fail_fast,
    })
}

fn validate_program(program: ProgramSection) -> Result<ProgramSpec> {
    if program.path.as_os_str().is_empty() {
        return Err(config_error("[program].path must not be empty"));
    }

    Ok(ProgramSpec {
        path: program.path,
        srun: program.srun,
    })
}
