// src/batch/submit.rs

use std::path::Path;
use std::process::Stdio;
use std::sync::LazyLock;

use regex::Regex;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::batch::script::BatchScript;
use crate::errors::{Result, VoidjobError};

static SUBMISSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?:Submitted batch job\s+)?(\d+)(?:;(\S+))?\s*$")
        .expect("submission pattern compiles")
});

/// Job accepted by the workload manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedJob {
    pub job_id: String,
    pub cluster: Option<String>,
}

/// Hand `script` to `sbatch` on stdin and return the assigned job id.
///
/// A refused request surfaces as [`VoidjobError::SubmitError`] carrying
/// `sbatch`'s own message.
pub async fn submit(script: &BatchScript, sbatch: &Path) -> Result<SubmittedJob> {
    info!(sbatch = %sbatch.display(), "submitting batch script");

    let mut child = Command::new(sbatch)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            VoidjobError::SubmitError(format!("spawning {}: {e}", sbatch.display()))
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(script.to_string().as_bytes()).await?;
        // Closing stdin marks the end of the script.
        drop(stdin);
    }

    let output = child.wait_with_output().await?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    debug!(status = ?output.status, %stdout, %stderr, "sbatch finished");

    if !output.status.success() {
        return Err(VoidjobError::SubmitError(format!(
            "{} exited with {}: {}",
            sbatch.display(),
            output.status,
            stderr.trim()
        )));
    }

    let job = parse_submission(&stdout)?;
    info!(job_id = %job.job_id, cluster = ?job.cluster, "batch job submitted");
    Ok(job)
}

/// Parse `Submitted batch job 123` or the `--parsable` form `123;cluster`.
pub fn parse_submission(stdout: &str) -> Result<SubmittedJob> {
    let caps = SUBMISSION_RE.captures(stdout.trim()).ok_or_else(|| {
        VoidjobError::SubmitError(format!("unexpected sbatch output: {}", stdout.trim()))
    })?;

    Ok(SubmittedJob {
        job_id: caps[1].to_string(),
        cluster: caps.get(2).map(|m| m.as_str().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_output() {
        let job = parse_submission("Submitted batch job 918273\n").unwrap();
        assert_eq!(job.job_id, "918273");
        assert_eq!(job.cluster, None);
    }

    #[test]
    fn parses_parsable_output() {
        let job = parse_submission("42;perlmutter\n").unwrap();
        assert_eq!(job.job_id, "42");
        assert_eq!(job.cluster.as_deref(), Some("perlmutter"));
    }

    #[test]
    fn rejects_unexpected_output() {
        assert!(matches!(
            parse_submission("sbatch: error: Batch job submission failed"),
            Err(VoidjobError::SubmitError(_))
        ));
    }
}
