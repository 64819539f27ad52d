// src/context/mod.rs

//! Run identity as assigned by the scheduler.
//!
//! The ambient environment is read exactly once, in
//! [`RunContext::from_env`]; everything downstream receives the resulting
//! value by reference.

pub mod hostlist;

use std::io::{self, Write};

use tracing::{debug, warn};

pub use hostlist::NodeList;

pub const JOB_ID_VAR: &str = "SLURM_JOB_ID";
pub const NODE_LIST_VAR: &str = "SLURM_JOB_NODELIST";
pub const STEP_ID_VAR: &str = "SLURM_STEP_ID";
pub const PROC_ID_VAR: &str = "SLURM_PROCID";

/// Identity of this task replica.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub job_id: Option<String>,
    pub node_list: NodeList,
    pub step_id: Option<String>,
    pub proc_id: Option<String>,
    pub hostname: String,
}

impl RunContext {
    /// Snapshot the scheduler variables and host name of this process.
    pub fn from_env() -> Self {
        let hostname = match hostname::get() {
            Ok(name) => name.to_string_lossy().into_owned(),
            Err(e) => {
                warn!(error = %e, "could not determine host name");
                "unknown".to_string()
            }
        };
        Self::from_lookup(|key| std::env::var(key).ok(), hostname)
    }

    /// Build a context from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F, hostname: impl Into<String>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let node_list = match non_empty(NODE_LIST_VAR) {
            Some(raw) => NodeList::parse(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "keeping node list unexpanded");
                NodeList::unexpanded(&raw)
            }),
            None => NodeList::default(),
        };

        let ctx = Self {
            job_id: non_empty(JOB_ID_VAR),
            node_list,
            step_id: non_empty(STEP_ID_VAR),
            proc_id: non_empty(PROC_ID_VAR),
            hostname: hostname.into(),
        };
        debug!(?ctx, "run context captured");
        ctx
    }

    /// True for the first task of the first step: both the step id and the
    /// process rank are unset or zero.
    pub fn is_primary(&self) -> bool {
        is_unset_or_zero(self.step_id.as_deref()) && is_unset_or_zero(self.proc_id.as_deref())
    }
}

fn is_unset_or_zero(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => {
            let v = v.trim();
            v.is_empty() || v.parse::<u64>() == Ok(0)
        }
    }
}

/// Write the provenance block if this is the primary replica.
///
/// Returns whether anything was written. Control flow of the caller never
/// depends on it; every replica goes on to run the computation.
pub fn identify_run(ctx: &RunContext, out: &mut dyn Write) -> io::Result<bool> {
    if !ctx.is_primary() {
        debug!(
            step_id = ?ctx.step_id,
            proc_id = ?ctx.proc_id,
            "not the primary replica; skipping identity block"
        );
        return Ok(false);
    }

    writeln!(out, "Hostname: {}", ctx.hostname)?;
    writeln!(out, "Job ID: {}", ctx.job_id.as_deref().unwrap_or("(none)"))?;
    if ctx.node_list.raw().is_empty() {
        writeln!(out, "Node list: (none)")?;
    } else {
        writeln!(out, "Node list: {}", ctx.node_list)?;
    }
    if !ctx.node_list.is_empty() {
        writeln!(
            out,
            "Nodes ({}): {}",
            ctx.node_list.len(),
            ctx.node_list.hosts().join(" ")
        )?;
    }
    out.flush()?;

    Ok(true)
}
