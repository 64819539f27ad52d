// src/batch/mod.rs

//! Submission side of the job: the batch script and `sbatch`.
//!
//! - [`script`] renders the `#SBATCH` header and the body that calls back
//!   into `voidjob run` on the allocated node.
//! - [`submit`] pipes a rendered script into `sbatch`.

pub mod script;
pub mod submit;

pub use script::{BatchScript, job_directives, render_script};
pub use submit::{SubmittedJob, parse_submission, submit};
