// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`runner`] provides the `ProcessRunner` trait and the production
//!   `TokioProcessRunner`; tests replace it with a fake.
//! - [`environment`] prepares the runtime environment (module loads, setup
//!   commands) through a login shell.
//! - [`exit`] maps process outcomes to the exit code the wrapper returns.
//! - [`quote`] is the shell quoting used wherever a script is generated.

pub mod environment;
pub mod exit;
pub mod quote;
pub mod runner;

use tracing::{error, info};

pub use environment::{EnvironmentSpec, PreparedEnvironment, prepare_environment};
pub use exit::JobExit;
pub use runner::{Captured, EnvVars, Invocation, ProcessRunner, SetupScript, TokioProcessRunner};

/// Run the computation once and wait for it.
///
/// Whatever happens is folded into a [`JobExit`]; a program that cannot be
/// started yields 127/126 like a shell would.
pub async fn invoke_computation(
    invocation: &Invocation,
    runner: &mut dyn ProcessRunner,
) -> JobExit {
    info!(program = %invocation.program.display(), "invoking computation");

    match runner.invoke(invocation).await {
        Ok(exit) => {
            info!(
                program = %invocation.program.display(),
                exit_code = exit.code(),
                success = exit.is_success(),
                "computation exited"
            );
            exit
        }
        Err(e) => {
            let exit = JobExit::from_spawn_error(&e);
            error!(
                program = %invocation.program.display(),
                error = %e,
                exit_code = exit.code(),
                "could not start computation"
            );
            exit
        }
    }
}
