// src/exec/environment.rs

//! Runtime environment preparation.
//!
//! Module loads and setup commands only change the shell they run in, so
//! they are executed in a login shell which then dumps its exported
//! environment. That environment becomes the computation's environment.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use super::exit::JobExit;
use super::quote::shell_quote;
use super::runner::{EnvVars, ProcessRunner, SetupScript};

/// Line that separates the setup output from the environment dump.
pub const ENV_MARKER: &str = "__VOIDJOB_ENV__";

/// How to activate the toolchain the computation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSpec {
    pub shell: PathBuf,
    /// Names passed to `module load`, in order.
    pub modules: Vec<String>,
    /// Extra shell commands run after the module loads.
    pub commands: Vec<String>,
    /// Abort the run when preparation fails instead of invoking the
    /// computation anyway.
    pub fail_fast: bool,
}

impl EnvironmentSpec {
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.commands.is_empty()
    }

    /// The script run by [`prepare_environment`] from `working_dir`, or
    /// `None` when there is nothing to prepare.
    pub fn setup_script(&self, working_dir: Option<&Path>) -> Option<SetupScript> {
        if self.is_empty() {
            return None;
        }

        let steps: Vec<String> = self
            .modules
            .iter()
            .map(|m| format!("module load {}", shell_quote(m)))
            .chain(self.commands.iter().map(|c| format!("{{ {c}\n}}")))
            .collect();

        let script = format!(
            "{}\n__voidjob_status=$?\nprintf '\\n%s\\n' '{ENV_MARKER}'\nenv -0\nexit $__voidjob_status\n",
            steps.join(" && ")
        );

        Some(SetupScript {
            shell: self.shell.clone(),
            script,
            working_dir: working_dir.map(Path::to_path_buf),
        })
    }
}

/// Outcome of [`prepare_environment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedEnvironment {
    pub status: JobExit,
    /// Environment for the computation; `None` inherits the wrapper's own.
    pub env: Option<EnvVars>,
    /// What the setup printed on stdout.
    pub output: Vec<u8>,
}

impl PreparedEnvironment {
    pub fn inherited() -> Self {
        Self {
            status: JobExit::SUCCESS,
            env: None,
            output: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status.is_success()
    }
}

/// Run the module loads and setup commands of `spec` inside `working_dir`.
///
/// Never fails outright: a setup that cannot be started or exits non-zero is
/// reported through `status`, and the caller decides whether to continue.
/// When the setup stopped part-way, whatever environment it reached is
/// still returned.
pub async fn prepare_environment(
    spec: &EnvironmentSpec,
    working_dir: Option<&Path>,
    runner: &mut dyn ProcessRunner,
) -> PreparedEnvironment {
    let Some(setup) = spec.setup_script(working_dir) else {
        debug!("no environment preparation configured; inheriting environment");
        return PreparedEnvironment::inherited();
    };

    info!(
        shell = %setup.shell.display(),
        cwd = ?setup.working_dir,
        modules = ?spec.modules,
        commands = spec.commands.len(),
        "preparing runtime environment"
    );

    let captured = match runner.capture(&setup).await {
        Ok(captured) => captured,
        Err(e) => {
            error!(shell = %setup.shell.display(), error = %e, "could not start setup shell");
            return PreparedEnvironment {
                status: JobExit::from_spawn_error(&e),
                env: None,
                output: Vec::new(),
            };
        }
    };

    match split_env_dump(&captured.stdout) {
        Some((output, env)) => {
            debug!(vars = env.len(), "captured prepared environment");
            PreparedEnvironment {
                status: captured.exit,
                env: Some(env),
                output: output.to_vec(),
            }
        }
        None => {
            warn!("setup shell exited before dumping its environment");
            let status = if captured.exit.is_success() {
                JobExit::FAILURE
            } else {
                captured.exit
            };
            PreparedEnvironment {
                status,
                env: None,
                output: captured.stdout,
            }
        }
    }
}

fn split_env_dump(stdout: &[u8]) -> Option<(&[u8], EnvVars)> {
    let marker = format!("\n{ENV_MARKER}\n");
    let marker = marker.as_bytes();
    let pos = stdout
        .windows(marker.len())
        .rposition(|window| window == marker)?;

    let output = &stdout[..pos];
    let dump = &stdout[pos + marker.len()..];
    Some((output, parse_env_dump(dump)))
}

fn parse_env_dump(dump: &[u8]) -> EnvVars {
    dump.split(|b| *b == 0)
        .filter_map(|entry| {
            let eq = entry.iter().position(|b| *b == b'=')?;
            if eq == 0 {
                return None;
            }
            Some((os_string(&entry[..eq]), os_string(&entry[eq + 1..])))
        })
        .collect()
}

#[cfg(unix)]
fn os_string(bytes: &[u8]) -> OsString {
    use std::os::unix::ffi::OsStringExt;
    OsString::from_vec(bytes.to_vec())
}

#[cfg(not(unix))]
fn os_string(bytes: &[u8]) -> OsString {
    OsString::from(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(modules: &[&str], commands: &[&str]) -> EnvironmentSpec {
        EnvironmentSpec {
            shell: PathBuf::from("bash"),
            modules: modules.iter().map(|s| s.to_string()).collect(),
            commands: commands.iter().map(|s| s.to_string()).collect(),
            fail_fast: false,
        }
    }

    #[test]
    fn empty_spec_has_no_script() {
        assert!(spec(&[], &[]).setup_script(None).is_none());
    }

    #[test]
    fn modules_load_in_order_before_commands() {
        let script = spec(&["gcc/12", "python/3.11"], &["source venv/bin/activate"])
            .setup_script(None)
            .unwrap()
            .script;

        let first = script.lines().next().unwrap();
        assert!(first.starts_with(
            "module load 'gcc/12' && module load 'python/3.11' && { source venv/bin/activate"
        ));
        assert!(script.contains("env -0"));
        assert!(script.trim_end().ends_with("exit $__voidjob_status"));
    }

    #[test]
    fn setup_runs_where_the_computation_runs() {
        let setup = spec(&["gcc/12"], &[])
            .setup_script(Some(Path::new("/scratch/voids")))
            .unwrap();
        assert_eq!(setup.working_dir, Some(PathBuf::from("/scratch/voids")));
    }

    #[test]
    fn env_dump_is_split_from_output() {
        let mut stdout = b"loading python\n".to_vec();
        stdout.extend_from_slice(format!("\n{ENV_MARKER}\n").as_bytes());
        stdout.extend_from_slice(b"PATH=/opt/py/bin:/usr/bin\0EMPTY=\0FUNC=() { x\n}\0");

        let (output, env) = split_env_dump(&stdout).unwrap();
        assert_eq!(output, b"loading python\n");
        assert_eq!(env.len(), 3);
        assert_eq!(
            env.get(&OsString::from("PATH")),
            Some(&OsString::from("/opt/py/bin:/usr/bin"))
        );
        assert_eq!(env.get(&OsString::from("EMPTY")), Some(&OsString::new()));
        assert_eq!(env.get(&OsString::from("FUNC")), Some(&OsString::from("() { x\n}")));
    }

    #[test]
    fn missing_marker_means_no_dump() {
        assert!(split_env_dump(b"module: command not found\n").is_none());
    }
}
