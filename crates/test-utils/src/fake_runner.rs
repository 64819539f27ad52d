use std::ffi::OsString;
use std::sync::{Arc, Mutex};

use voidjob::exec::{Captured, EnvVars, Invocation, JobExit, ProcessRunner, SetupScript};
use voidjob::exec::environment::ENV_MARKER;
use voidjob::exec::runner::RunnerFuture;

/// A fake process runner that:
/// - records every invocation and setup script it is handed
/// - answers invocations with a fixed exit code
/// - answers setup scripts with a fixed exit code and environment dump
#[derive(Clone)]
pub struct FakeRunner {
    invocations: Arc<Mutex<Vec<Invocation>>>,
    setups: Arc<Mutex<Vec<SetupScript>>>,
    exit: JobExit,
    setup_exit: JobExit,
    setup_env: Vec<(String, String)>,
    spawn_fails: bool,
}

impl FakeRunner {
    pub fn new(exit: JobExit) -> Self {
        Self {
            invocations: Arc::new(Mutex::new(Vec::new())),
            setups: Arc::new(Mutex::new(Vec::new())),
            exit,
            setup_exit: JobExit::SUCCESS,
            setup_env: vec![("PATH".to_string(), "/opt/fake/bin".to_string())],
            spawn_fails: false,
        }
    }

    /// Make setup scripts exit with `exit`.
    pub fn with_setup_exit(mut self, exit: JobExit) -> Self {
        self.setup_exit = exit;
        self
    }

    pub fn with_setup_env(mut self, key: &str, value: &str) -> Self {
        self.setup_env.push((key.to_string(), value.to_string()));
        self
    }

    /// Make every invocation fail to start with `NotFound`.
    pub fn failing_to_spawn(mut self) -> Self {
        self.spawn_fails = true;
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn setups(&self) -> Vec<SetupScript> {
        self.setups.lock().unwrap().clone()
    }

    /// The environment the fake setup reports.
    pub fn expected_env(&self) -> EnvVars {
        self.setup_env
            .iter()
            .map(|(k, v)| (OsString::from(k), OsString::from(v)))
            .collect()
    }
}

impl ProcessRunner for FakeRunner {
    fn invoke(&mut self, invocation: &Invocation) -> RunnerFuture<'_, JobExit> {
        self.invocations.lock().unwrap().push(invocation.clone());
        let result = if self.spawn_fails {
            Err(std::io::Error::from(std::io::ErrorKind::NotFound))
        } else {
            Ok(self.exit)
        };
        Box::pin(async move { result })
    }

    fn capture(&mut self, setup: &SetupScript) -> RunnerFuture<'_, Captured> {
        self.setups.lock().unwrap().push(setup.clone());

        let mut stdout = b"fake setup\n".to_vec();
        stdout.extend_from_slice(format!("\n{ENV_MARKER}\n").as_bytes());
        for (k, v) in &self.setup_env {
            stdout.extend_from_slice(format!("{k}={v}").as_bytes());
            stdout.push(0);
        }

        let captured = Captured {
            exit: self.setup_exit,
            stdout,
        };
        Box::pin(async move { Ok(captured) })
    }
}
