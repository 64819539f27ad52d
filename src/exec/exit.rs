// src/exec/exit.rs

use std::fmt;
use std::io;
use std::process::ExitStatus;

/// Exit code the wrapper hands back to the scheduler.
///
/// Follows shell conventions so the job's exit code reads the same as if the
/// program had been the last line of a batch script: `128 + N` for a
/// signal, `127` when the program does not exist, `126` when it cannot be
/// executed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct JobExit(i32);

impl JobExit {
    pub const SUCCESS: JobExit = JobExit(0);
    pub const FAILURE: JobExit = JobExit(1);
    pub const NOT_EXECUTABLE: JobExit = JobExit(126);
    pub const NOT_FOUND: JobExit = JobExit(127);

    pub fn from_code(code: i32) -> Self {
        Self(code)
    }

    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self(128 + signal);
            }
        }

        Self::FAILURE
    }

    pub fn from_spawn_error(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NOT_FOUND,
            _ => Self::NOT_EXECUTABLE,
        }
    }

    pub fn code(&self) -> i32 {
        self.0
    }

    pub fn is_success(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for JobExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
