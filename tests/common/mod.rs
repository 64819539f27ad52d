#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub use voidjob_test_utils::init_tracing;

/// Write an executable shell script into `dir`.
pub fn write_program(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    path
}

/// Output of a run as text, one entry per line.
pub fn lines(out: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(out)
        .lines()
        .map(|l| l.to_string())
        .collect()
}
