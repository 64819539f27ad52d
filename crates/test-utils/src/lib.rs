//! Shared helpers for the voidjob test suites: a recording process runner,
//! a config builder and tracing setup.

pub mod builders;
pub mod fake_runner;

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt};

pub use builders::ConfigFileBuilder;
pub use fake_runner::FakeRunner;

static TRACING: Once = Once::new();

/// Install a test subscriber once per test binary.
///
/// Output goes through the harness capture, so launcher logs only show up
/// for failing tests. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}
