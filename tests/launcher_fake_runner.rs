// tests/launcher_fake_runner.rs

mod common;
use crate::common::{init_tracing, lines};

use std::ffi::OsString;
use std::path::PathBuf;

use voidjob::context::RunContext;
use voidjob::exec::JobExit;
use voidjob::launcher::{LaunchPhase, Launcher};
use voidjob_test_utils::{ConfigFileBuilder, FakeRunner};

fn primary() -> RunContext {
    RunContext::from_lookup(|_| None, "node01")
}

fn replica() -> RunContext {
    RunContext::from_lookup(
        |k| (k == voidjob::context::PROC_ID_VAR).then(|| "1".to_string()),
        "node02",
    )
}

#[tokio::test]
async fn exit_code_of_computation_is_returned() {
    init_tracing();

    for code in [0, 1, 3, 137] {
        let runner = FakeRunner::new(JobExit::from_code(code));
        let mut launcher = Launcher::new(ConfigFileBuilder::new().build(), runner);
        let mut out = Vec::new();

        let report = launcher.launch(&primary(), &mut out).await.unwrap();
        assert_eq!(report.exit.code(), code);
        assert_eq!(report.phase, LaunchPhase::Completed);
    }
}

#[tokio::test]
async fn timestamps_bracket_the_invocation_once_each() {
    init_tracing();
    let runner = FakeRunner::new(JobExit::FAILURE);
    let mut launcher = Launcher::new(ConfigFileBuilder::new().build(), runner);
    let mut out = Vec::new();

    let report = launcher.launch(&primary(), &mut out).await.unwrap();

    let started = report.started_at.unwrap();
    let finished = report.finished_at.unwrap();
    assert!(started <= finished);

    let lines = lines(&out);
    let starts: Vec<_> = lines.iter().filter(|l| l.starts_with("Start time: ")).collect();
    let ends: Vec<_> = lines.iter().filter(|l| l.starts_with("End time: ")).collect();
    assert_eq!(starts.len(), 1);
    assert_eq!(ends.len(), 1);

    // identity block first, then start, then end
    let host = lines.iter().position(|l| l.starts_with("Hostname:")).unwrap();
    let start = lines.iter().position(|l| l.starts_with("Start time:")).unwrap();
    let end = lines.iter().position(|l| l.starts_with("End time:")).unwrap();
    assert!(host < start && start < end);
}

#[tokio::test]
async fn non_primary_replica_still_invokes() {
    init_tracing();
    let runner = FakeRunner::new(JobExit::SUCCESS);
    let mut launcher = Launcher::new(ConfigFileBuilder::new().build(), runner.clone());
    let mut out = Vec::new();

    let report = launcher.launch(&replica(), &mut out).await.unwrap();

    assert!(!report.primary);
    assert_eq!(runner.invocations().len(), 1);
    assert!(!lines(&out).iter().any(|l| l.starts_with("Hostname:")));
}

#[tokio::test]
async fn invocation_does_not_depend_on_resource_request() {
    init_tracing();

    let variants = [
        ConfigFileBuilder::new().build(),
        ConfigFileBuilder::new().ntasks(64).build(),
        ConfigFileBuilder::new().time("2-00:00:00").build(),
        ConfigFileBuilder::new().memory("4G").mail_type("fail").build(),
    ];

    let mut seen = Vec::new();
    for cfg in variants {
        let runner = FakeRunner::new(JobExit::SUCCESS);
        let mut launcher = Launcher::new(cfg, runner.clone());
        let mut out = Vec::new();
        launcher.launch(&primary(), &mut out).await.unwrap();

        let invocations = runner.invocations();
        assert_eq!(invocations.len(), 1);
        seen.push(invocations[0].clone());
    }

    for invocation in &seen {
        assert_eq!(invocation, &seen[0]);
        assert_eq!(invocation.program, PathBuf::from("/opt/vast/bin/vsquared"));
        assert_eq!(invocation.env, None);
    }
}

#[tokio::test]
async fn prepared_environment_is_handed_to_the_computation() {
    init_tracing();
    let runner = FakeRunner::new(JobExit::SUCCESS).with_setup_env("PYTHONHOME", "/opt/py");
    let cfg = ConfigFileBuilder::new()
        .module("python/3.11")
        .working_dir("/scratch/voids")
        .program("bin/vsquared")
        .build();
    let mut launcher = Launcher::new(cfg, runner.clone());
    let mut out = Vec::new();

    launcher.launch(&primary(), &mut out).await.unwrap();

    let setups = runner.setups();
    assert_eq!(setups.len(), 1);
    assert!(setups[0].script.contains("module load 'python/3.11'"));
    assert_eq!(setups[0].working_dir, Some(PathBuf::from("/scratch/voids")));

    let invocation = &runner.invocations()[0];
    assert_eq!(invocation.env.as_ref(), Some(&runner.expected_env()));
    assert_eq!(
        invocation.env.as_ref().unwrap().get(&OsString::from("PYTHONHOME")),
        Some(&OsString::from("/opt/py"))
    );
    assert_eq!(invocation.program, PathBuf::from("/scratch/voids/bin/vsquared"));
    assert_eq!(invocation.working_dir, Some(PathBuf::from("/scratch/voids")));

    // setup stdout lands in the log stream
    assert!(lines(&out).iter().any(|l| l == "fake setup"));
}

#[tokio::test]
async fn failed_preparation_aborts_with_fail_fast() {
    init_tracing();
    let runner = FakeRunner::new(JobExit::SUCCESS).with_setup_exit(JobExit::from_code(2));
    let cfg = ConfigFileBuilder::new()
        .module("no-such-module")
        .fail_fast(true)
        .build();
    let mut launcher = Launcher::new(cfg, runner.clone());
    let mut out = Vec::new();

    let report = launcher.launch(&primary(), &mut out).await.unwrap();

    assert_eq!(report.phase, LaunchPhase::Aborted);
    assert_eq!(report.exit.code(), 2);
    assert!(report.started_at.is_none());
    assert!(runner.invocations().is_empty());
    assert!(!lines(&out).iter().any(|l| l.starts_with("Start time:")));
}

#[tokio::test]
async fn failed_preparation_continues_without_fail_fast() {
    init_tracing();
    let runner = FakeRunner::new(JobExit::SUCCESS).with_setup_exit(JobExit::from_code(2));
    let cfg = ConfigFileBuilder::new().module("no-such-module").build();
    let mut launcher = Launcher::new(cfg, runner.clone());
    let mut out = Vec::new();

    let report = launcher.launch(&primary(), &mut out).await.unwrap();

    assert_eq!(report.phase, LaunchPhase::Completed);
    assert_eq!(report.exit, JobExit::SUCCESS);

    // the program gets the environment the setup reached, not the inherited one
    let invocations = runner.invocations();
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].env, Some(runner.expected_env()));
}

#[tokio::test]
async fn unstartable_program_still_records_end_time() {
    init_tracing();
    let runner = FakeRunner::new(JobExit::SUCCESS).failing_to_spawn();
    let mut launcher = Launcher::new(ConfigFileBuilder::new().build(), runner);
    let mut out = Vec::new();

    let report = launcher.launch(&primary(), &mut out).await.unwrap();

    assert_eq!(report.exit, JobExit::NOT_FOUND);
    assert_eq!(report.phase, LaunchPhase::Completed);
    assert!(report.finished_at.is_some());
    assert!(lines(&out).iter().any(|l| l.starts_with("End time:")));
}

#[tokio::test]
async fn no_preparation_means_no_setup_shell() {
    init_tracing();
    let runner = FakeRunner::new(JobExit::SUCCESS);
    let mut launcher = Launcher::new(ConfigFileBuilder::new().build(), runner.clone());
    let mut out = Vec::new();

    launcher.launch(&primary(), &mut out).await.unwrap();

    assert!(runner.setups().is_empty());
}
