// tests/identify_run.rs

use std::collections::HashMap;

use voidjob::context::{
    JOB_ID_VAR, NODE_LIST_VAR, PROC_ID_VAR, RunContext, STEP_ID_VAR, identify_run,
};

fn context(step: Option<&str>, proc_id: Option<&str>) -> RunContext {
    let mut vars = HashMap::new();
    vars.insert(JOB_ID_VAR.to_string(), "777".to_string());
    vars.insert(NODE_LIST_VAR.to_string(), "nid[0101-0102]".to_string());
    if let Some(step) = step {
        vars.insert(STEP_ID_VAR.to_string(), step.to_string());
    }
    if let Some(proc_id) = proc_id {
        vars.insert(PROC_ID_VAR.to_string(), proc_id.to_string());
    }
    RunContext::from_lookup(|k| vars.get(k).cloned(), "nid0101")
}

fn emitted(ctx: &RunContext) -> (bool, String) {
    let mut out = Vec::new();
    let printed = identify_run(ctx, &mut out).unwrap();
    (printed, String::from_utf8(out).unwrap())
}

#[test]
fn both_unset_prints_identity_block() {
    let (printed, text) = emitted(&context(None, None));

    assert!(printed);
    assert!(text.contains("Hostname: nid0101"));
    assert!(text.contains("Job ID: 777"));
    assert!(text.contains("Node list: nid[0101-0102]"));
    assert!(text.contains("Nodes (2): nid0101 nid0102"));
}

#[test]
fn step_set_prints_nothing() {
    let (printed, text) = emitted(&context(Some("1"), None));
    assert!(!printed);
    assert!(text.is_empty());
}

#[test]
fn rank_set_prints_nothing() {
    let (printed, text) = emitted(&context(None, Some("5")));
    assert!(!printed);
    assert!(text.is_empty());
}

#[test]
fn both_set_prints_nothing() {
    let (printed, text) = emitted(&context(Some("2"), Some("3")));
    assert!(!printed);
    assert!(text.is_empty());
}

#[test]
fn first_task_of_first_step_counts_as_primary() {
    let (printed, _) = emitted(&context(Some("0"), Some("0")));
    assert!(printed);
}

#[test]
fn missing_job_variables_are_reported_as_none() {
    let ctx = RunContext::from_lookup(|_| None, "laptop");
    let (printed, text) = emitted(&ctx);

    assert!(printed);
    assert_eq!(
        text,
        "Hostname: laptop\nJob ID: (none)\nNode list: (none)\n"
    );
}
