//! Black-box specs for the full run driver lifecycle (spec.md §4.5, §6.4).
//!
//! These drive the real `distq` binary (which in turn forks real
//! `distq-worker`/`distq-discover` processes) against a fake shell-runner
//! adapter, so the suite queue, discovery subprocess, and worker supervisor
//! all run as genuine OS processes talking over a real Unix socket — only
//! the "did the suite pass" decision is faked.

use crate::prelude::*;

#[test]
fn all_passing_suites_exit_zero_and_are_counted() {
    let project = Project::empty();
    project.suite_file("a_spec", &["alpha", "beta"]);
    project.suite_file("b_spec", &["gamma"]);

    project
        .distq()
        .args(&["--concurrency", "1"])
        .passes()
        .stdout_has("3 suite(s) run")
        .stdout_has("exit status 0");
}

#[test]
fn a_failing_suite_makes_the_run_exit_nonzero() {
    let project = Project::empty();
    let path = project.suite_file("a_spec", &["alpha", "beta"]);
    project.fail_suites(&path, &["beta"]);

    project
        .distq()
        .args(&["--concurrency", "1"])
        .fails()
        .stdout_has("2 suite(s) run")
        .stdout_has("failing: beta");
}

#[test]
fn whitelist_restricts_to_named_suites() {
    let project = Project::empty();
    project.suite_file("a_spec", &["alpha", "beta", "gamma"]);

    project
        .distq()
        .args(&["--concurrency", "1", "--whitelist", "alpha,gamma"])
        .passes()
        .stdout_has("2 suite(s) run");
}

#[test]
fn whitelist_naming_a_suite_that_never_exists_aborts() {
    let project = Project::empty();
    project.suite_file("a_spec", &["alpha"]);

    project
        .distq()
        .args(&["--concurrency", "1", "--whitelist", "ghost"])
        .fails()
        .stderr_has("ghost");
}

#[test]
fn multiple_local_workers_still_run_every_suite_exactly_once() {
    let project = Project::empty();
    project.suite_file("a_spec", &["alpha", "beta", "gamma", "delta"]);

    project
        .distq()
        .args(&["--concurrency", "3"])
        .passes()
        .stdout_has("4 suite(s) run")
        .stdout_has("exit status 0");
}

#[test]
fn stats_file_round_trips_across_runs() {
    let project = Project::empty();
    project.suite_file("a_spec", &["alpha", "beta"]);

    project.distq().args(&["--concurrency", "1"]).passes();

    let stats_path = project.path().join(".test_queue_stats");
    assert!(stats_path.exists(), "first run should write a stats file");
    let contents = std::fs::read_to_string(&stats_path).expect("read stats");
    assert!(contents.contains("alpha"));
    assert!(contents.contains("beta"));

    // A second run against the same stats file should still succeed — the
    // recorded durations only affect initial ordering, not correctness.
    project
        .distq()
        .args(&["--concurrency", "1"])
        .passes()
        .stdout_has("2 suite(s) run");
}
