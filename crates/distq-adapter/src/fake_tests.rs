// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::shell::SuiteHandle;

#[tokio::test]
async fn enumerate_suite_files_returns_registered_files() {
    let adapter = FakeSuiteAdapter::new();
    adapter.add_file("a_spec.rb", &["alpha"]);
    adapter.add_file("b_spec.rb", &["beta"]);

    let mut files = adapter.enumerate_suite_files().await.expect("enumerate");
    files.sort();
    assert_eq!(files, vec![PathBuf::from("a_spec.rb"), PathBuf::from("b_spec.rb")]);
}

#[tokio::test]
async fn enumerate_suites_returns_registered_handles_for_path() {
    let adapter = FakeSuiteAdapter::new();
    adapter.add_file("a_spec.rb", &["alpha", "gamma"]);

    let suites = adapter
        .enumerate_suites(Path::new("a_spec.rb"))
        .await
        .expect("enumerate");
    assert_eq!(
        suites,
        vec![
            SuiteHandle::new("alpha", "a_spec.rb"),
            SuiteHandle::new("gamma", "a_spec.rb"),
        ]
    );
}

#[tokio::test]
async fn run_suite_defaults_to_pass_with_zero_duration() {
    let adapter = FakeSuiteAdapter::new();
    let handle = SuiteHandle::new("alpha", "a_spec.rb");

    let result = adapter.run_suite(&handle).await.expect("run");
    assert_eq!(result.outcome, SuiteOutcome::Pass);
    assert_eq!(result.duration_seconds, 0.0);
}

#[tokio::test]
async fn run_suite_honors_configured_outcome_and_duration() {
    let adapter = FakeSuiteAdapter::new();
    let handle = SuiteHandle::new("alpha", "a_spec.rb");
    adapter.set_outcome(&handle, SuiteOutcome::Error);
    adapter.set_duration(&handle, 4.5);

    let result = adapter.run_suite(&handle).await.expect("run");
    assert_eq!(result.outcome, SuiteOutcome::Error);
    assert_eq!(result.duration_seconds, 4.5);
}

#[tokio::test]
async fn calls_are_recorded_in_order() {
    let adapter = FakeSuiteAdapter::new();
    adapter.add_file("a_spec.rb", &["alpha"]);
    let handle = SuiteHandle::new("alpha", "a_spec.rb");

    adapter.enumerate_suite_files().await.expect("enumerate");
    adapter
        .enumerate_suites(Path::new("a_spec.rb"))
        .await
        .expect("enumerate");
    adapter.run_suite(&handle).await.expect("run");

    let calls = adapter.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0], SuiteCall::EnumerateFiles);
    assert!(matches!(calls[1], SuiteCall::EnumerateSuites { .. }));
    assert!(matches!(calls[2], SuiteCall::RunSuite { .. }));
}
