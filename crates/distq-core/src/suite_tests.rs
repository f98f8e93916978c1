// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn suite_ids_with_same_name_different_path_are_distinct() {
    let a = SuiteId::new("login_test", "a/spec.rb");
    let b = SuiteId::new("login_test", "b/spec.rb");
    assert_ne!(a, b);
}

#[test]
fn suite_record_id_matches_fields() {
    let rec = SuiteRecord {
        name: "login_test".into(),
        path: "a/spec.rb".into(),
        duration_seconds: 3.5,
    };
    assert_eq!(rec.id(), SuiteId::new("login_test", "a/spec.rb"));
}

#[parameterized(
    pass = { SuiteOutcome::Pass, true },
    fail = { SuiteOutcome::Fail, false },
    error = { SuiteOutcome::Error, false },
)]
fn is_pass_reflects_outcome(outcome: SuiteOutcome, expected: bool) {
    assert_eq!(outcome.is_pass(), expected);
}

#[test]
fn suite_result_as_record_drops_outcome_and_detail() {
    let result = SuiteResult {
        name: "login_test".into(),
        path: "a/spec.rb".into(),
        duration_seconds: 2.0,
        outcome: SuiteOutcome::Fail,
        detail: vec![1, 2, 3],
    };
    let record = result.as_record();
    assert_eq!(record.name, "login_test");
    assert_eq!(record.duration_seconds, 2.0);
}

#[test]
fn suite_result_serializes_outcome_as_snake_case() {
    let result = SuiteResult {
        name: "x".into(),
        path: "y".into(),
        duration_seconds: 1.0,
        outcome: SuiteOutcome::Error,
        detail: vec![],
    };
    let json = serde_json::to_value(&result).expect("serialize");
    assert_eq!(json["outcome"], "error");
}
