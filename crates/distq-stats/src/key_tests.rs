// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn key_round_trips_through_display_and_parse() {
    let key = SuiteKey::new("widgets", "spec/widgets_spec.rb");
    let wire = key.to_string();
    assert_eq!(wire, "spec/widgets_spec.rb::widgets");
    assert_eq!(SuiteKey::from_wire_string(&wire), Some(key));
}

#[test]
fn key_round_trips_through_json() {
    let key = SuiteKey::new("widgets", "spec/widgets_spec.rb");
    let json = serde_json::to_string(&key).expect("serialize");
    assert_eq!(json, "\"spec/widgets_spec.rb::widgets\"");
    let back: SuiteKey = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(key, back);
}

#[test]
fn malformed_key_fails_to_deserialize() {
    let err = serde_json::from_str::<SuiteKey>("\"no-separator-here\"").unwrap_err();
    assert!(err.to_string().contains("malformed suite key"));
}

#[test]
fn from_suite_id_preserves_name_and_path() {
    let id = distq_core::SuiteId::new("widgets", "spec/widgets_spec.rb");
    let key: SuiteKey = (&id).into();
    assert_eq!(key.name, "widgets");
    assert_eq!(key.path, std::path::PathBuf::from("spec/widgets_spec.rb"));
}
