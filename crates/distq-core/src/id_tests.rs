// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn generate_produces_hex_string_of_expected_length() {
    let token = RunToken::generate();
    assert_eq!(token.as_str().len(), 32);
    assert!(token.as_str().chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn two_generated_tokens_differ() {
    assert_ne!(RunToken::generate(), RunToken::generate());
}

#[test]
fn from_hex_round_trips_through_display() {
    let token = RunToken::from_hex("deadbeef");
    assert_eq!(token.to_string(), "deadbeef");
}

#[test]
fn serializes_as_bare_string() {
    let token = RunToken::from_hex("cafef00d");
    let json = serde_json::to_string(&token).expect("serialize");
    assert_eq!(json, "\"cafef00d\"");
}
