// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use grace_wire::{Outcome, Response, ResponsePayload};

use super::*;

#[test]
fn text_format_invokes_closure() {
    let mut called = false;
    format_or_json(OutputFormat::Text, &serde_json::json!({ "a": 1 }), || called = true);
    assert!(called);
}

#[test]
fn json_format_skips_closure() {
    let mut called = false;
    format_or_json(OutputFormat::Json, &serde_json::json!({ "a": 1 }), || called = true);
    assert!(!called);
}

#[test]
fn print_failure_does_not_panic_on_either_format() {
    let response = Response {
        outcome: Outcome::Error,
        reason_code: "daemon.boot_timeout".to_string(),
        reason_text: "boot did not complete".to_string(),
        correlation_id: None,
        payload: ResponsePayload::None,
    };
    print_failure(OutputFormat::Text, &response);
    print_failure(OutputFormat::Json, &response);
}
