// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn transient_faults_are_retryable() {
    let f = Fault::transient("journal.busy", "writer backlogged");
    assert!(f.is_retryable());
}

#[test]
fn policy_faults_are_not_retryable() {
    let f = Fault::policy("governance.denied", "hunter flagged critical severity");
    assert!(!f.is_retryable());
}

#[test]
fn correlation_id_round_trips_through_json() {
    let f = Fault::integrity("journal.broken", "hash chain mismatch").with_correlation("corr-1");
    let json = serde_json::to_string(&f).unwrap();
    let back: Fault = serde_json::from_str(&json).unwrap();
    assert_eq!(back.correlation_id.as_deref(), Some("corr-1"));
    assert_eq!(back.kind, FaultKind::Integrity);
}
