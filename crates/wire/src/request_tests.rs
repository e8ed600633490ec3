// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn status_round_trips_with_no_fields() {
    let encoded = serde_json::to_string(&Request::Status).unwrap();
    assert_eq!(encoded, r#"{"op":"status"}"#);
    assert_eq!(serde_json::from_str::<Request>(&encoded).unwrap(), Request::Status);
}

#[test]
fn halt_carries_a_reason() {
    let request = Request::Halt { reason: "operator requested drain".to_string() };
    let encoded = serde_json::to_string(&request).unwrap();
    let decoded: Request = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, request);
}

#[test]
fn reload_routes_carries_a_path() {
    let request = Request::ReloadRoutes { path: "/etc/grace/routes.toml".into() };
    let decoded: Request = serde_json::from_str(&serde_json::to_string(&request).unwrap()).unwrap();
    assert_eq!(decoded, request);
}

#[test]
fn verify_journal_carries_a_range() {
    let request = Request::VerifyJournal { from: 0, to: 1200 };
    let decoded: Request = serde_json::from_str(&serde_json::to_string(&request).unwrap()).unwrap();
    assert_eq!(decoded, request);
}

#[test]
fn unknown_op_fails_to_parse() {
    let err = serde_json::from_str::<Request>(r#"{"op":"reboot-everything"}"#).unwrap_err();
    assert!(err.is_data());
}
