// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::event::{Event, Priority, Timestamp};
use serde_json::json;

#[test]
fn identical_events_encode_identically() {
    let mut e = Event::fixture("kernel.ready", "journal");
    e.id = crate::event::EventId(uuid::Uuid::nil());
    e.timestamp = Timestamp::from_epoch_ms(42);
    e.payload = json!({"b": 2, "a": 1});
    let mut e2 = e.clone();
    e2.payload = json!({"a": 1, "b": 2});
    assert_eq!(e.canonical_encode().unwrap(), e2.canonical_encode().unwrap());
}

#[test]
fn differing_priority_changes_encoding() {
    let mut e1 = Event::fixture("x.y", "a");
    e1.priority = Priority::Critical;
    let mut e2 = e1.clone();
    e2.priority = Priority::Low;
    e1.id = e2.id;
    assert_ne!(e1.canonical_encode().unwrap(), e2.canonical_encode().unwrap());
}

#[test]
fn non_integral_payload_number_is_rejected() {
    let mut e = Event::fixture("x.y", "a");
    e.payload = json!({"score": 0.5});
    let err = e.canonical_encode().unwrap_err();
    assert_eq!(err, CanonicalError::FloatInPayload { path: "payload.score".to_string() });
}

#[test]
fn integral_payload_numbers_are_accepted() {
    let mut e = Event::fixture("x.y", "a");
    e.payload = json!({"count": 7, "neg": -3});
    assert!(e.canonical_encode().is_ok());
}

#[test]
fn trust_score_is_quantized_not_raw_float_bits() {
    let mut e1 = Event::fixture("x.y", "a").with_trust_score(0.5);
    let mut e2 = Event::fixture("x.y", "a").with_trust_score(0.5);
    e1.id = crate::event::EventId(uuid::Uuid::nil());
    e2.id = e1.id;
    e1.timestamp = Timestamp::from_epoch_ms(0);
    e2.timestamp = e1.timestamp;
    assert_eq!(e1.canonical_encode().unwrap(), e2.canonical_encode().unwrap());
}
