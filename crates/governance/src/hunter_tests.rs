// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use grace_core::RiskLevel;
use serde_json::json;

use super::*;

fn rule(name: &str, pointer: &str, value: serde_json::Value, severity: Severity) -> SecurityRule {
    SecurityRule { name: name.into(), json_pointer: pointer.into(), matches_value: value, severity }
}

#[test]
fn no_rule_fires_passes_clean() {
    let rules = HunterRules::new(vec![rule("sql-injection", "/payload/raw", json!("DROP TABLE"), Severity::Critical)]);
    let mut req = grace_core::GovernanceRequest::new("actor", "read", "db", RiskLevel::Low);
    req.context = json!({"payload": {"raw": "SELECT 1"}});
    let result = rules.check(&req);
    assert_eq!(result.verdict, StageVerdict::Pass);
}

#[test]
fn critical_rule_is_terminal_deny() {
    let rules = HunterRules::new(vec![rule("sql-injection", "/payload/raw", json!("DROP TABLE"), Severity::Critical)]);
    let mut req = grace_core::GovernanceRequest::new("actor", "write", "db", RiskLevel::High);
    req.context = json!({"payload": {"raw": "DROP TABLE"}});
    let result = rules.check(&req);
    assert_eq!(result.verdict, StageVerdict::Fail);
    assert!(result.detail.contains("sql-injection"));
}

#[test]
fn advisory_rule_passes_but_is_recorded() {
    let rules = HunterRules::new(vec![rule("unusual-hour", "/hour", json!(3), Severity::Advisory)]);
    let mut req = grace_core::GovernanceRequest::new("actor", "write", "db", RiskLevel::Low);
    req.context = json!({"hour": 3});
    let result = rules.check(&req);
    assert_eq!(result.verdict, StageVerdict::Pass);
    assert!(result.detail.contains("unusual-hour"));
}

#[test]
fn critical_finding_event_carries_detector_and_request_fields() {
    let req = grace_core::GovernanceRequest::new("actor-1", "write", "db.prod", RiskLevel::High);
    let payload = critical_finding_event(&req, "sql-injection fired");
    assert_eq!(payload["detector"], json!(HUNTER_DETECTOR));
    assert_eq!(payload["actor"], json!("actor-1"));
    assert_eq!(payload["action"], json!("write"));
    assert_eq!(payload["resource"], json!("db.prod"));
    assert_eq!(payload["detail"], json!("sql-injection fired"));
}
