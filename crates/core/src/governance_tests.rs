// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn approved_disposition_reports_approved() {
    let req = GovernanceRequest::new("agent_x", "delete", "job:123", RiskLevel::High);
    let decision = GovernanceDecision {
        id: DecisionId::new(),
        request: req,
        disposition: Disposition::Approved,
        reasons: vec![StageResult::new("constitutional", StageVerdict::Pass, "ok")],
        policy_refs: vec![],
        expires_at_epoch_ms: None,
        audit_id: Some(7),
    };
    assert!(decision.is_approved());
}

#[test]
fn not_evaluated_stage_is_distinct_from_pass() {
    let stage = StageResult::not_evaluated("hunter");
    assert_eq!(stage.verdict, StageVerdict::NotEvaluated);
    assert_ne!(stage.verdict, StageVerdict::Pass);
}

#[test]
fn risk_levels_order_by_severity() {
    assert!(RiskLevel::Critical > RiskLevel::High);
    assert!(RiskLevel::High > RiskLevel::Medium);
    assert!(RiskLevel::Medium > RiskLevel::Low);
}
