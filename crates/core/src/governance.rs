// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Governance request/decision data model — spec §3.5 / §4.5.
//!
//! The pipeline that produces these (constitutional → policy → hunter →
//! verification → parliament) lives in `grace-governance`; this module is
//! just the wire-stable shape of a request and its terminal decision so
//! other crates (synth, immune, wire) can reference it without depending
//! on the pipeline implementation.

use serde::{Deserialize, Serialize};

use crate::event::{ComponentId, CorrelationId};

crate::define_id! {
    /// Unique identifier for a governance decision.
    pub struct DecisionId("gdc-");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// `{actor, action, resource, risk_level, context}` (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceRequest {
    pub actor: ComponentId,
    pub action: String,
    pub resource: String,
    pub risk_level: RiskLevel,
    pub context: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<CorrelationId>,
}

impl GovernanceRequest {
    pub fn new(
        actor: impl Into<ComponentId>,
        action: impl Into<String>,
        resource: impl Into<String>,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            actor: actor.into(),
            action: action.into(),
            resource: resource.into(),
            risk_level,
            context: serde_json::Value::Null,
            correlation_id: None,
        }
    }
}

/// Terminal outcome of the governance pipeline (spec §3.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Approved,
    Denied,
    RequiresParliament,
    Deferred,
}

/// Per-stage verdict, distinct from the overall [`Disposition`] so that a
/// short-circuited stage can be recorded as `NotEvaluated` rather than as
/// an implicit pass (spec §4.5 invariant, §8 testable property #6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageVerdict {
    Pass,
    Fail,
    NotEvaluated,
}

/// One `(check_name, verdict, detail)` tuple in the decision's reason trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResult {
    pub check_name: String,
    pub verdict: StageVerdict,
    pub detail: String,
}

impl StageResult {
    pub fn new(check_name: impl Into<String>, verdict: StageVerdict, detail: impl Into<String>) -> Self {
        Self { check_name: check_name.into(), verdict, detail: detail.into() }
    }

    pub fn not_evaluated(check_name: impl Into<String>) -> Self {
        Self::new(check_name, StageVerdict::NotEvaluated, "short-circuited by an earlier stage")
    }
}

/// The signed, terminal governance decision for one request (spec §3.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceDecision {
    pub id: DecisionId,
    pub request: GovernanceRequest,
    pub disposition: Disposition,
    pub reasons: Vec<StageResult>,
    pub policy_refs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at_epoch_ms: Option<u64>,
    /// Journal sequence number where this decision was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_id: Option<u64>,
}

impl GovernanceDecision {
    pub fn is_approved(&self) -> bool {
        self.disposition == Disposition::Approved
    }
}

#[cfg(test)]
#[path = "governance_tests.rs"]
mod tests;
