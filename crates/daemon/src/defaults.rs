// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in governance/immune data the daemon boots with when an operator
//! hasn't supplied their own. Every store here is the same read-mostly,
//! versioned data the runtime reloads at runtime (spec §5) — these are
//! just reasonable version-1 seeds, not hardcoded behavior; an operator
//! replaces them by calling the same `reload`/`register` methods the
//! stores already expose.
//!
//! Per spec §9's open question on constitutional principle count: this
//! seed carries whatever number of principles is useful to demonstrate
//! the pipeline, not a count the rest of the system assumes.

use async_trait::async_trait;
use grace_core::{AnomalyType, RiskLevel, Severity as AnomalySeverity};
use grace_governance::{Policy, Principle, SecurityRule, Vote, VoterPool};
use grace_immune::{Playbook, RemediationAction};

/// A handful of immutable principles an operator would plausibly ship on
/// day one: never let a non-privileged actor touch system-tier resources,
/// and never let any actor delete an audit trail.
pub fn seed_principles() -> Vec<Principle> {
    vec![
        Principle {
            name: "protect-system-tier".to_string(),
            action_prefix: String::new(),
            resource_prefix: "system.".to_string(),
            forbidden: true,
        },
        Principle {
            name: "protect-audit-trail".to_string(),
            action_prefix: "delete".to_string(),
            resource_prefix: "journal.".to_string(),
            forbidden: true,
        },
    ]
}

/// No mutable policies by default — every request falls through to
/// `allow` unless an operator loads policies through `PolicyStore::reload`.
pub fn seed_policies() -> Vec<Policy> {
    Vec::new()
}

/// No signatures by default; `critical` risk alone (via parliament's
/// `required()` check) is what gates a dangerous action absent
/// operator-supplied rules.
pub fn seed_hunter_rules() -> Vec<SecurityRule> {
    Vec::new()
}

/// A minimal playbook catalogue covering the vocabulary's most common
/// case: restart on a performance anomaly, quarantine on anything
/// security-flagged at high severity or above.
pub fn seed_playbooks() -> Vec<Playbook> {
    vec![
        Playbook::new(
            "restart-on-performance-degradation",
            AnomalyType::Performance,
            AnomalySeverity::Medium,
            "*",
            vec![RemediationAction::Restart],
        ),
        Playbook::new(
            "quarantine-on-security-anomaly",
            AnomalyType::Security,
            AnomalySeverity::High,
            "*",
            vec![RemediationAction::OpenCircuitBreaker, RemediationAction::Quarantine, RemediationAction::NotifyParliament],
        ),
    ]
}

/// Classifies a risk level as critical for the parliament-required check
/// shared between the gate and this daemon's wiring.
pub fn is_critical_risk(risk_level: RiskLevel) -> bool {
    risk_level == RiskLevel::Critical
}

/// A voter pool with no registered voters. Per spec §4.5 stage 5: "a
/// timeout without quorum is `denied`" — zero voters always times out
/// without quorum, which is the correct fail-closed default until an
/// operator wires a real pool (human, model ensemble, or a mix).
pub struct NoQuorumVoterPool;

#[async_trait]
impl VoterPool for NoQuorumVoterPool {
    async fn collect_votes(
        &self,
        _request: &grace_core::GovernanceRequest,
        _deadline: std::time::Duration,
    ) -> Vec<Vote> {
        Vec::new()
    }

    fn voter_count(&self) -> usize {
        0
    }
}

#[cfg(test)]
#[path = "defaults_tests.rs"]
mod tests;
