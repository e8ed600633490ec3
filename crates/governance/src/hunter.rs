// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage 3: hunter/security scan over the action's payload. A `critical`
//! severity finding is a terminal deny; lesser severities attach
//! advisories to the decision's reason trail without failing the stage.

use grace_core::{GovernanceRequest, StageResult, StageVerdict};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    None,
    Advisory,
    Warning,
    Critical,
}

/// A single signature scanned for in the request's context payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityRule {
    pub name: String,
    pub json_pointer: String,
    pub matches_value: serde_json::Value,
    pub severity: Severity,
}

impl SecurityRule {
    fn fires(&self, context: &serde_json::Value) -> bool {
        context.pointer(&self.json_pointer).map(|v| v == &self.matches_value).unwrap_or(false)
    }
}

#[derive(Default)]
pub struct HunterRules {
    rules: Vec<SecurityRule>,
}

impl HunterRules {
    pub fn new(rules: Vec<SecurityRule>) -> Self {
        Self { rules }
    }

    /// Highest severity among rules that fired, plus their names, in
    /// declared order.
    fn scan(&self, context: &serde_json::Value) -> (Severity, Vec<&str>) {
        let mut highest = Severity::None;
        let mut fired = Vec::new();
        for rule in &self.rules {
            if rule.fires(context) {
                fired.push(rule.name.as_str());
                if rule.severity > highest {
                    highest = rule.severity;
                }
            }
        }
        (highest, fired)
    }

    pub fn check(&self, request: &GovernanceRequest) -> StageResult {
        let (severity, fired) = self.scan(&request.context);
        match severity {
            Severity::Critical => StageResult::new(
                "hunter",
                StageVerdict::Fail,
                format!("critical security rule(s) fired: {}", fired.join(", ")),
            ),
            Severity::None => StageResult::new("hunter", StageVerdict::Pass, "no security rule fired"),
            Severity::Advisory | Severity::Warning => StageResult::new(
                "hunter",
                StageVerdict::Pass,
                format!("advisory rule(s) fired (non-blocking): {}", fired.join(", ")),
            ),
        }
    }
}

/// The detector name the hunter stage records alongside any
/// `anomaly.detected` event it forwards to the immune kernel on a
/// critical finding (spec §4.7 anomaly ingestion happens downstream of
/// this event, not inside the gate itself).
pub const HUNTER_DETECTOR: &str = "governance.hunter";

pub fn critical_finding_event(request: &GovernanceRequest, detail: &str) -> serde_json::Value {
    serde_json::json!({
        "detector": HUNTER_DETECTOR,
        "actor": request.actor.as_str(),
        "action": request.action,
        "resource": request.resource,
        "detail": detail,
    })
}

#[cfg(test)]
#[path = "hunter_tests.rs"]
mod tests;
