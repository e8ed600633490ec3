// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage 2: mutable policy check keyed by `(action, resource, risk_level)`.
//!
//! Policies are read-mostly, copy-on-write data (spec §5); writes to the
//! store go exclusively through the governance gate, never through a
//! side channel.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use grace_core::{GovernanceRequest, RiskLevel, StageResult, StageVerdict};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyVerdict {
    Allow,
    RequireApproval,
    Deny,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub action: String,
    pub resource: String,
    pub risk_level: RiskLevel,
    pub verdict: PolicyVerdict,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PolicyKey {
    action: String,
    resource: String,
    risk_level: RiskLevel,
}

/// A generation of compiled policies, keyed for O(1) lookup.
#[derive(Default)]
struct PolicyGeneration {
    version: u64,
    by_key: HashMap<PolicyKey, Policy>,
}

pub struct PolicyStore {
    current: RwLock<Arc<PolicyGeneration>>,
    /// Set when the backing store (a remote policy service, in a real
    /// deployment) cannot be reached. `check` fails typed rather than
    /// silently falling back to default-allow (spec §4.5 "Failure
    /// semantics", §8 "Policy store unreachable").
    unreachable: AtomicBool,
}

impl PolicyStore {
    pub fn new(policies: Vec<Policy>) -> Self {
        Self { current: RwLock::new(Arc::new(Self::compile(1, policies))), unreachable: AtomicBool::new(false) }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    fn compile(version: u64, policies: Vec<Policy>) -> PolicyGeneration {
        let mut by_key = HashMap::with_capacity(policies.len());
        for policy in policies {
            let key = PolicyKey {
                action: policy.action.clone(),
                resource: policy.resource.clone(),
                risk_level: policy.risk_level,
            };
            by_key.insert(key, policy);
        }
        PolicyGeneration { version, by_key }
    }

    pub fn reload(&self, policies: Vec<Policy>) {
        let next_version = self.current.read().version + 1;
        *self.current.write() = Arc::new(Self::compile(next_version, policies));
    }

    pub fn version(&self) -> u64 {
        self.current.read().version
    }

    /// Simulates the backing store becoming unreachable (or recovering).
    /// Exercised by operators driving a chaos/failure-injection test and
    /// by this crate's own boundary tests.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn is_unreachable(&self) -> bool {
        self.unreachable.load(Ordering::SeqCst)
    }

    /// Default-allow when no policy targets this exact key: the policy
    /// stage only restricts, it never invents a disposition the
    /// constitutional stage didn't already clear.
    pub fn check(&self, request: &GovernanceRequest) -> Result<(StageResult, Option<String>), GovernanceError> {
        if self.is_unreachable() {
            return Err(GovernanceError::PolicyStoreUnreachable(format!(
                "policy store unreachable while evaluating {}/{}",
                request.action, request.resource
            )));
        }
        let generation = self.current.read();
        let key = PolicyKey {
            action: request.action.clone(),
            resource: request.resource.clone(),
            risk_level: request.risk_level,
        };
        let result = match generation.by_key.get(&key) {
            Some(policy) => {
                let verdict = match policy.verdict {
                    PolicyVerdict::Allow => StageVerdict::Pass,
                    PolicyVerdict::RequireApproval => StageVerdict::Pass,
                    PolicyVerdict::Deny => StageVerdict::Fail,
                };
                let detail = format!("matched policy '{}': {:?}", policy.id, policy.verdict);
                (StageResult::new("policy", verdict, detail), Some(policy.id.clone()))
            }
            None => (StageResult::new("policy", StageVerdict::Pass, "no matching policy, default allow"), None),
        };
        Ok(result)
    }

    /// Whether this request requires a parliament vote per the matched
    /// policy (spec §4.5 stage 5 trigger).
    pub fn requires_approval(&self, request: &GovernanceRequest) -> bool {
        let generation = self.current.read();
        let key = PolicyKey {
            action: request.action.clone(),
            resource: request.resource.clone(),
            risk_level: request.risk_level,
        };
        matches!(
            generation.by_key.get(&key).map(|p| p.verdict),
            Some(PolicyVerdict::RequireApproval)
        )
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
