// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage 1: constitutional check against an immutable, versioned ruleset.
//!
//! The ruleset is data (a list of principles), not a fixed enum, so a
//! deployment can add or retire principles without a code change. A
//! principle matches on `(action, resource)` glob-style prefixes; the
//! first matching principle that forbids the action is dispositive.

use grace_core::{GovernanceRequest, StageResult, StageVerdict};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Verdict for a single constitutional check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstitutionalVerdict {
    Compliant,
    NonCompliant,
    Uncertain,
}

/// One immutable rule: `forbidden` actions/resources matching this prefix
/// pair are non-compliant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principle {
    pub name: String,
    pub action_prefix: String,
    pub resource_prefix: String,
    pub forbidden: bool,
}

impl Principle {
    fn matches(&self, action: &str, resource: &str) -> bool {
        action.starts_with(&self.action_prefix) && resource.starts_with(&self.resource_prefix)
    }
}

/// A versioned, immutable set of principles. Reloading produces a new
/// version; the old version is never mutated in place (spec §5's
/// read-mostly, copy-on-write policy, applied here to the ruleset).
#[derive(Debug, Clone)]
pub struct Ruleset {
    pub version: u64,
    pub principles: Arc<Vec<Principle>>,
}

impl Ruleset {
    pub fn new(version: u64, principles: Vec<Principle>) -> Self {
        Self { version, principles: Arc::new(principles) }
    }

    pub fn empty() -> Self {
        Self::new(0, Vec::new())
    }

    fn evaluate(&self, action: &str, resource: &str) -> (ConstitutionalVerdict, Option<&str>) {
        for principle in self.principles.iter() {
            if principle.forbidden && principle.matches(action, resource) {
                return (ConstitutionalVerdict::NonCompliant, Some(principle.name.as_str()));
            }
        }
        (ConstitutionalVerdict::Compliant, None)
    }
}

/// Holds the current ruleset generation behind a lock; swapped wholesale
/// on reload.
pub struct ConstitutionalStore {
    current: RwLock<Ruleset>,
}

impl ConstitutionalStore {
    pub fn new(ruleset: Ruleset) -> Self {
        Self { current: RwLock::new(ruleset) }
    }

    pub fn reload(&self, ruleset: Ruleset) {
        *self.current.write() = ruleset;
    }

    pub fn version(&self) -> u64 {
        self.current.read().version
    }

    /// Run the constitutional check, returning the stage result and
    /// whichever policy ref was dispositive (if any).
    pub fn check(&self, request: &GovernanceRequest) -> (StageResult, Option<String>) {
        let ruleset = self.current.read();
        let (verdict, principle_name) = ruleset.evaluate(&request.action, &request.resource);
        match verdict {
            ConstitutionalVerdict::Compliant => (
                StageResult::new("constitutional", StageVerdict::Pass, "no forbidding principle matched"),
                None,
            ),
            ConstitutionalVerdict::NonCompliant => {
                let name = principle_name.unwrap_or("unknown").to_string();
                (
                    StageResult::new(
                        "constitutional",
                        StageVerdict::Fail,
                        format!("violates principle '{name}'"),
                    ),
                    Some(name),
                )
            }
            ConstitutionalVerdict::Uncertain => (
                StageResult::new("constitutional", StageVerdict::NotEvaluated, "ruleset could not be evaluated"),
                None,
            ),
        }
    }
}

#[cfg(test)]
#[path = "constitutional_tests.rs"]
mod tests;
