// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Route data model — spec §3.3.
//!
//! A `Route` is plain data; matching and dispatch behavior live in
//! `grace-mesh`. Keeping the type here lets `grace-control` and
//! `grace-governance` reference `Route`/`Fanout` without depending on the
//! mesh's dispatcher.

use serde::{Deserialize, Serialize};

use crate::event::ComponentId;

/// How a route delivers to its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fanout {
    All,
    FirstAvailable,
}

/// A single pattern segment: either a literal or the trailing wildcard `*`.
///
/// Spec §3.3 allows "a single trailing wildcard segment", e.g.
/// `kernel.restart.*` matches `kernel.restart.initiated` and
/// `kernel.restart.exhausted` but not `kernel.other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern(String);

impl Pattern {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.0.ends_with(".*") || self.0 == "*"
    }

    /// Whether this pattern matches `candidate`. Exact string match, or a
    /// trailing-wildcard prefix match.
    pub fn matches(&self, candidate: &str) -> bool {
        if self.0 == "*" {
            return true;
        }
        if let Some(prefix) = self.0.strip_suffix(".*") {
            return candidate == prefix || candidate.starts_with(&format!("{prefix}."));
        }
        self.0 == candidate
    }

    /// Specificity score used for most-specific-match-wins resolution:
    /// higher is more specific. Exact match beats wildcard.
    pub fn specificity(&self) -> u8 {
        if self.is_wildcard() {
            0
        } else {
            1
        }
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The `(source_pattern, event_type_pattern)` match clause of a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMatch {
    pub source_pattern: Pattern,
    pub event_type_pattern: Pattern,
}

impl RouteMatch {
    pub fn matches(&self, source: &str, event_type: &str) -> bool {
        self.source_pattern.matches(source) && self.event_type_pattern.matches(event_type)
    }

    /// Combined specificity, used to resolve ties among multiple matching
    /// routes: exact > wildcard-type > wildcard-source > wildcard-both
    /// (spec §4.3 dispatch algorithm step 1).
    pub fn specificity(&self) -> u8 {
        self.source_pattern.specificity() * 2 + self.event_type_pattern.specificity()
    }
}

/// A named validator stage a route requires before dispatch (spec §4.3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidatorName(pub String);

impl ValidatorName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

/// A declarative routing entry (spec §3.3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    #[serde(rename = "match")]
    pub route_match: RouteMatch,
    pub targets: Vec<ComponentId>,
    pub priority: u32,
    #[serde(default)]
    pub validators: Vec<ValidatorName>,
    pub fanout: Fanout,
}

impl Route {
    pub fn matches(&self, source: &str, event_type: &str) -> bool {
        self.route_match.matches(source, event_type)
    }
}

#[cfg(test)]
#[path = "route_tests.rs"]
mod tests;
