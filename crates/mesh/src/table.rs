// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compiled route tables, swapped atomically on reload (spec §4.3).
//!
//! Each load of a manifest produces a new `generation`; [`RouteTable::swap`]
//! installs it behind an `arc-swap`-free `parking_lot::RwLock` so readers
//! never observe a half-updated table, and the previous generation is
//! simply dropped once no in-flight dispatch still holds a clone of it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use grace_core::Route;
use parking_lot::RwLock;

use crate::error::MeshError;

/// A single immutable, resolvable snapshot of the route manifest.
#[derive(Debug, Clone)]
pub struct Generation {
    pub id: u64,
    pub routes: Arc<Vec<Route>>,
}

impl Generation {
    /// All routes matching `(source, event_type)`, ordered so that
    /// `matches.first()` is the single winning route a dispatcher should
    /// act on (spec §4.3 step 1: "most-specific match wins").
    ///
    /// Ordered by specificity, ties broken by declared `priority` (higher
    /// wins), remaining ties broken by manifest/declaration order — `sort_by`
    /// is stable, so routes of equal specificity and priority keep the
    /// relative order they were declared in.
    pub fn resolve(&self, source: &str, event_type: &str) -> Vec<&Route> {
        let mut matches: Vec<&Route> =
            self.routes.iter().filter(|r| r.matches(source, event_type)).collect();
        matches.sort_by(|a, b| {
            b.route_match
                .specificity()
                .cmp(&a.route_match.specificity())
                .then_with(|| b.priority.cmp(&a.priority))
        });
        matches
    }
}

/// Holds the live [`Generation`] and swaps it on reload.
pub struct RouteTable {
    current: RwLock<Generation>,
    next_id: AtomicU64,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            current: RwLock::new(Generation { id: 0, routes: Arc::new(routes) }),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Load a manifest and atomically install it as the new generation.
    pub fn reload_from_str(&self, toml_source: &str) -> Result<u64, MeshError> {
        let routes = crate::manifest::parse(toml_source)?;
        Ok(self.install(routes))
    }

    pub fn reload_from_path(&self, path: impl AsRef<std::path::Path>) -> Result<u64, MeshError> {
        let routes = crate::manifest::load(path)?;
        Ok(self.install(routes))
    }

    fn install(&self, routes: Vec<Route>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut current = self.current.write();
        *current = Generation { id, routes: Arc::new(routes) };
        id
    }

    /// A cheap clone of the current generation for a dispatch call to hold
    /// across its own async boundary without keeping the lock taken.
    pub fn snapshot(&self) -> Generation {
        self.current.read().clone()
    }

    pub fn generation_id(&self) -> u64 {
        self.current.read().id
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
