// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parked events awaiting resume (spec §4.3's three-way validator contract).
//!
//! A validator that returns `Defer` pauses dispatch rather than rejecting
//! it outright. The event is kept here, keyed by its `correlation_id`,
//! until [`crate::dispatch::Mesh::release`] is called for that id — at
//! which point it is redelivered straight to the route's targets, skipping
//! the validator chain a second time (the defer already recorded *why* it
//! paused; resuming is not re-asking the same question).

use std::collections::HashMap;

use grace_core::{CorrelationId, Event, Route};
use parking_lot::RwLock;

/// One parked event plus the route it matched, so release can redeliver
/// without re-resolving the table (which may have moved on to a newer
/// generation by the time the event is released).
pub struct Parked {
    pub event: Event,
    pub route: Route,
}

#[derive(Default)]
pub struct PendingStore {
    entries: RwLock<HashMap<CorrelationId, Parked>>,
}

impl PendingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `event` under `correlation_id`. A second defer for the same id
    /// replaces the earlier parked event.
    pub fn park(&self, correlation_id: CorrelationId, event: Event, route: Route) {
        self.entries.write().insert(correlation_id, Parked { event, route });
    }

    /// Remove and return the event parked under `correlation_id`, if any.
    pub fn take(&self, correlation_id: &CorrelationId) -> Option<Parked> {
        self.entries.write().remove(correlation_id)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
