// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The event envelope that flows through the mesh and into the journal.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::Clock;

/// Opaque 128-bit event identifier (spec §3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

crate::define_id! {
    /// Ties together all events belonging to one logical operation.
    pub struct CorrelationId("cor-");
}

/// Hierarchical dotted event type, e.g. `kernel.restart.initiated`.
///
/// Immutable after emission (spec §3.1 invariant). Stored as a [`smol_str::SmolStr`]
/// so cloning a route table full of these is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventType(smol_str::SmolStr);

impl EventType {
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(smol_str::SmolStr::new(s.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Dot-separated segments, e.g. `["kernel", "restart", "initiated"]`.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EventType {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Delivery priority (spec §3.1). Ordering is significant: `Critical` is the
/// highest priority and sorts first under the default `Ord` derive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Normal,
    Low,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

/// Monotonic + wall-clock timestamp pair (spec §3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    /// Nanoseconds since an arbitrary, process-local monotonic origin.
    pub monotonic_ns: u64,
    /// Nanoseconds since the Unix epoch.
    pub wall_ns: u64,
}

impl Timestamp {
    /// Capture a timestamp from a [`Clock`], using `epoch_ms` for the wall
    /// component and the clock's monotonic instant (relative to process
    /// start) for the monotonic component.
    pub fn capture(clock: &impl Clock, origin: std::time::Instant) -> Self {
        let monotonic_ns = clock.now().saturating_duration_since(origin).as_nanos() as u64;
        let wall_ns = clock.epoch_ms().saturating_mul(1_000_000);
        Self { monotonic_ns, wall_ns }
    }

    /// A timestamp derived purely from the wall clock, for contexts without
    /// a shared monotonic origin (e.g. deserialized events).
    pub fn from_epoch_ms(epoch_ms: u64) -> Self {
        Self { monotonic_ns: 0, wall_ns: epoch_ms.saturating_mul(1_000_000) }
    }
}

/// A component-producing-component id, e.g. a kernel name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ComponentId(smol_str::SmolStr);

impl ComponentId {
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(smol_str::SmolStr::new(s.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::borrow::Borrow<str> for ComponentId {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ComponentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ComponentId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// The event envelope (spec §3.1 / §6).
///
/// `payload` is kept as [`serde_json::Value`] at the edges; hashing goes
/// through [`crate::canonical`] rather than `serde_json`'s key order, which
/// is not guaranteed stable across serde_json versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub source: ComponentId,
    pub timestamp: Timestamp,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<CorrelationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_score: Option<f64>,
    pub payload: serde_json::Value,
}

impl Event {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        event_type: impl Into<EventType>,
        source: impl Into<ComponentId>,
        timestamp: Timestamp,
        priority: Priority,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: EventId::new(),
            event_type: event_type.into(),
            source: source.into(),
            timestamp,
            priority,
            correlation_id: None,
            trust_score: None,
            payload,
        }
    }

    pub fn with_correlation(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    pub fn with_trust_score(mut self, trust_score: f64) -> Self {
        self.trust_score = Some(trust_score.clamp(0.0, 1.0));
        self
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Event {
    /// Minimal fixture for tests that don't care about the full envelope.
    pub fn fixture(event_type: &str, source: &str) -> Self {
        Self::new(
            event_type,
            source,
            Timestamp::from_epoch_ms(0),
            Priority::Normal,
            serde_json::Value::Null,
        )
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
