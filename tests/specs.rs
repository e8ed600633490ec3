//! Workspace-level integration specs.
//!
//! Every crate carries its own unit and property tests against its public
//! API (journal continuity, restart budgets, parliament timeouts,
//! synthesizer overrides, escalation — spec.md §8's invariants are
//! exercised there, in-process). This suite is the one place that drives
//! the actual `graced`/`grace` binaries end to end, proving the wire
//! protocol, process boot, and admin surface agree with each other
//! (spec.md §8 "Concrete end-to-end scenarios").

#[path = "specs/harness.rs"]
mod harness;

#[path = "specs/boot.rs"]
mod boot;

#[path = "specs/journal_integrity.rs"]
mod journal_integrity;

#[path = "specs/admin_surface.rs"]
mod admin_surface;
