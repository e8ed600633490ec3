// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! grace-journal: the immutable, hash-chained audit record (spec §4.1).
//!
//! Three layers: [`entry`] defines the chained record shape and the hash
//! computation, [`store`] defines the storage seam (`JournalStore`) plus an
//! in-memory implementation, and [`file_store`] gives a durable,
//! file-backed implementation grounded in the control plane's append-only
//! write-ahead log. [`writer`] serializes concurrent appends through a
//! single task, and [`verifier`] walks a stored chain checking hash and
//! sequence continuity, either on demand or on a background interval via
//! [`JournalHandle::spawn_verifier`].

pub mod entry;
pub mod error;
pub mod file_store;
pub mod store;
pub mod verifier;
pub mod writer;

pub use entry::{JournalEntry, GENESIS_HASH};
pub use error::JournalError;
pub use file_store::FileJournal;
pub use store::{InMemoryJournalStore, JournalStore};
pub use verifier::VerificationReport;
pub use writer::JournalWriter;

use std::sync::Arc;
use std::time::Duration;

/// Ties a [`JournalWriter`] to the underlying [`JournalStore`] it writes
/// through, and owns the background verifier task.
///
/// This is the handle the daemon's core context hands out to the mesh,
/// governance gate, and control plane — callers append through `writer`
/// and read through `store` directly.
#[derive(Clone)]
pub struct JournalHandle {
    pub store: Arc<dyn JournalStore>,
    pub writer: JournalWriter,
}

impl JournalHandle {
    pub fn new(store: Arc<dyn JournalStore>, queue_capacity: usize) -> Self {
        let writer = JournalWriter::spawn(Arc::clone(&store), queue_capacity);
        Self { store, writer }
    }

    /// Spawn a task that verifies the full chain every `interval`, invoking
    /// `on_report` with each result. The daemon wires `on_report` to publish
    /// a `journal.integrity.violation` event onto the mesh when a report
    /// comes back invalid; this crate has no mesh dependency of its own.
    pub fn spawn_verifier<F>(&self, interval: Duration, mut on_report: F) -> tokio::task::JoinHandle<()>
    where
        F: FnMut(VerificationReport) + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match store.verify().await {
                    Ok(report) => on_report(report),
                    Err(err) => tracing::error!(error = %err, "journal verification failed to run"),
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
