// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`JournalStore`]: the storage seam the rest of the crate is built around.

use async_trait::async_trait;
use grace_core::Event;

use crate::entry::JournalEntry;
use crate::error::JournalError;
use crate::verifier::VerificationReport;

/// Append-only, hash-chained storage for journal entries.
///
/// Implementations must serialize concurrent `append` calls themselves —
/// [`crate::writer::JournalWriter`] relies on a single in-flight append at a
/// time, but a store used directly (e.g. in tests) must still uphold the
/// chain invariant under concurrent callers.
#[async_trait]
pub trait JournalStore: Send + Sync {
    /// Append `payload` as the next entry in the chain.
    async fn append(&self, payload: Event) -> Result<JournalEntry, JournalError>;

    /// Entries with `from <= sequence <= to`, in ascending order.
    async fn range(&self, from: u64, to: u64) -> Result<Vec<JournalEntry>, JournalError>;

    /// The most recently appended entry, if any.
    async fn tail(&self) -> Result<Option<JournalEntry>, JournalError>;

    /// Number of entries currently stored.
    async fn len(&self) -> Result<u64, JournalError>;

    async fn is_empty(&self) -> Result<bool, JournalError> {
        Ok(self.len().await? == 0)
    }

    /// Walk the full chain, checking hash and sequence continuity.
    async fn verify(&self) -> Result<VerificationReport, JournalError>;
}

/// In-memory store for tests and for the control-plane dry-run mode.
#[derive(Debug, Default)]
pub struct InMemoryJournalStore {
    entries: tokio::sync::Mutex<Vec<JournalEntry>>,
}

impl InMemoryJournalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JournalStore for InMemoryJournalStore {
    async fn append(&self, payload: Event) -> Result<JournalEntry, JournalError> {
        let mut entries = self.entries.lock().await;
        let (sequence, prev_hash) = match entries.last() {
            Some(last) => (last.sequence + 1, last.self_hash),
            None => (0, crate::entry::GENESIS_HASH),
        };
        let entry = JournalEntry::next(sequence, prev_hash, payload)?;
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn range(&self, from: u64, to: u64) -> Result<Vec<JournalEntry>, JournalError> {
        if from > to {
            return Err(JournalError::InvalidRange { from, to });
        }
        let entries = self.entries.lock().await;
        Ok(entries.iter().filter(|e| e.sequence >= from && e.sequence <= to).cloned().collect())
    }

    async fn tail(&self) -> Result<Option<JournalEntry>, JournalError> {
        Ok(self.entries.lock().await.last().cloned())
    }

    async fn len(&self) -> Result<u64, JournalError> {
        Ok(self.entries.lock().await.len() as u64)
    }

    async fn verify(&self) -> Result<VerificationReport, JournalError> {
        let entries = self.entries.lock().await;
        crate::verifier::verify_chain(&entries)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
