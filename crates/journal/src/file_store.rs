// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed [`JournalStore`], one entry per line of newline-delimited
//! JSON, append-only on disk.

use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use grace_core::Event;
use tokio::sync::Mutex;

use crate::entry::{JournalEntry, GENESIS_HASH};
use crate::error::JournalError;
use crate::store::JournalStore;
use crate::verifier::{self, VerificationReport};

const FLUSH_THRESHOLD: usize = 100;

struct Inner {
    file: std::fs::File,
    path: PathBuf,
    entries: Vec<JournalEntry>,
    unflushed: usize,
}

/// A journal backed by an append-only file of newline-delimited entries.
///
/// A truncated final line (the process was killed mid-write) is treated as
/// "not yet durable" and silently dropped on open — unlike mid-stream
/// corruption, which is a tamper signal and is surfaced through
/// [`JournalStore::verify`] rather than hidden.
pub struct FileJournal {
    inner: Mutex<Inner>,
}

impl FileJournal {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let entries = if path.exists() { load_valid_entries(&path)? } else { Vec::new() };

        rewrite_clean(&path, &entries)?;

        let file = std::fs::OpenOptions::new().append(true).open(&path)?;

        Ok(Self { inner: Mutex::new(Inner { file, path, entries, unflushed: 0 }) })
    }
}

fn load_valid_entries(path: &Path) -> Result<Vec<JournalEntry>, JournalError> {
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let mut entries = Vec::new();

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<JournalEntry>(&line) {
            Ok(entry) => entries.push(entry),
            Err(_) => break,
        }
    }

    Ok(entries)
}

fn rewrite_clean(path: &Path, entries: &[JournalEntry]) -> Result<(), JournalError> {
    let tmp_path = path.with_extension("tmp");
    {
        let mut tmp = std::fs::File::create(&tmp_path)?;
        for entry in entries {
            let line = serde_json::to_string(entry)
                .map_err(|e| JournalError::Corrupt(format!("re-serializing entry: {e}")))?;
            writeln!(tmp, "{line}")?;
        }
        tmp.flush()?;
    }
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[async_trait]
impl JournalStore for FileJournal {
    async fn append(&self, payload: Event) -> Result<JournalEntry, JournalError> {
        let mut inner = self.inner.lock().await;
        let (sequence, prev_hash) = match inner.entries.last() {
            Some(last) => (last.sequence + 1, last.self_hash),
            None => (0, GENESIS_HASH),
        };
        let entry = JournalEntry::next(sequence, prev_hash, payload)?;

        let line = serde_json::to_string(&entry)
            .map_err(|e| JournalError::Corrupt(format!("serializing entry: {e}")))?;
        writeln!(inner.file, "{line}")?;
        inner.unflushed += 1;
        if inner.unflushed >= FLUSH_THRESHOLD {
            inner.file.flush()?;
            inner.unflushed = 0;
        }

        inner.entries.push(entry.clone());
        Ok(entry)
    }

    async fn range(&self, from: u64, to: u64) -> Result<Vec<JournalEntry>, JournalError> {
        if from > to {
            return Err(JournalError::InvalidRange { from, to });
        }
        let inner = self.inner.lock().await;
        Ok(inner.entries.iter().filter(|e| e.sequence >= from && e.sequence <= to).cloned().collect())
    }

    async fn tail(&self) -> Result<Option<JournalEntry>, JournalError> {
        Ok(self.inner.lock().await.entries.last().cloned())
    }

    async fn len(&self) -> Result<u64, JournalError> {
        Ok(self.inner.lock().await.entries.len() as u64)
    }

    async fn verify(&self) -> Result<VerificationReport, JournalError> {
        let inner = self.inner.lock().await;
        verifier::verify_chain(&inner.entries)
    }
}

impl FileJournal {
    /// Flush any buffered writes to disk. Callers running a drain/shutdown
    /// sequence should call this before exiting.
    pub async fn flush(&self) -> Result<(), JournalError> {
        let mut inner = self.inner.lock().await;
        inner.file.flush()?;
        inner.unflushed = 0;
        Ok(())
    }

    pub async fn path(&self) -> PathBuf {
        self.inner.lock().await.path.clone()
    }
}

#[cfg(test)]
#[path = "file_store_tests.rs"]
mod tests;
