// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use grace_core::Event;
use tempfile::tempdir;

fn sample_event() -> Event {
    Event::fixture("kernel.heartbeat", "file-store-tests")
}

#[tokio::test]
async fn open_creates_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("journal.log");
    let _journal = FileJournal::open(&path).unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn append_and_reopen_preserves_chain() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("journal.log");

    {
        let journal = FileJournal::open(&path).unwrap();
        journal.append(sample_event()).await.unwrap();
        journal.append(sample_event()).await.unwrap();
        journal.append(sample_event()).await.unwrap();
        journal.flush().await.unwrap();
    }

    let reopened = FileJournal::open(&path).unwrap();
    assert_eq!(reopened.len().await.unwrap(), 3);
    let report = reopened.verify().await.unwrap();
    assert!(report.valid);
}

#[tokio::test]
async fn truncated_final_line_is_dropped_on_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("journal.log");

    {
        let journal = FileJournal::open(&path).unwrap();
        journal.append(sample_event()).await.unwrap();
        journal.append(sample_event()).await.unwrap();
        journal.flush().await.unwrap();
    }

    use std::io::Write;
    let mut f = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
    write!(f, "{{\"sequence\":2,\"prev_hash\"").unwrap();
    drop(f);

    let reopened = FileJournal::open(&path).unwrap();
    assert_eq!(reopened.len().await.unwrap(), 2);
    let report = reopened.verify().await.unwrap();
    assert!(report.valid);
}

#[tokio::test]
async fn range_and_tail_match_in_memory_semantics() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("journal.log");
    let journal = FileJournal::open(&path).unwrap();

    for _ in 0..4 {
        journal.append(sample_event()).await.unwrap();
    }

    let tail = journal.tail().await.unwrap().unwrap();
    assert_eq!(tail.sequence, 3);

    let range = journal.range(1, 2).await.unwrap();
    assert_eq!(range.len(), 2);
}
