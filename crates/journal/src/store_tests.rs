// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sample_event(n: u32) -> grace_core::Event {
    grace_core::Event::fixture("kernel.heartbeat", "store-tests").with_trust_score(f64::from(n) / 10.0)
}

#[tokio::test]
async fn append_chains_sequential_entries() {
    let store = InMemoryJournalStore::new();
    let first = store.append(sample_event(1)).await.unwrap();
    let second = store.append(sample_event(2)).await.unwrap();
    assert_eq!(first.sequence, 0);
    assert_eq!(second.sequence, 1);
    assert_eq!(second.prev_hash, first.self_hash);
}

#[tokio::test]
async fn tail_reflects_most_recent_append() {
    let store = InMemoryJournalStore::new();
    store.append(sample_event(1)).await.unwrap();
    let second = store.append(sample_event(2)).await.unwrap();
    let tail = store.tail().await.unwrap().unwrap();
    assert_eq!(tail.sequence, second.sequence);
}

#[tokio::test]
async fn range_rejects_inverted_bounds() {
    let store = InMemoryJournalStore::new();
    store.append(sample_event(1)).await.unwrap();
    let err = store.range(5, 1).await.unwrap_err();
    assert!(matches!(err, JournalError::InvalidRange { from: 5, to: 1 }));
}

#[tokio::test]
async fn range_is_inclusive_on_both_ends() {
    let store = InMemoryJournalStore::new();
    for i in 0..5 {
        store.append(sample_event(i)).await.unwrap();
    }
    let entries = store.range(1, 3).await.unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries.first().unwrap().sequence, 1);
    assert_eq!(entries.last().unwrap().sequence, 3);
}

#[tokio::test]
async fn empty_store_verifies_clean() {
    let store = InMemoryJournalStore::new();
    let report = store.verify().await.unwrap();
    assert!(report.valid);
    assert_eq!(report.entries_checked, 0);
}

#[tokio::test]
async fn populated_store_verifies_clean() {
    let store = InMemoryJournalStore::new();
    for i in 0..10 {
        store.append(sample_event(i)).await.unwrap();
    }
    let report = store.verify().await.unwrap();
    assert!(report.valid);
    assert_eq!(report.entries_checked, 10);
}
