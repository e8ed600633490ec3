// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use grace_core::DecisionSource;

use super::*;

#[test]
fn starts_from_default_weight_table() {
    let store = WeightStore::new();
    let snapshot = store.snapshot();
    assert_eq!(snapshot.get(&DecisionSource::Governance), Some(&0.4));
    assert_eq!(snapshot.get(&DecisionSource::Memory), Some(&0.1));
    assert_eq!(store.version(), 1);
}

#[test]
fn adjust_bumps_generation_and_clamps() {
    let store = WeightStore::new();
    store.adjust(DecisionSource::Immune, 0.9);
    assert_eq!(store.snapshot()[&DecisionSource::Immune], 1.0);
    assert_eq!(store.version(), 2);

    store.adjust(DecisionSource::Immune, -5.0);
    assert_eq!(store.snapshot()[&DecisionSource::Immune], 0.0);
    assert_eq!(store.version(), 3);
}

#[test]
fn reload_replaces_table_wholesale() {
    let store = WeightStore::new();
    let mut replacement = BTreeMap::new();
    replacement.insert(DecisionSource::Ml, 0.9);
    store.reload(replacement.clone());
    assert_eq!(store.snapshot(), replacement);
    assert_eq!(store.version(), 2);
}

#[test]
fn previous_snapshot_unaffected_by_later_adjust() {
    let store = WeightStore::new();
    let before = store.snapshot();
    store.adjust(DecisionSource::Learning, 0.5);
    assert_ne!(before, store.snapshot());
}
