// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use grace_core::{DecisionSource, Event, FakeClock, Fanout, Pattern, Priority, Route, RouteMatch, SourceInput, Timestamp, Verdict};
use grace_synth::{Synthesizer, WeightStore};
use grace_mesh::{Mesh, RouteTable, ValidatorRegistry};
use grace_control::kernel::KernelContext;

use super::*;

fn routed_ctx() -> KernelContext {
    let store = Arc::new(grace_journal::InMemoryJournalStore::new());
    let journal = grace_journal::JournalWriter::spawn(store, 64);
    let routes = vec![Route {
        route_match: RouteMatch {
            source_pattern: Pattern::new("test"),
            event_type_pattern: Pattern::new(SYNTHESIZE_EVENT),
        },
        targets: vec!["synth.synthesizer".into()],
        priority: 0,
        validators: Vec::new(),
        fanout: Fanout::All,
    }];
    let mesh = Arc::new(Mesh::new(Arc::new(RouteTable::new(routes)), ValidatorRegistry::new()));
    KernelContext { journal, mesh }
}

fn test_inner(mesh: Arc<Mesh>, journal: grace_journal::JournalWriter) -> Arc<Synthesizer<FakeClock>> {
    Arc::new(Synthesizer::new(Arc::new(WeightStore::new()), journal, mesh, FakeClock::new()))
}

#[tokio::test]
async fn initialise_subscribes_and_synthesizes_incoming_requests() {
    let ctx = routed_ctx();
    let inner = test_inner(Arc::clone(&ctx.mesh), ctx.journal.clone());
    let kernel = SynthKernel::new(inner);

    kernel.initialise(&ctx).await.unwrap();
    assert_eq!(kernel.heartbeat().await, HeartbeatStatus::Alive);

    let payload = serde_json::json!({
        "inputs": {
            "governance": SourceInput::new(Verdict::Approve, 0.9, "clean"),
        },
    });
    let clock = FakeClock::new();
    let event = Event::new(
        SYNTHESIZE_EVENT,
        "test",
        Timestamp::capture(&clock, std::time::Instant::now()),
        Priority::High,
        payload,
    );
    ctx.mesh.publish(event).await.unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    kernel.drain().await.unwrap();
}

#[tokio::test]
async fn wire_request_converts_into_synthesis_request() {
    let mut inputs = std::collections::BTreeMap::new();
    inputs.insert(DecisionSource::Governance, SourceInput::new(Verdict::Deny, 0.8, "denied"));
    let wire = SynthesizeRequestWire { correlation_id: None, inputs, immune_critical_anomaly: false, quarantine_target: None };
    let request: grace_synth::SynthesisRequest = wire.into();
    assert_eq!(request.inputs.len(), 1);
    assert!(!request.immune_critical_anomaly);
}

#[tokio::test]
async fn heartbeat_is_unresponsive_before_initialise() {
    let ctx = routed_ctx();
    let inner = test_inner(Arc::clone(&ctx.mesh), ctx.journal.clone());
    let kernel = SynthKernel::new(inner);
    assert_eq!(kernel.heartbeat().await, HeartbeatStatus::Unresponsive);
}
