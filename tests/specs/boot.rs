//! Scenario 1 (spec.md §8 table): boot with the fixed infra fleet plus a
//! route-manifest target with no dedicated adapter, and confirm `status`
//! reports every kernel ready.

use crate::harness::Daemon;

#[test]
fn boot_reaches_ready_and_status_reports_the_fleet() {
    let manifest = r#"
        [[route]]
        match = { source = "widget.worker", type = "widget.event" }
        targets = ["widget.sink"]
    "#;
    let daemon = Daemon::spawn(manifest);

    let output = daemon.grace(&["status"]).success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).expect("utf8 stdout");
    let report: grace_wire::StatusReport = serde_json::from_str(&stdout).expect("parse StatusReport");

    assert_eq!(report.boot_phase, grace_wire::BootPhase::Complete);
    assert!(report.failed.is_empty());
    assert!(report.quarantined.is_empty());
    let ready: Vec<String> = report.ready.iter().map(|n| n.to_string()).collect();
    for expected in ["journal", "mesh", "control", "governance.gate", "synth.synthesizer", "immune.kernel", "widget.sink"] {
        assert!(ready.contains(&expected.to_string()), "expected {expected} ready, got {ready:?}");
    }
}

#[test]
fn halt_drains_cleanly_and_stops_the_process() {
    let mut daemon = Daemon::spawn("");

    daemon.grace(&["halt", "integration test teardown"]).success();
    let status = daemon.wait_for_exit(std::time::Duration::from_secs(5));
    assert!(status.success(), "graced should exit 0 after an admin halt");
}
