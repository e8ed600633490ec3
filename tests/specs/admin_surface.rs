//! Exercises the remaining administrative operation from spec.md §6 that
//! isn't covered by `boot.rs` or `journal_integrity.rs`: an atomic route
//! table reload against a live daemon.

use crate::harness::Daemon;

#[test]
fn reload_routes_bumps_the_generation() {
    let daemon = Daemon::spawn("");

    let before = daemon.grace(&["status"]).success();
    let before_stdout = String::from_utf8(before.get_output().stdout.clone()).expect("utf8 stdout");
    let before_report: grace_wire::StatusReport = serde_json::from_str(&before_stdout).expect("parse StatusReport");
    assert_eq!(before_report.boot_phase, grace_wire::BootPhase::Complete);

    let new_manifest = daemon.route_manifest_path().with_file_name("reloaded.toml");
    std::fs::write(
        &new_manifest,
        r#"
        [[route]]
        match = { source = "widget.worker", type = "widget.event" }
        targets = ["widget.sink"]
    "#,
    )
    .expect("write reloaded manifest");

    let output = daemon.grace(&["reload-routes", new_manifest.to_str().expect("utf8 path")]).success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).expect("utf8 stdout");
    let result: grace_wire::ReloadRoutesResult = serde_json::from_str(&stdout).expect("parse ReloadRoutesResult");

    assert!(result.new_generation > result.previous_generation, "reload must bump the generation monotonically");

    // Registration only happens during the boot window (spec §4.2); a
    // runtime route reload swaps the table but must not, by itself,
    // change which kernels are registered and ready.
    let after = daemon.grace(&["status"]).success();
    let after_stdout = String::from_utf8(after.get_output().stdout.clone()).expect("utf8 stdout");
    let after_report: grace_wire::StatusReport = serde_json::from_str(&after_stdout).expect("parse StatusReport");

    let mut before_ready: Vec<String> = before_report.ready.iter().map(|n| n.to_string()).collect();
    let mut after_ready: Vec<String> = after_report.ready.iter().map(|n| n.to_string()).collect();
    before_ready.sort();
    after_ready.sort();
    similar_asserts::assert_eq!(before_ready, after_ready);
}

#[test]
fn unreachable_socket_fails_fast_without_starting_a_daemon() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ghost_socket = dir.path().join("nobody-home.sock");

    assert_cmd::Command::cargo_bin("grace")
        .expect("grace binary built by the workspace")
        .arg("--socket")
        .arg(&ghost_socket)
        .arg("status")
        .assert()
        .failure()
        .code(2);
}
