//! Scenario 3 (spec.md §8 table): a tampered journal entry must be
//! detected — at startup (boot refuses to proceed, exit code 30) and via
//! the on-demand `verify-journal` admin call against a healthy chain.

use grace_core::{Event, Priority, SystemClock, Timestamp};

use crate::harness::Daemon;

#[test]
fn boot_refuses_a_tampered_journal() {
    let daemon = Daemon::prepare("");

    tokio_block_on(async {
        let seed = grace_journal::FileJournal::open(daemon.journal_path()).expect("open for seeding");
        let event = Event::new(
            "seed.event",
            "seed.source",
            Timestamp::capture(&SystemClock, std::time::Instant::now()),
            Priority::Normal,
            serde_json::json!({}),
        );
        seed.append(event).await.expect("append seed entry");
        seed.flush().await.expect("flush seed entry");
    });

    let raw = std::fs::read_to_string(daemon.journal_path()).expect("read seeded journal");
    let tampered = raw.replacen("\"prev_hash\":\"0", "\"prev_hash\":\"1", 1);
    assert_ne!(raw, tampered, "expected a tamperable prev_hash in the seeded entry");
    std::fs::write(daemon.journal_path(), tampered).expect("write tampered journal");

    let mut daemon = daemon;
    daemon.start();
    let status = daemon.wait_for_exit(std::time::Duration::from_secs(10));
    assert_eq!(status.code(), Some(30), "journal corruption at startup must exit 30 (spec §6 exit codes)");
}

#[test]
fn verify_journal_reports_an_intact_chain_over_the_full_range() {
    let daemon = Daemon::spawn("");

    let output = daemon.grace(&["verify-journal", "0", "1000000"]).success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).expect("utf8 stdout");
    let report: grace_journal::VerificationReport = serde_json::from_str(&stdout).expect("parse VerificationReport");

    assert!(report.valid, "a freshly booted core must have an intact chain: {report:?}");
    assert!(report.break_at_sequence.is_none());
}

fn tokio_block_on<F: std::future::Future>(fut: F) -> F::Output {
    tokio::runtime::Runtime::new().expect("tokio runtime").block_on(fut)
}
