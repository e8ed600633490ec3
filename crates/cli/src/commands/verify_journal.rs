// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `grace verify-journal <from> <to>` — spec §6 `VerificationReport`.

use grace_wire::{Request, Response, ResponsePayload};

use crate::client::DaemonClient;
use crate::error::ClientError;
use crate::output::{format_or_json, print_failure, OutputFormat};

pub async fn run(client: DaemonClient, from: u64, to: u64, format: OutputFormat) -> Result<bool, ClientError> {
    let response = client.call(&Request::VerifyJournal { from, to }).await?;
    let ok = response.is_ok() && matches!(&response.payload, ResponsePayload::VerifyJournal(r) if r.valid);
    render(&response, format);
    Ok(ok)
}

fn render(response: &Response, format: OutputFormat) {
    let ResponsePayload::VerifyJournal(report) = &response.payload else {
        print_failure(format, response);
        return;
    };
    format_or_json(format, report, || {
        if report.valid {
            println!("chain intact: {} entries verified", report.entries_checked);
        } else {
            println!(
                "chain broken at sequence {}: {} ({} entries verified before the break)",
                report.break_at_sequence.unwrap_or_default(),
                report.detail,
                report.entries_checked,
            );
        }
    });
}

#[cfg(test)]
#[path = "verify_journal_tests.rs"]
mod tests;
