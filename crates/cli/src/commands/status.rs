// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `grace status` — spec §6 "current boot phase, ready/degraded/failed/
//! quarantined kernel lists, journal tail sequence".

use grace_wire::{Request, Response, ResponsePayload};

use crate::client::DaemonClient;
use crate::error::ClientError;
use crate::output::{format_or_json, print_failure, OutputFormat};

pub async fn run(client: DaemonClient, format: OutputFormat) -> Result<bool, ClientError> {
    let response = client.call(&Request::Status).await?;
    render(&response, format);
    Ok(response.is_ok())
}

fn render(response: &Response, format: OutputFormat) {
    let ResponsePayload::Status(report) = &response.payload else {
        print_failure(format, response);
        return;
    };
    format_or_json(format, report, || {
        println!("boot phase: {:?}", report.boot_phase);
        println!("journal tail sequence: {}", report.journal_tail_sequence);
        print_kernel_list("ready", &report.ready);
        print_kernel_list("degraded", &report.degraded);
        print_kernel_list("failed", &report.failed);
        print_kernel_list("quarantined", &report.quarantined);
    });
}

fn print_kernel_list<T: std::fmt::Display>(label: &str, names: &[T]) {
    if names.is_empty() {
        return;
    }
    let rendered = names.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
    println!("{label}: {rendered}");
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
