// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `grace halt <reason>` — spec §6 "graceful drain in dependency-reverse
//! order; exit code 0 on clean shutdown, non-zero with a typed reason
//! otherwise".

use grace_wire::{Request, Response, ResponsePayload};

use crate::client::DaemonClient;
use crate::error::ClientError;
use crate::output::{format_or_json, print_failure, OutputFormat};

pub async fn run(client: DaemonClient, reason: String, format: OutputFormat) -> Result<bool, ClientError> {
    let response = client.call(&Request::Halt { reason }).await?;
    render(&response, format);
    Ok(response.is_ok())
}

fn render(response: &Response, format: OutputFormat) {
    let ResponsePayload::Halt(result) = &response.payload else {
        print_failure(format, response);
        return;
    };
    format_or_json(format, result, || {
        if result.drained.is_empty() {
            println!("halted (no kernels were running)");
        } else {
            let drained = result.drained.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
            println!("halted, drained in order: {drained}");
        }
    });
}

#[cfg(test)]
#[path = "halt_tests.rs"]
mod tests;
