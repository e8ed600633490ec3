// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `grace reload-routes <path>` — spec §6 "atomic generation swap".

use std::path::PathBuf;

use grace_wire::{Request, Response, ResponsePayload};

use crate::client::DaemonClient;
use crate::error::ClientError;
use crate::output::{format_or_json, print_failure, OutputFormat};

pub async fn run(client: DaemonClient, path: PathBuf, format: OutputFormat) -> Result<bool, ClientError> {
    let response = client.call(&Request::ReloadRoutes { path }).await?;
    render(&response, format);
    Ok(response.is_ok())
}

fn render(response: &Response, format: OutputFormat) {
    let ResponsePayload::ReloadRoutes(result) = &response.payload else {
        print_failure(format, response);
        return;
    };
    format_or_json(format, result, || {
        println!("route table reloaded: generation {} -> {}", result.previous_generation, result.new_generation);
    });
}

#[cfg(test)]
#[path = "reload_routes_tests.rs"]
mod tests;
