// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use grace_wire::{Outcome, ReloadRoutesResult, Response, ResponsePayload};

use super::*;

#[test]
fn renders_generation_bump() {
    let response =
        Response::ok(ResponsePayload::ReloadRoutes(ReloadRoutesResult { previous_generation: 3, new_generation: 4 }));
    render(&response, OutputFormat::Text);
    render(&response, OutputFormat::Json);
}

#[test]
fn falls_back_to_failure_rendering() {
    let response = Response {
        outcome: Outcome::Error,
        reason_code: "daemon.route_manifest_invalid".to_string(),
        reason_text: "unknown field `foo`".to_string(),
        correlation_id: None,
        payload: ResponsePayload::None,
    };
    render(&response, OutputFormat::Text);
}
