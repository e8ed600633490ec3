// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text-vs-JSON rendering, mirroring the teacher's `output::format_or_json`
//! but with no table rendering — every admin response here is a handful
//! of scalar fields, not a list.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn format_or_json<T: Serialize>(format: OutputFormat, data: &T, text_fn: impl FnOnce()) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(data) {
            Ok(text) => println!("{text}"),
            Err(err) => eprintln!("error: could not encode response as JSON: {err}"),
        },
        OutputFormat::Text => text_fn(),
    }
}

/// Renders a `{outcome, reason_code, reason_text}` failure the same way
/// regardless of which command produced it (spec §7: every external
/// caller gets this structured shape).
pub fn print_failure(format: OutputFormat, response: &grace_wire::Response) {
    match format {
        OutputFormat::Json => {
            if let Ok(text) = serde_json::to_string_pretty(response) {
                eprintln!("{text}");
            }
        }
        OutputFormat::Text => {
            eprintln!("error: {} ({})", response.reason_text, response.reason_code);
        }
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
