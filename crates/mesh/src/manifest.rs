// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative route manifests, loaded from TOML (spec §4.3).
//!
//! A manifest is validated fully before it is allowed to become a
//! [`crate::table::RouteTable`] generation: empty target lists, unknown
//! fanout strings, and duplicate `(match.source, match.type)` pairs are all
//! rejected at load time rather than discovered during dispatch.

use std::collections::HashSet;
use std::path::Path;

use grace_core::{ComponentId, Fanout, Pattern, Route, RouteMatch, ValidatorName};
use serde::Deserialize;

use crate::error::MeshError;

#[derive(Debug, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    route: Vec<RouteEntry>,
}

#[derive(Debug, Deserialize)]
struct RouteEntry {
    #[serde(rename = "match")]
    route_match: MatchEntry,
    targets: Vec<String>,
    #[serde(default)]
    priority: u32,
    #[serde(default)]
    validators: Vec<String>,
    #[serde(default = "default_fanout")]
    fanout: Fanout,
}

fn default_fanout() -> Fanout {
    Fanout::All
}

#[derive(Debug, Deserialize)]
struct MatchEntry {
    source: String,
    #[serde(rename = "type")]
    event_type: String,
}

/// Parse and validate a manifest from TOML text.
pub fn parse(toml_source: &str) -> Result<Vec<Route>, MeshError> {
    let parsed: ManifestFile = toml::from_str(toml_source)
        .map_err(|e| MeshError::InvalidManifest { path: "<in-memory>".to_string(), detail: e.to_string() })?;
    validate(parsed.route)
}

/// Parse and validate a manifest from a file on disk.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<Route>, MeshError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| MeshError::InvalidManifest {
        path: path.display().to_string(),
        detail: e.to_string(),
    })?;
    let parsed: ManifestFile = toml::from_str(&text).map_err(|e| MeshError::InvalidManifest {
        path: path.display().to_string(),
        detail: e.to_string(),
    })?;
    validate(parsed.route)
}

fn validate(entries: Vec<RouteEntry>) -> Result<Vec<Route>, MeshError> {
    let mut seen = HashSet::new();
    let mut routes = Vec::with_capacity(entries.len());

    for entry in entries {
        if entry.targets.is_empty() {
            return Err(MeshError::InvalidManifest {
                path: "<manifest>".to_string(),
                detail: format!(
                    "route for '{}'/'{}' has no targets",
                    entry.route_match.source, entry.route_match.event_type
                ),
            });
        }

        let key = (entry.route_match.source.clone(), entry.route_match.event_type.clone());
        if !seen.insert(key) {
            return Err(MeshError::InvalidManifest {
                path: "<manifest>".to_string(),
                detail: format!(
                    "duplicate route for source '{}' type '{}'",
                    entry.route_match.source, entry.route_match.event_type
                ),
            });
        }

        routes.push(Route {
            route_match: RouteMatch {
                source_pattern: Pattern::new(entry.route_match.source),
                event_type_pattern: Pattern::new(entry.route_match.event_type),
            },
            targets: entry.targets.into_iter().map(ComponentId::new).collect(),
            priority: entry.priority,
            validators: entry.validators.into_iter().map(ValidatorName).collect(),
            fanout: entry.fanout,
        });
    }

    Ok(routes)
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
