// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic binary encoding used wherever bytes get hashed.
//!
//! Spec §6 fixes the field order of the event envelope and forbids floats
//! in hashed positions. `serde_json` does not guarantee key order is
//! preserved or even stable across versions, so journal hashing and any
//! future wire transport go through this encoder instead of `to_vec()`.

use crate::event::Event;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CanonicalError {
    #[error("payload contains a non-integral number at {path}, which cannot be hashed deterministically")]
    FloatInPayload { path: String },
}

/// Something that can be encoded into the canonical binary form used for
/// hashing. Implemented for [`Event`]; other hashed types (route manifests,
/// governance requests) can implement it too.
pub trait CanonicalEncode {
    fn canonical_encode(&self) -> Result<Vec<u8>, CanonicalError>;
}

impl CanonicalEncode for Event {
    fn canonical_encode(&self) -> Result<Vec<u8>, CanonicalError> {
        let mut buf = Vec::new();
        write_bytes(&mut buf, self.id.0.as_bytes());
        write_str(&mut buf, self.event_type.as_str());
        write_str(&mut buf, self.source.as_str());
        write_u64(&mut buf, self.timestamp.monotonic_ns);
        write_u64(&mut buf, self.timestamp.wall_ns);
        write_u8(&mut buf, priority_tag(self.priority));
        match &self.correlation_id {
            Some(c) => {
                write_u8(&mut buf, 1);
                write_str(&mut buf, c.as_str());
            }
            None => write_u8(&mut buf, 0),
        }
        match self.trust_score {
            Some(t) => {
                write_u8(&mut buf, 1);
                // Quantize into a fixed-point integer rather than hashing raw
                // float bits: deterministic across platforms and rounding modes.
                write_u64(&mut buf, (t.clamp(0.0, 1.0) * 1_000_000.0).round() as u64);
            }
            None => write_u8(&mut buf, 0),
        }
        write_value(&mut buf, &self.payload, "payload")?;
        Ok(buf)
    }
}

fn priority_tag(p: crate::event::Priority) -> u8 {
    use crate::event::Priority::*;
    match p {
        Critical => 0,
        High => 1,
        Normal => 2,
        Low => 3,
    }
}

fn write_u8(buf: &mut Vec<u8>, v: u8) {
    buf.push(v);
}

fn write_u64(buf: &mut Vec<u8>, v: u64) {
    buf.extend_from_slice(&v.to_be_bytes());
}

fn write_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    write_u64(buf, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

fn write_str(buf: &mut Vec<u8>, s: &str) {
    write_bytes(buf, s.as_bytes());
}

/// Canonicalize a JSON value: object keys sorted, arrays kept in order,
/// integral numbers encoded as integers, non-integral numbers rejected.
fn write_value(buf: &mut Vec<u8>, value: &Value, path: &str) -> Result<(), CanonicalError> {
    match value {
        Value::Null => write_u8(buf, 0),
        Value::Bool(b) => {
            write_u8(buf, 1);
            write_u8(buf, u8::from(*b));
        }
        Value::Number(n) => {
            write_u8(buf, 2);
            if let Some(i) = n.as_i64() {
                write_u8(buf, 0);
                buf.extend_from_slice(&i.to_be_bytes());
            } else if let Some(u) = n.as_u64() {
                write_u8(buf, 1);
                write_u64(buf, u);
            } else {
                return Err(CanonicalError::FloatInPayload { path: path.to_string() });
            }
        }
        Value::String(s) => {
            write_u8(buf, 3);
            write_str(buf, s);
        }
        Value::Array(items) => {
            write_u8(buf, 4);
            write_u64(buf, items.len() as u64);
            for (i, item) in items.iter().enumerate() {
                write_value(buf, item, &format!("{path}[{i}]"))?;
            }
        }
        Value::Object(map) => {
            write_u8(buf, 5);
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            write_u64(buf, keys.len() as u64);
            for key in keys {
                write_str(buf, key);
                write_value(buf, &map[key], &format!("{path}.{key}"))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "canonical_tests.rs"]
mod tests;
