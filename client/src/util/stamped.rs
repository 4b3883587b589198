//! Version-stamped persisted payloads.
//!
//! DESIGN
//! ======
//! Every persisted value is written as `{"version": n, "value": ...}` with a
//! per-key counter that only moves forward. A tab receiving another tab's
//! write applies it only when it is newer than what it holds, so stale
//! writes are rejected deterministically instead of by arrival order. Two
//! writes racing to the same version break the tie on their serialized
//! content, which every tab computes identically.
//!
//! Payloads written before stamping existed (bare JSON) decode as version 0.

#[cfg(test)]
#[path = "stamped_test.rs"]
mod stamped_test;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stamped<T> {
    pub version: u64,
    pub value: T,
}

impl<T> Stamped<T> {
    pub fn new(version: u64, value: T) -> Self {
        Self { version, value }
    }

    /// Wrap `value` with the version after `current`.
    pub fn next(current: u64, value: T) -> Self {
        Self { version: current.saturating_add(1), value }
    }
}

impl<T: Serialize> Stamped<T> {
    /// Whether `self` should replace `current`.
    pub fn supersedes(&self, current: &Stamped<T>) -> bool {
        if self.version != current.version {
            return self.version > current.version;
        }
        canonical(&self.value) > canonical(&current.value)
    }
}

/// Decode a stamped envelope, or a bare legacy payload as version 0.
/// Returns `None` for anything that is not valid JSON of the right shape.
pub fn decode<T: DeserializeOwned>(raw: &str) -> Option<Stamped<T>> {
    let json: Value = serde_json::from_str(raw).ok()?;
    if let Some((version, inner)) = envelope_parts(&json) {
        let value = serde_json::from_value(inner.clone()).ok()?;
        return Some(Stamped { version, value });
    }
    serde_json::from_value(json).ok().map(|value| Stamped { version: 0, value })
}

/// Read just the version of a persisted payload, 0 when absent or unparseable.
pub fn peek_version(raw: Option<&str>) -> u64 {
    raw.and_then(|r| serde_json::from_str::<Value>(r).ok())
        .and_then(|json| envelope_parts(&json).map(|(v, _)| v))
        .unwrap_or(0)
}

fn envelope_parts(json: &Value) -> Option<(u64, &Value)> {
    let map = json.as_object()?;
    if map.len() != 2 {
        return None;
    }
    let version = map.get("version")?.as_u64()?;
    let inner = map.get("value")?;
    Some((version, inner))
}

fn canonical<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}
