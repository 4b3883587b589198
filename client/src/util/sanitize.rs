//! Scrubbing pass for untrusted settings payloads.
//!
//! Settings come back from the server and from other tabs' storage, and end
//! up persisted and rendered on public pages. Before they are merged:
//!
//! - strings that look like internal/admin URLs or localhost references are
//!   replaced with `null`;
//! - `data:` URIs whose decoded size would exceed the configured limit are
//!   replaced with `null` so storage cannot grow without bound.
//!
//! Violations are dropped silently (logged at most), never reported.

#[cfg(test)]
#[path = "sanitize_test.rs"]
mod sanitize_test;

use serde_json::{Map, Value};

const LOOPBACK_MARKERS: [&str; 4] = ["localhost", "127.0.0.1", "0.0.0.0", "[::1]"];

/// Return a copy of `value` with every rejected string replaced by `null`.
pub fn sanitize(value: &Value, max_data_uri_bytes: usize) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), sanitize(v, max_data_uri_bytes)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| sanitize(v, max_data_uri_bytes)).collect()),
        Value::String(s) if is_rejected(s, max_data_uri_bytes) => Value::Null,
        other => other.clone(),
    }
}

/// Whether a string value would be dropped by `sanitize`.
pub fn is_rejected(s: &str, max_data_uri_bytes: usize) -> bool {
    let oversized = data_uri_size(s).is_some_and(|bytes| bytes > max_data_uri_bytes);
    oversized || looks_internal(s)
}

/// Heuristic match for loopback hosts and admin endpoints.
pub fn looks_internal(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    if LOOPBACK_MARKERS.iter().any(|m| lower.contains(m)) {
        return true;
    }
    let Some(rest) = strip_url_prefix(&lower) else {
        return false;
    };
    let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
    let host_is_admin = host.split('.').next().is_some_and(|label| label == "admin");
    let path_is_admin = path
        .split(['/', '?', '#'])
        .any(|segment| segment == "admin" || segment.starts_with("admin-") || segment.starts_with("admin_"));
    host_is_admin || path_is_admin
}

/// Split off the scheme of an absolute or protocol-relative URL. A rooted
/// path yields an empty host.
fn strip_url_prefix(lower: &str) -> Option<&str> {
    for scheme in ["https://", "http://", "//"] {
        if let Some(rest) = lower.strip_prefix(scheme) {
            return Some(rest);
        }
    }
    if lower.starts_with('/') {
        return Some(lower);
    }
    None
}

/// Estimated decoded size of a `data:` URI, or `None` for other strings.
pub fn data_uri_size(s: &str) -> Option<usize> {
    let head = s.get(..5)?;
    if !head.eq_ignore_ascii_case("data:") {
        return None;
    }
    let (meta, payload) = s[5..].split_once(',')?;
    if meta.to_ascii_lowercase().ends_with(";base64") {
        let padding = payload.bytes().rev().take_while(|b| *b == b'=').count();
        Some((payload.len() * 3 / 4).saturating_sub(padding))
    } else {
        Some(payload.len())
    }
}
