use super::*;
use serde_json::json;

const LIMIT: usize = 200 * 1024;

fn contains_internal_string(value: &Value) -> bool {
    match value {
        Value::String(s) => looks_internal(s),
        Value::Array(items) => items.iter().any(contains_internal_string),
        Value::Object(map) => map.values().any(contains_internal_string),
        _ => false,
    }
}

fn contains_oversized_data_uri(value: &Value) -> bool {
    match value {
        Value::String(s) => data_uri_size(s).is_some_and(|bytes| bytes > LIMIT),
        Value::Array(items) => items.iter().any(contains_oversized_data_uri),
        Value::Object(map) => map.values().any(contains_oversized_data_uri),
        _ => false,
    }
}

// =============================================================
// Heuristics
// =============================================================

#[test]
fn loopback_references_are_internal() {
    assert!(looks_internal("http://localhost:3000/api"));
    assert!(looks_internal("see 127.0.0.1 for details"));
    assert!(looks_internal("HTTP://[::1]:8080"));
    assert!(looks_internal("0.0.0.0:5000"));
}

#[test]
fn admin_urls_are_internal() {
    assert!(looks_internal("https://example.com/admin/settings"));
    assert!(looks_internal("/admin"));
    assert!(looks_internal("//admin.example.com/x"));
    assert!(looks_internal("https://example.com/admin-panel?x=1"));
}

#[test]
fn ordinary_strings_pass() {
    assert!(!looks_internal("Contact an admin if you need help"));
    assert!(!looks_internal("https://example.com/administration-guide"));
    assert!(!looks_internal("https://cdn.example.com/logo.png"));
    assert!(!looks_internal("/pricing"));
}

#[test]
fn data_uri_size_estimates_base64() {
    assert_eq!(data_uri_size("data:image/png;base64,AAAA"), Some(3));
    assert_eq!(data_uri_size("data:image/png;base64,AA=="), Some(1));
    assert_eq!(data_uri_size("data:text/plain,hello"), Some(5));
    assert_eq!(data_uri_size("https://x"), None);
    assert_eq!(data_uri_size("dat"), None);
}

// =============================================================
// sanitize
// =============================================================

#[test]
fn oversized_logo_data_uri_is_dropped() {
    let logo = format!("data:image/png;base64,{}", "A".repeat(400_000));
    let out = sanitize(&json!({ "logoDataUrl": logo }), LIMIT);
    assert_eq!(out, json!({ "logoDataUrl": null }));
}

#[test]
fn small_data_uri_is_kept() {
    let logo = format!("data:image/png;base64,{}", "A".repeat(1_000));
    let input = json!({ "branding": { "logoDataUrl": logo } });
    assert_eq!(sanitize(&input, LIMIT), input);
}

#[test]
fn nested_and_array_values_are_scrubbed() {
    let input = json!({
        "support": {
            "url": "http://localhost:8080/help",
            "links": ["https://example.com/faq", "https://example.com/admin"]
        },
        "announcement": { "text": "Welcome", "enabled": true }
    });
    let out = sanitize(&input, LIMIT);
    assert_eq!(out["support"]["url"], Value::Null);
    assert_eq!(out["support"]["links"], json!(["https://example.com/faq", null]));
    assert_eq!(out["announcement"], input["announcement"]);
}

#[test]
fn output_never_contains_rejected_strings() {
    let big = format!("data:image/gif;base64,{}", "B".repeat(300_000));
    let inputs = [
        json!({}),
        json!("http://localhost"),
        json!({ "a": ["/admin", { "b": "127.0.0.1" }, 3, true, null] }),
        json!({ "logo": big, "ok": "fine" }),
        json!([[["//admin.example.com"]]]),
        json!({ "support": { "url": "data:text/html,<a href=http://localhost:8080/admin>x</a>" } }),
    ];
    for input in &inputs {
        let out = sanitize(input, LIMIT);
        assert!(!contains_internal_string(&out), "internal string kept for {input}");
        assert!(!contains_oversized_data_uri(&out), "oversized data URI kept for {input}");
    }
}

#[test]
fn small_data_uri_with_internal_reference_is_dropped() {
    let input = json!({ "support": { "url": "data:text/html,<a href=http://localhost:8080/admin>x</a>" } });
    assert_eq!(sanitize(&input, LIMIT), json!({ "support": { "url": null } }));
    assert!(is_rejected("data:text/plain,see 127.0.0.1", LIMIT));
}
