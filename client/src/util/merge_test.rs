use super::*;
use serde_json::json;

fn defaults() -> Value {
    json!({
        "announcement": { "enabled": false, "text": "", "tone": "info" },
        "support": { "email": "help@example.com", "links": ["faq", "contact"] },
        "maintenance": false
    })
}

#[test]
fn merge_with_empty_object_is_identity() {
    assert_eq!(deep_merge(&defaults(), &json!({})), defaults());
}

#[test]
fn merge_is_idempotent() {
    let overlay = json!({
        "announcement": { "enabled": true },
        "support": { "links": ["discord"] },
        "extra": { "a": [1, 2] }
    });
    let once = deep_merge(&defaults(), &overlay);
    let twice = deep_merge(&once, &overlay);
    assert_eq!(once, twice);
}

#[test]
fn nested_objects_merge_key_by_key() {
    let merged = deep_merge(&defaults(), &json!({ "announcement": { "enabled": true } }));
    assert_eq!(merged["announcement"], json!({ "enabled": true, "text": "", "tone": "info" }));
}

#[test]
fn arrays_replace_instead_of_concatenating() {
    let merged = deep_merge(&defaults(), &json!({ "support": { "links": ["discord"] } }));
    assert_eq!(merged["support"]["links"], json!(["discord"]));
}

#[test]
fn primitive_overrides_object_and_vice_versa() {
    let merged = deep_merge(&defaults(), &json!({ "announcement": "off", "maintenance": { "on": true } }));
    assert_eq!(merged["announcement"], json!("off"));
    assert_eq!(merged["maintenance"], json!({ "on": true }));
}

#[test]
fn null_overrides_default() {
    let merged = deep_merge(&defaults(), &json!({ "support": { "email": null } }));
    assert_eq!(merged["support"]["email"], Value::Null);
}

#[test]
fn non_object_overlay_replaces_root() {
    assert_eq!(deep_merge(&defaults(), &json!([1])), json!([1]));
}
