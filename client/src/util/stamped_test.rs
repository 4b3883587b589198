use super::*;
use serde_json::json;

#[test]
fn decode_reads_envelope() {
    let stamped: Stamped<Value> = decode(r#"{"version":4,"value":{"a":1}}"#).unwrap();
    assert_eq!(stamped.version, 4);
    assert_eq!(stamped.value, json!({ "a": 1 }));
}

#[test]
fn decode_treats_bare_payload_as_version_zero() {
    let stamped: Stamped<Value> = decode(r#"{"token":"abc"}"#).unwrap();
    assert_eq!(stamped.version, 0);
    assert_eq!(stamped.value, json!({ "token": "abc" }));
}

#[test]
fn decode_rejects_invalid_json() {
    assert!(decode::<Value>("not-json").is_none());
}

#[test]
fn object_with_extra_keys_is_not_an_envelope() {
    let stamped: Stamped<Value> = decode(r#"{"version":2,"value":1,"other":true}"#).unwrap();
    assert_eq!(stamped.version, 0);
}

#[test]
fn peek_version_defaults_to_zero() {
    assert_eq!(peek_version(None), 0);
    assert_eq!(peek_version(Some("garbage")), 0);
    assert_eq!(peek_version(Some(r#"{"version":9,"value":null}"#)), 9);
}

#[test]
fn higher_version_supersedes() {
    let old = Stamped::new(1, json!("a"));
    let new = Stamped::next(1, json!("a"));
    assert!(new.supersedes(&old));
    assert!(!old.supersedes(&new));
}

#[test]
fn equal_versions_tie_break_on_content() {
    let a = Stamped::new(3, json!("a"));
    let b = Stamped::new(3, json!("b"));
    assert!(b.supersedes(&a));
    assert!(!a.supersedes(&b));
    assert!(!a.supersedes(&a.clone()));
}

#[test]
fn next_saturates() {
    assert_eq!(Stamped::next(u64::MAX, ()).version, u64::MAX);
}
