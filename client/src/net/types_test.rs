use super::*;
use serde_json::json;

// =============================================================
// User
// =============================================================

#[test]
fn user_keeps_unknown_fields() {
    let user: User = serde_json::from_value(json!({
        "email": "a@b.com",
        "plan": "pro",
        "credits": 12
    }))
    .unwrap();
    assert_eq!(user.email.as_deref(), Some("a@b.com"));
    assert_eq!(user.extra.get("plan"), Some(&json!("pro")));
    let back = serde_json::to_value(&user).unwrap();
    assert_eq!(back, json!({ "email": "a@b.com", "plan": "pro", "credits": 12 }));
}

#[test]
fn user_numeric_id_becomes_string() {
    let user: User = serde_json::from_value(json!({ "id": 42 })).unwrap();
    assert_eq!(user.id.as_deref(), Some("42"));
}

#[test]
fn user_rejects_object_id() {
    assert!(serde_json::from_value::<User>(json!({ "id": { "x": 1 } })).is_err());
}

#[test]
fn user_admin_from_flag_or_role() {
    let flagged: User = serde_json::from_value(json!({ "is_admin": true })).unwrap();
    assert!(flagged.is_admin());
    let role: User = serde_json::from_value(json!({ "role": "Admin" })).unwrap();
    assert!(role.is_admin());
    let student: User = serde_json::from_value(json!({ "role": "student" })).unwrap();
    assert!(!student.is_admin());
}

#[test]
fn display_name_falls_back_to_email() {
    let user = User { email: Some("a@b.com".to_owned()), name: Some("  ".to_owned()), ..User::default() };
    assert_eq!(user.display_name(), "a@b.com");
    assert_eq!(User::default().display_name(), "Account");
}

// =============================================================
// Session::from_input
// =============================================================

#[test]
fn from_input_reads_full_session() {
    let session = Session::from_input(json!({ "token": "abc", "user": { "email": "a@b.com" } }), None).unwrap();
    assert_eq!(session.token.as_deref(), Some("abc"));
    assert_eq!(session.user.unwrap().email.as_deref(), Some("a@b.com"));
}

#[test]
fn from_input_bare_user_keeps_current_token() {
    let session = Session::from_input(json!({ "email": "new@b.com" }), Some("tok")).unwrap();
    assert_eq!(session.token.as_deref(), Some("tok"));
    assert_eq!(session.user.unwrap().email.as_deref(), Some("new@b.com"));
}

#[test]
fn from_input_allows_user_without_token() {
    let session = Session::from_input(json!({ "token": null, "user": { "name": "C" } }), Some("old")).unwrap();
    assert_eq!(session.token, None);
    assert!(session.user.is_some());
}

#[test]
fn from_input_null_is_empty_session() {
    assert!(Session::from_input(Value::Null, Some("tok")).unwrap().is_empty());
}

#[test]
fn from_input_rejects_non_objects() {
    assert!(Session::from_input(json!("abc"), None).is_none());
    assert!(Session::from_input(json!([1, 2]), None).is_none());
    assert!(Session::from_input(json!({ "token": "t", "user": "bob" }), None).is_none());
}

#[test]
fn empty_token_is_dropped() {
    let session = Session::new(Some(" ".to_owned()), None);
    assert_eq!(session.token, None);
    assert_eq!(session.bearer(), None);
}

#[test]
fn bearer_formats_header() {
    let session = Session::new(Some("abc".to_owned()), None);
    assert_eq!(session.bearer().as_deref(), Some("Bearer abc"));
}

// =============================================================
// Persisted sessions
// =============================================================

#[test]
fn persisted_session_reads_envelope_and_legacy() {
    let stamped = parse_persisted_session(r#"{"version":4,"value":{"token":"abc","user":null}}"#).unwrap();
    assert_eq!(stamped.version, 4);
    assert_eq!(stamped.value.token.as_deref(), Some("abc"));

    let legacy = parse_persisted_session(r#"{"token":"abc","user":{"email":"a@b.com"}}"#).unwrap();
    assert_eq!(legacy.version, 0);
    assert_eq!(legacy.value.user.and_then(|u| u.email).as_deref(), Some("a@b.com"));
}

#[test]
fn persisted_session_drops_blank_token() {
    let stamped = parse_persisted_session(r#"{"token":"  ","user":{"email":"a@b.com"}}"#).unwrap();
    assert_eq!(stamped.value.token, None);
    assert_eq!(stamped.value.bearer(), None);
}

#[test]
fn persisted_session_rejects_garbage() {
    assert!(parse_persisted_session("not-json").is_none());
    assert!(parse_persisted_session("[1,2]").is_none());
}
