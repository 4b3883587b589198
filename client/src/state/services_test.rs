use super::*;
use crate::net::http::{ApiRequest, ApiResponse};
use crate::state::settings::CachePhase;
use crate::state::site_settings::SettingsView;
use crate::util::storage::{KeyValueStorage, MemoryStorage};
use serde_json::json;
use std::cell::RefCell;

fn services_over(storage: &MemoryStorage) -> ClientServices {
    let services = ClientServices::build(ClientConfig::default(), Rc::new(storage.clone()));
    services.init();
    services
}

#[test]
fn rejected_session_clears_auth_store() {
    let storage = MemoryStorage::new();
    let services = services_over(&storage);
    let visited = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&visited);
    services.http.set_navigator(move |path| sink.borrow_mut().push(path.to_owned()));
    services.auth.set_user(json!({ "token": "tok", "user": { "email": "a@b.com" } }));
    storage.set("adminAuth", "legacy").unwrap();

    let response = ApiResponse { status: 401, body: String::new() };
    let result = services.http.intercept(&ApiRequest::get("/api/auth/me"), response);

    assert!(result.is_err());
    assert!(!services.auth.is_authenticated());
    assert_eq!(storage.get("auth"), None);
    assert_eq!(storage.get("adminAuth"), None);
    assert_eq!(visited.borrow().as_slice(), ["/login".to_owned()]);
}

#[test]
fn login_sets_header_used_by_http_client() {
    let storage = MemoryStorage::new();
    let services = services_over(&storage);
    services.auth.set_user(json!({ "token": "tok", "user": {} }));

    let prepared = services.http.prepare(ApiRequest::get("/api/settings"));
    assert_eq!(prepared.header("Authorization"), Some("Bearer tok"));
}

#[test]
fn storage_event_reaches_both_stores() {
    let storage = MemoryStorage::new();
    let writer = services_over(&storage);
    let reader = services_over(&storage);

    writer.auth.set_user(json!({ "token": "t2", "user": { "email": "b@c.com" } }));
    writer.settings.apply_remote(&json!({ "maintenance": { "enabled": true } }), now_ms());

    for key in ["auth", "adminSettings"] {
        let raw = storage.get(key).unwrap();
        reader.handle_storage_event(&StorageChange::set(key, &raw));
    }

    assert_eq!(reader.auth.token().as_deref(), Some("t2"));
    assert!(reader.settings.admin_settings().maintenance().enabled);
    assert_eq!(reader.settings.phase(), CachePhase::Stale);
}

#[test]
fn disposed_services_ignore_storage_events() {
    let storage = MemoryStorage::new();
    let services = services_over(&storage);
    services.dispose();

    services.handle_storage_event(&StorageChange::set("auth", r#"{"version":5,"value":{"token":"x","user":{}}}"#));
    assert!(!services.auth.is_authenticated());
}

#[test]
fn blank_persisted_token_sends_no_header() {
    let storage = MemoryStorage::new();
    storage.set("auth", r#"{"token":"","user":{"email":"a@b.com"}}"#).unwrap();
    let services = services_over(&storage);

    assert_eq!(services.auth.token(), None);
    assert!(services.auth.is_authenticated());
    let prepared = services.http.prepare(ApiRequest::get("/api/settings"));
    assert_eq!(prepared.header("Authorization"), None);
}
