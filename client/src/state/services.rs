//! Long-lived client services shared by every route.
//!
//! SYSTEM CONTEXT
//! ==============
//! The stores and the HTTP client hold `Rc` handles, so they cannot live in
//! Leptos context directly. `App` builds one `ClientServices`, stores it in a
//! local `StoredValue` and provides that handle; components read the
//! reactive mirrors (`RwSignal<AuthState>`, `RwSignal<SettingsState>`) for
//! rendering and reach for the services only to act.

#[cfg(test)]
#[path = "services_test.rs"]
mod services_test;

use std::rc::Rc;

use leptos::prelude::*;

use super::auth::AuthStore;
use super::settings::SettingsCache;
use crate::config::ClientConfig;
use crate::net::http::{DefaultHeaders, HttpClient};
use crate::util::clock::now_ms;
use crate::util::storage::{SharedStorage, StorageChange};

/// Context handle for the services; `Copy` and thread-safe as a handle only.
pub type Services = StoredValue<ClientServices, LocalStorage>;

#[derive(Clone)]
pub struct ClientServices {
    pub config: ClientConfig,
    pub http: HttpClient,
    pub auth: AuthStore,
    pub settings: SettingsCache,
}

impl ClientServices {
    /// Wire the stores to one storage backend and one default header set.
    ///
    /// A forced logout in the HTTP layer also clears the in-memory session.
    pub fn build(config: ClientConfig, storage: SharedStorage) -> Self {
        let headers = DefaultHeaders::new();
        let auth = AuthStore::new(Rc::clone(&storage), headers.clone(), config.keys.clone());
        let http = HttpClient::new(config.clone(), Rc::clone(&storage), headers);
        let settings = SettingsCache::new(config.clone(), storage);

        let on_rejected = auth.clone();
        http.on_unauthorized(move || on_rejected.logout());

        Self { config, http, auth, settings }
    }

    /// Hydrate both stores from storage.
    pub fn init(&self) {
        self.auth.init();
        self.settings.init();
    }

    pub fn dispose(&self) {
        self.auth.dispose();
        self.settings.dispose();
    }

    /// Fan a cross-tab storage change out to both stores.
    pub fn handle_storage_event(&self, change: &StorageChange) {
        if self.auth.handle_storage_event(change) {
            leptos::logging::log!("session updated by another tab");
        }
        self.settings.handle_storage_event(change, now_ms());
    }
}

/// Read the services provided by `App`.
///
/// # Panics
///
/// Panics when called outside the `App` tree.
pub fn use_services() -> Services {
    expect_context::<Services>()
}
