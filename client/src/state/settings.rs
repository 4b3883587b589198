//! Site-settings cache with cross-tab sync and a post-reset grace window.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SettingsCache` is built once in the app root. It renders the last known
//! copy from storage immediately, then replaces it with the server copy when
//! that differs. Every incoming document is sanitized and merged over the
//! defaults before it is stored. The merged admin copy and its public
//! whitelist projection are persisted under separate keys with the same
//! version stamp.
//!
//! Phases: `Loading -> HydratedFromCache | HydratedFromServer -> Stale`,
//! where `Stale` means another tab's write was adopted without a fetch.
//!
//! TRADE-OFFS
//! ==========
//! A local reset writes `ADMIN_SETTINGS_FORCE_LOCAL_UNTIL`. Until that time
//! both remote paths (fetch and storage events) are ignored so a lagging
//! server echo cannot undo the reset. Admin saves are applied regardless.
//!
//! ERROR HANDLING
//! ==============
//! Fetch failures keep the last good copy and are only logged.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;

use super::site_settings::{default_settings, project_public};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::net::http::{HttpClient, Method};
use crate::util::clock::now_ms;
use crate::util::listeners::{Listeners, SubscriptionId};
use crate::util::merge::deep_merge;
use crate::util::sanitize::sanitize;
use crate::util::stamped::{self, Stamped};
use crate::util::storage::{SharedStorage, StorageChange, write_json};

pub const SETTINGS_ENDPOINT: &str = "/api/settings";
pub const ADMIN_SETTINGS_ENDPOINT: &str = "/api/admin/settings";
pub const ADMIN_SETTINGS_RESET_ENDPOINT: &str = "/api/admin/settings/reset";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CachePhase {
    #[default]
    Loading,
    HydratedFromCache,
    HydratedFromServer,
    Stale,
}

/// What happened to an incoming settings document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// State replaced and subscribers notified.
    Applied,
    /// Identical to the current copy.
    Unchanged,
    /// Dropped because the grace window is active.
    Deferred,
    /// Not an object, or older than the current copy.
    Rejected,
    /// Cache disposed, unrelated key, or fetch failed.
    Ignored,
}

/// Reactive snapshot consumed by components via `RwSignal<SettingsState>`.
#[derive(Clone, Debug, PartialEq)]
pub struct SettingsState {
    pub phase: CachePhase,
    pub admin: Value,
    pub public: Value,
    pub version: u64,
}

impl Default for SettingsState {
    fn default() -> Self {
        let admin = default_settings();
        let public = project_public(&admin);
        Self { phase: CachePhase::Loading, admin, public, version: 0 }
    }
}

struct SettingsInner {
    config: ClientConfig,
    storage: SharedStorage,
    state: RefCell<Stamped<Value>>,
    last_applied: RefCell<String>,
    phase: Cell<CachePhase>,
    listeners: Listeners<SettingsState>,
    disposed: Cell<bool>,
}

/// Cheaply cloneable handle; clones share state and subscribers.
#[derive(Clone)]
pub struct SettingsCache {
    inner: Rc<SettingsInner>,
}

impl SettingsCache {
    pub fn new(config: ClientConfig, storage: SharedStorage) -> Self {
        let defaults = default_settings();
        let last_applied = serialize(&defaults);
        Self {
            inner: Rc::new(SettingsInner {
                config,
                storage,
                state: RefCell::new(Stamped::new(0, defaults)),
                last_applied: RefCell::new(last_applied),
                phase: Cell::new(CachePhase::Loading),
                listeners: Listeners::default(),
                disposed: Cell::new(false),
            }),
        }
    }

    /// Apply the cached copy, if any, without touching the network.
    pub fn init(&self) {
        self.inner.disposed.set(false);
        let keys = &self.inner.config.keys;
        let cached = [&keys.admin_settings, &keys.public_settings]
            .into_iter()
            .find_map(|key| {
                self.inner
                    .storage
                    .get(key)
                    .as_deref()
                    .and_then(stamped::decode::<Value>)
                    .filter(|cached| cached.value.is_object())
            });
        let Some(cached) = cached else {
            leptos::logging::log!("no cached site settings, using defaults");
            return;
        };
        let merged = self.prepare(&cached.value);
        self.install(Stamped::new(cached.version, merged), CachePhase::HydratedFromCache);
    }

    /// Ignore every later event, fetch result and subscriber.
    pub fn dispose(&self) {
        self.inner.disposed.set(true);
        self.inner.listeners.clear();
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    pub fn phase(&self) -> CachePhase {
        self.inner.phase.get()
    }

    pub fn version(&self) -> u64 {
        self.inner.state.borrow().version
    }

    /// Full merged document.
    pub fn admin_settings(&self) -> Value {
        self.inner.state.borrow().value.clone()
    }

    /// Whitelisted projection safe for signed-out visitors.
    pub fn public_settings(&self) -> Value {
        project_public(&self.inner.state.borrow().value)
    }

    pub fn snapshot(&self) -> SettingsState {
        let state = self.inner.state.borrow();
        SettingsState {
            phase: self.inner.phase.get(),
            admin: state.value.clone(),
            public: project_public(&state.value),
            version: state.version,
        }
    }

    pub fn subscribe<F: Fn(&SettingsState) + 'static>(&self, listener: F) -> SubscriptionId {
        self.inner.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.listeners.unsubscribe(id);
    }

    /// End of the grace window in epoch ms, if one was ever set.
    pub fn grace_until(&self) -> Option<u64> {
        self.inner
            .storage
            .get(&self.inner.config.keys.force_local_until)
            .and_then(|raw| raw.trim().parse::<u64>().ok())
    }

    pub fn grace_active(&self, now: u64) -> bool {
        self.grace_until().is_some_and(|until| now < until)
    }

    /// Apply a server document (fetch path).
    pub fn apply_remote(&self, incoming: &Value, now: u64) -> ApplyOutcome {
        if self.is_disposed() {
            return ApplyOutcome::Ignored;
        }
        if self.grace_active(now) {
            leptos::logging::log!("settings update deferred by local reset");
            return ApplyOutcome::Deferred;
        }
        self.apply_authoritative(incoming, CachePhase::HydratedFromServer)
    }

    /// Apply a document the local admin just saved, ignoring the grace window.
    pub fn apply_saved(&self, saved: &Value) -> ApplyOutcome {
        if self.is_disposed() {
            return ApplyOutcome::Ignored;
        }
        self.apply_authoritative(saved, CachePhase::HydratedFromServer)
    }

    fn apply_authoritative(&self, incoming: &Value, phase: CachePhase) -> ApplyOutcome {
        if !incoming.is_object() {
            leptos::logging::warn!("ignoring non-object settings payload");
            return ApplyOutcome::Rejected;
        }
        let merged = self.prepare(incoming);
        if serialize(&merged) == *self.inner.last_applied.borrow() {
            if self.inner.phase.get() != phase {
                self.inner.phase.set(phase);
                self.inner.listeners.notify(&self.snapshot());
            }
            return ApplyOutcome::Unchanged;
        }
        self.commit(merged, phase);
        ApplyOutcome::Applied
    }

    /// Apply another tab's write to the admin copy.
    pub fn handle_storage_event(&self, change: &StorageChange, now: u64) -> ApplyOutcome {
        let key = &self.inner.config.keys.admin_settings;
        if self.is_disposed() || !change.concerns(key) {
            return ApplyOutcome::Ignored;
        }
        if self.grace_active(now) {
            return ApplyOutcome::Deferred;
        }
        let Some(raw) = change.new_value.as_deref() else {
            // Removal keeps the last good copy.
            return ApplyOutcome::Ignored;
        };
        let Some(incoming) = stamped::decode::<Value>(raw).filter(|s| s.value.is_object()) else {
            return ApplyOutcome::Rejected;
        };
        let candidate = Stamped::new(incoming.version, self.prepare(&incoming.value));
        let newer = self.phase() == CachePhase::Loading || candidate.supersedes(&self.inner.state.borrow());
        if !newer {
            return ApplyOutcome::Rejected;
        }
        self.install(candidate, CachePhase::Stale);
        ApplyOutcome::Applied
    }

    /// Restore defaults locally and open the grace window.
    ///
    /// Returns the end of the window in epoch ms.
    pub fn reset_local(&self, now: u64) -> u64 {
        let until = now.saturating_add(self.inner.config.settings_grace_ms);
        let key = &self.inner.config.keys.force_local_until;
        if let Err(e) = self.inner.storage.set(key, &until.to_string()) {
            leptos::logging::warn!("failed to persist settings grace window: {e}");
        }
        self.commit(default_settings(), CachePhase::HydratedFromCache);
        until
    }

    /// Fetch the server copy and apply it. Failures keep the current copy.
    pub async fn refresh(&self, http: &HttpClient) -> ApplyOutcome {
        let fetched = http.get_json::<Value>(SETTINGS_ENDPOINT).await;
        if self.is_disposed() {
            return ApplyOutcome::Ignored;
        }
        match fetched {
            Ok(value) => self.apply_remote(&value, now_ms()),
            Err(e) => {
                leptos::logging::warn!("settings fetch failed, keeping cached copy: {e}");
                ApplyOutcome::Ignored
            }
        }
    }

    /// Save the full document as admin and apply the server's echo.
    ///
    /// # Errors
    ///
    /// Returns the API error when the save request fails.
    pub async fn save(&self, http: &HttpClient, settings: &Value) -> Result<ApplyOutcome, ApiError> {
        let echoed: Value = http.send_json(Method::Put, ADMIN_SETTINGS_ENDPOINT, settings).await?;
        let saved = if echoed.is_object() { &echoed } else { settings };
        Ok(self.apply_saved(saved))
    }

    /// Reset locally at `now`, then ask the server to reset.
    ///
    /// # Errors
    ///
    /// Returns the API error when the reset request fails; the local reset
    /// and grace window stay in place.
    pub async fn reset(&self, http: &HttpClient, now: u64) -> Result<u64, ApiError> {
        let until = self.reset_local(now);
        http.post_empty(ADMIN_SETTINGS_RESET_ENDPOINT).await?;
        Ok(until)
    }

    fn prepare(&self, incoming: &Value) -> Value {
        let clean = sanitize(incoming, self.inner.config.max_data_uri_bytes);
        deep_merge(&default_settings(), &clean)
    }

    fn commit(&self, merged: Value, phase: CachePhase) {
        let keys = &self.inner.config.keys;
        let persisted_version = stamped::peek_version(self.inner.storage.get(&keys.admin_settings).as_deref());
        let next = Stamped::next(self.version().max(persisted_version), merged);
        let public = Stamped::new(next.version, project_public(&next.value));
        let storage = self.inner.storage.as_ref();
        if let Err(e) = write_json(storage, &keys.admin_settings, &next) {
            leptos::logging::warn!("failed to persist admin settings: {e}");
        }
        if let Err(e) = write_json(storage, &keys.public_settings, &public) {
            leptos::logging::warn!("failed to persist public settings: {e}");
        }
        self.install(next, phase);
    }

    fn install(&self, next: Stamped<Value>, phase: CachePhase) {
        *self.inner.last_applied.borrow_mut() = serialize(&next.value);
        *self.inner.state.borrow_mut() = next;
        self.inner.phase.set(phase);
        self.inner.listeners.notify(&self.snapshot());
    }
}

fn serialize(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}
