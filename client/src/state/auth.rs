//! Auth-session store for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! `AuthStore` owns the `{token, user}` session. It is built once in the app
//! root and handed to pages through Leptos context; `AuthState` is the
//! reactive mirror route guards and components read.
//!
//! Writes persist under the `auth` key as a version-stamped payload and
//! update the shared default `Authorization` header. Other tabs follow via
//! `handle_storage_event`, applying only strictly newer payloads.
//!
//! ERROR HANDLING
//! ==============
//! Missing or malformed persisted data means "logged out". Nothing here
//! panics or returns an error to the UI; write failures are logged.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;

use crate::config::StorageKeys;
use crate::net::http::DefaultHeaders;
use crate::net::types::{Session, User, parse_persisted_session};
use crate::util::listeners::{Listeners, SubscriptionId};
use crate::util::stamped::{self, Stamped};
use crate::util::storage::{SharedStorage, StorageChange, remove_all, write_json};

/// Reactive snapshot consumed by components via `RwSignal<AuthState>`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub session: Session,
    /// True until the store has hydrated from storage.
    pub loading: bool,
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        self.session.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        !self.session.is_empty()
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }
}

struct AuthInner {
    storage: SharedStorage,
    headers: DefaultHeaders,
    keys: StorageKeys,
    state: RefCell<Stamped<Session>>,
    listeners: Listeners<Session>,
    disposed: Cell<bool>,
}

/// Cheaply cloneable handle; clones share state and subscribers.
#[derive(Clone)]
pub struct AuthStore {
    inner: Rc<AuthInner>,
}

impl AuthStore {
    pub fn new(storage: SharedStorage, headers: DefaultHeaders, keys: StorageKeys) -> Self {
        Self {
            inner: Rc::new(AuthInner {
                storage,
                headers,
                keys,
                state: RefCell::new(Stamped::default()),
                listeners: Listeners::default(),
                disposed: Cell::new(false),
            }),
        }
    }

    /// Hydrate from storage and notify subscribers.
    pub fn init(&self) {
        self.inner.disposed.set(false);
        let restored = self.read_persisted();
        if restored.value.is_empty() {
            leptos::logging::log!("no persisted session");
        }
        self.replace(restored);
    }

    /// Stop following other tabs and drop every subscriber.
    pub fn dispose(&self) {
        self.inner.disposed.set(true);
        self.inner.listeners.clear();
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    pub fn session(&self) -> Session {
        self.inner.state.borrow().value.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.state.borrow().value.token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().value.user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        !self.inner.state.borrow().value.is_empty()
    }

    pub fn is_admin(&self) -> bool {
        self.inner.state.borrow().value.user.as_ref().is_some_and(User::is_admin)
    }

    /// Version of the held session; 0 when logged out.
    pub fn version(&self) -> u64 {
        self.inner.state.borrow().version
    }

    /// Store a login/profile payload: either `{token, user}` or a bare user
    /// object (which keeps the current token).
    ///
    /// Returns `false` and leaves state untouched when the payload has
    /// neither shape.
    pub fn set_user(&self, input: Value) -> bool {
        let current_token = self.token();
        let Some(session) = Session::from_input(input, current_token.as_deref()) else {
            leptos::logging::warn!("ignoring session payload with unexpected shape");
            return false;
        };
        self.set_session(session);
        true
    }

    /// Persist `session`, update the default header and notify subscribers.
    pub fn set_session(&self, session: Session) {
        let key = &self.inner.keys.auth;
        let persisted_version = stamped::peek_version(self.inner.storage.get(key).as_deref());
        let current = self.version().max(persisted_version);
        let next = Stamped::next(current, session);
        if let Err(e) = write_json(self.inner.storage.as_ref(), key, &next) {
            leptos::logging::warn!("failed to persist session: {e}");
        }
        self.replace(next);
    }

    /// Clear both persisted auth entries, the header and in-memory state.
    pub fn logout(&self) {
        let keys = &self.inner.keys;
        remove_all(self.inner.storage.as_ref(), &[keys.auth.as_str(), keys.admin_auth.as_str()]);
        self.replace(Stamped::default());
    }

    /// Apply a storage change made by another tab.
    ///
    /// Returns whether in-memory state changed.
    pub fn handle_storage_event(&self, change: &StorageChange) -> bool {
        if self.is_disposed() || !change.concerns(&self.inner.keys.auth) {
            return false;
        }
        let Some(raw) = change.new_value.as_deref() else {
            // Key removed (or storage cleared): another tab logged out.
            if self.is_authenticated() {
                self.replace(Stamped::default());
                return true;
            }
            return false;
        };
        let Some(incoming) = parse_persisted_session(raw) else {
            leptos::logging::warn!("malformed session from another tab, logging out");
            let changed = self.is_authenticated();
            self.replace(Stamped::default());
            return changed;
        };
        let accepted = {
            let current = self.inner.state.borrow();
            // A logged-out tab adopts any session, even a legacy unversioned one.
            (current.value.is_empty() && !incoming.value.is_empty()) || incoming.supersedes(&current)
        };
        if accepted {
            self.replace(incoming);
        }
        accepted
    }

    /// Register `listener`; it runs synchronously after every state change.
    pub fn subscribe<F: Fn(&Session) + 'static>(&self, listener: F) -> SubscriptionId {
        self.inner.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.listeners.unsubscribe(id);
    }

    fn read_persisted(&self) -> Stamped<Session> {
        self.inner
            .storage
            .get(&self.inner.keys.auth)
            .as_deref()
            .and_then(parse_persisted_session)
            .unwrap_or_default()
    }

    fn replace(&self, next: Stamped<Session>) {
        self.inner.headers.set_authorization(next.value.bearer());
        let snapshot = next.value.clone();
        *self.inner.state.borrow_mut() = next;
        self.inner.listeners.notify(&snapshot);
    }
}
