//! Durable key-value storage backends.
//!
//! SYSTEM CONTEXT
//! ==============
//! `AuthStore`, `HttpClient` and `SettingsCache` share one storage handle.
//! The browser build uses `localStorage`; native builds and tests use the
//! in-memory backend. Writes are last-writer-wins and no transaction spans
//! more than one key.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Serialize;

use crate::error::StorageError;

/// Minimal string key-value store.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns an error if the backend is unavailable or rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns an error if the backend is unavailable or rejects the removal.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Shared storage handle passed to every store.
pub type SharedStorage = Rc<dyn KeyValueStorage>;

/// Serialize `value` as JSON and write it under `key`.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_json<T: Serialize>(storage: &dyn KeyValueStorage, key: &str, value: &T) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)
        .map_err(|e| StorageError::Serialize { key: key.to_owned(), message: e.to_string() })?;
    storage.set(key, &raw)
}

/// Remove every key in `keys`, logging failures and carrying on.
///
/// Returns whether all removals succeeded.
pub fn remove_all(storage: &dyn KeyValueStorage, keys: &[&str]) -> bool {
    let mut ok = true;
    for key in keys {
        if let Err(e) = storage.remove(key) {
            leptos::logging::warn!("failed to clear persisted entry: {e}");
            ok = false;
        }
    }
    ok
}

/// A change to one key, as delivered by the browser `storage` event.
///
/// `new_value == None` means the key was removed. `key == None` means the
/// whole store was cleared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageChange {
    pub key: Option<String>,
    pub new_value: Option<String>,
}

impl StorageChange {
    pub fn set(key: &str, value: &str) -> Self {
        Self { key: Some(key.to_owned()), new_value: Some(value.to_owned()) }
    }

    pub fn removed(key: &str) -> Self {
        Self { key: Some(key.to_owned()), new_value: None }
    }

    pub fn cleared() -> Self {
        Self { key: None, new_value: None }
    }

    /// Whether this change touches `key` (a full clear touches every key).
    pub fn concerns(&self, key: &str) -> bool {
        self.key.as_deref().is_none_or(|k| k == key)
    }
}

/// In-memory backend used for SSR, native builds and tests.
///
/// Clones share the same map, which lets tests model two tabs over one
/// origin's storage.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// `window.localStorage` backend.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(feature = "hydrate")]
impl BrowserStorage {
    fn handle() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

#[cfg(feature = "hydrate")]
impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::handle()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = Self::handle().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|_| StorageError::Write { key: key.to_owned() })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let storage = Self::handle().ok_or(StorageError::Unavailable)?;
        storage
            .remove_item(key)
            .map_err(|_| StorageError::Remove { key: key.to_owned() })
    }
}

/// The storage backend for the current build.
pub fn default_storage() -> SharedStorage {
    #[cfg(feature = "hydrate")]
    {
        Rc::new(BrowserStorage)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Rc::new(MemoryStorage::new())
    }
}

/// Whether an event's storage area is the durable store the app writes to.
///
/// Events without an area are accepted; events from another area
/// (`sessionStorage`) are not.
pub fn is_durable_area<T: PartialEq>(event_area: Option<&T>, durable: Option<&T>) -> bool {
    match (event_area, durable) {
        (None, _) => true,
        (Some(area), Some(durable)) => area == durable,
        (Some(_), None) => false,
    }
}

/// Keeps the window `storage` listener installed until dropped.
pub struct StorageListener {
    #[cfg(feature = "hydrate")]
    callback: Option<wasm_bindgen::closure::Closure<dyn FnMut(web_sys::StorageEvent)>>,
}

impl StorageListener {
    /// Subscribe `handler` to storage changes made by other tabs.
    ///
    /// The browser only fires this event in tabs other than the writer, so a
    /// store never sees its own writes here.
    pub fn install<F>(handler: F) -> Self
    where
        F: Fn(&StorageChange) + 'static,
    {
        #[cfg(feature = "hydrate")]
        {
            use wasm_bindgen::JsCast;
            use wasm_bindgen::closure::Closure;

            let Some(window) = web_sys::window() else {
                return Self { callback: None };
            };
            let durable = BrowserStorage::handle();
            let callback = Closure::<dyn FnMut(web_sys::StorageEvent)>::wrap(Box::new(move |event: web_sys::StorageEvent| {
                if !is_durable_area(event.storage_area().as_ref(), durable.as_ref()) {
                    return;
                }
                let change = StorageChange { key: event.key(), new_value: event.new_value() };
                handler(&change);
            }));
            if window
                .add_event_listener_with_callback("storage", callback.as_ref().unchecked_ref())
                .is_err()
            {
                leptos::logging::warn!("failed to install storage listener");
                return Self { callback: None };
            }
            Self { callback: Some(callback) }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = handler;
            Self {}
        }
    }
}

impl Drop for StorageListener {
    fn drop(&mut self) {
        #[cfg(feature = "hydrate")]
        {
            use wasm_bindgen::JsCast;

            if let (Some(window), Some(callback)) = (web_sys::window(), self.callback.take()) {
                let _ = window.remove_event_listener_with_callback("storage", callback.as_ref().unchecked_ref());
            }
        }
    }
}
