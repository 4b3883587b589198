//! Client state modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Stores own persisted data and notify subscribers; `App` mirrors them into
//! Leptos signals for rendering.

pub mod auth;
pub mod services;
pub mod settings;
pub mod site_settings;
