//! # examprep-client
//!
//! Leptos + WASM frontend shell for the exam-prep site.
//!
//! This crate owns the browser-side session (`state::auth`), the REST client
//! that injects bearer tokens and logs out on rejected sessions (`net::http`),
//! and the cached site settings with cross-tab sync (`state::settings`).
//! Pages and components render from those stores through Leptos signals.

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install logging and hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        leptos::logging::warn!("console logger already installed");
    }
    leptos::mount::hydrate_body(app::App);
}
