//! Admin editor for the site-settings document.
//!
//! SYSTEM CONTEXT
//! ==============
//! Admins edit the merged settings as JSON. Saving sends the whole document
//! and applies the server echo. Resetting restores the defaults locally,
//! asks the server to reset, and refetches once the grace window closes.

#[cfg(test)]
#[path = "admin_settings_test.rs"]
mod admin_settings_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use serde_json::Value;

use crate::state::auth::AuthState;
use crate::state::services::use_services;
use crate::state::settings::{CachePhase, SettingsState};
use crate::util::auth::{install_admin_redirect, install_unauth_redirect};

/// Parse the editor text into a settings document.
fn parse_editor(text: &str) -> Result<Value, String> {
    let value: Value = serde_json::from_str(text).map_err(|e| format!("Invalid JSON: {e}"))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err("Settings must be a JSON object.".to_owned())
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

fn phase_label(phase: CachePhase) -> &'static str {
    match phase {
        CachePhase::Loading => "Loading",
        CachePhase::HydratedFromCache => "Cached copy",
        CachePhase::HydratedFromServer => "Up to date",
        CachePhase::Stale => "Updated in another tab",
    }
}

#[component]
pub fn AdminSettingsPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let settings = expect_context::<RwSignal<SettingsState>>();
    let services = use_services();
    let navigate = use_navigate();

    let login_path = services.with_value(|s| s.config.login_path.clone());
    install_unauth_redirect(auth, login_path, navigate.clone());
    install_admin_redirect(auth, navigate);

    let draft = RwSignal::new(settings.with_untracked(|s| pretty(&s.admin)));
    let dirty = RwSignal::new(false);
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    // Follow the cache until the admin starts typing.
    Effect::new(move || {
        let text = settings.with(|s| pretty(&s.admin));
        if !dirty.get_untracked() {
            draft.set(text);
        }
    });

    let on_save = move |_| {
        if busy.get() {
            return;
        }
        let document = match parse_editor(&draft.get()) {
            Ok(document) => document,
            Err(msg) => {
                info.set(msg);
                return;
            }
        };
        busy.set(true);
        info.set("Saving...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let services = services.get_value();
            leptos::task::spawn_local(async move {
                match services.settings.save(&services.http, &document).await {
                    Ok(_) => {
                        dirty.set(false);
                        draft.set(pretty(&services.settings.admin_settings()));
                        info.set("Saved.".to_owned());
                    }
                    Err(e) => info.set(format!("Save failed: {e}")),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = document;
        }
    };

    let on_reset = move |_| {
        if busy.get() {
            return;
        }
        busy.set(true);
        dirty.set(false);
        info.set("Resetting to defaults...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let services = services.get_value();
            leptos::task::spawn_local(async move {
                let now = crate::util::clock::now_ms();
                let until = match services.settings.reset(&services.http, now).await {
                    Ok(until) => {
                        info.set("Defaults restored.".to_owned());
                        until
                    }
                    Err(e) => {
                        info.set(format!("Restored locally; server reset failed: {e}"));
                        services.settings.grace_until().unwrap_or_default()
                    }
                };
                busy.set(false);

                let wait = until.saturating_sub(crate::util::clock::now_ms());
                gloo_timers::future::sleep(std::time::Duration::from_millis(wait)).await;
                if !services.settings.is_disposed() {
                    services.settings.refresh(&services.http).await;
                }
            });
        }
    };

    let on_input = move |ev: leptos::ev::Event| {
        dirty.set(true);
        draft.set(event_target_value(&ev));
    };

    view! {
        <div class="admin-settings">
            <header class="admin-settings__header">
                <h1>"Site settings"</h1>
                <span class="admin-settings__phase">{move || phase_label(settings.with(|s| s.phase))}</span>
            </header>
            <textarea
                class="admin-settings__editor"
                spellcheck="false"
                prop:value=move || draft.get()
                on:input=on_input
            ></textarea>
            <div class="admin-settings__actions">
                <button class="btn btn--primary" on:click=on_save disabled=move || busy.get()>"Save"</button>
                <button class="btn btn--danger" on:click=on_reset disabled=move || busy.get()>"Reset to defaults"</button>
                <a class="btn" href="/">"Back"</a>
            </div>
            <Show when=move || !info.get().is_empty()>
                <p class="admin-settings__message">{move || info.get()}</p>
            </Show>
        </div>
    }
}
