//! Signed-in landing page.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::state::auth::AuthState;
use crate::state::services::use_services;
use crate::state::settings::SettingsState;
use crate::state::site_settings::SettingsView;
use crate::util::auth::install_unauth_redirect;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let settings = expect_context::<RwSignal<SettingsState>>();
    let services = use_services();

    let login_path = services.with_value(|s| s.config.login_path.clone());
    install_unauth_redirect(auth, login_path, use_navigate());

    let greeting = move || {
        auth.with(|a| a.user().map_or_else(String::new, |u| format!("Welcome, {}", u.display_name())))
    };
    let support = move || settings.with(|s| s.public.support());

    let on_logout = move |_| {
        #[cfg(feature = "hydrate")]
        {
            let services = services.get_value();
            leptos::task::spawn_local(async move {
                crate::net::api::logout(&services.http, &services.auth).await;
            });
        }
    };

    view! {
        <div class="home-page">
            <header class="home-page__header">
                <h1>{greeting}</h1>
                <Show when=move || auth.with(AuthState::is_admin)>
                    <a class="btn" href="/admin/settings">"Site settings"</a>
                </Show>
                <button class="btn" on:click=on_logout>"Sign out"</button>
            </header>
            <Show when=move || !support().email.is_empty()>
                <p class="home-page__support">
                    "Need help? Contact "
                    <a href=move || format!("mailto:{}", support().email)>{move || support().email}</a>
                    {move || {
                        let hours = support().hours;
                        if hours.is_empty() { String::new() } else { format!(" ({hours})") }
                    }}
                </p>
            </Show>
        </div>
    }
}
