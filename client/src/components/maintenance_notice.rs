//! Full-width maintenance notice for non-admin visitors.

use leptos::prelude::*;

use crate::state::auth::AuthState;
use crate::state::settings::SettingsState;
use crate::state::site_settings::SettingsView;

#[component]
pub fn MaintenanceNotice() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let settings = expect_context::<RwSignal<SettingsState>>();

    let maintenance = move || settings.with(|s| s.public.maintenance());
    // Admins keep working through maintenance.
    let visible = move || maintenance().enabled && !auth.with(AuthState::is_admin);

    view! {
        <Show when=visible>
            <div class="maintenance-notice" role="alert">
                <strong>"Maintenance"</strong>
                <p>{move || maintenance().message}</p>
            </div>
        </Show>
    }
}
