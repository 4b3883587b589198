//! Site-wide announcement strip driven by public settings.

use leptos::prelude::*;

use crate::state::settings::SettingsState;
use crate::state::site_settings::SettingsView;

/// Renders the announcement when enabled. Dismissal lasts until the text
/// changes.
#[component]
pub fn AnnouncementBanner() -> impl IntoView {
    let settings = expect_context::<RwSignal<SettingsState>>();
    let dismissed = RwSignal::new(None::<String>);

    let announcement = move || settings.with(|s| s.public.announcement());
    let visible = move || {
        let current = announcement();
        current.is_visible() && dismissed.with(|d| d.as_deref() != Some(current.text.as_str()))
    };
    let class = move || format!("announcement announcement--{}", announcement().tone.css_modifier());

    view! {
        <Show when=visible>
            <div class=class role="status">
                <span class="announcement__text">{move || announcement().text}</span>
                {move || {
                    announcement()
                        .link
                        .filter(|href| !href.trim().is_empty())
                        .map(|href| view! { <a class="announcement__link" href=href>"Learn more"</a> })
                }}
                <button
                    class="announcement__dismiss"
                    title="Dismiss"
                    on:click=move |_| dismissed.set(Some(announcement().text))
                >
                    "×"
                </button>
            </div>
        </Show>
    }
}
