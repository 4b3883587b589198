//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::{announcement_banner::AnnouncementBanner, maintenance_notice::MaintenanceNotice};
use crate::config::ClientConfig;
use crate::pages::{admin_settings::AdminSettingsPage, home::HomePage, login::LoginPage};
use crate::state::auth::AuthState;
use crate::state::services::{ClientServices, Services};
use crate::state::settings::SettingsState;
use crate::state::site_settings::SettingsView;
use crate::util::storage::default_storage;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Builds the stores, mirrors them into signals, follows other tabs and
/// kicks off the first server refresh.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let services = ClientServices::build(ClientConfig::from_build_env(), default_storage());

    let auth = RwSignal::new(AuthState { loading: true, ..AuthState::default() });
    let settings = RwSignal::new(SettingsState::default());
    services
        .auth
        .subscribe(move |session| auth.set(AuthState { session: session.clone(), loading: false }));
    services.settings.subscribe(move |state| settings.set(state.clone()));
    services.init();

    #[cfg(feature = "hydrate")]
    {
        let follower = services.clone();
        let listener = crate::util::storage::StorageListener::install(move |change| follower.handle_storage_event(change));
        let listener = StoredValue::new_local(Some(listener));

        let http = services.http.clone();
        let auth_store = services.auth.clone();
        let cache = services.settings.clone();
        leptos::task::spawn_local(async move {
            let profile = async {
                if auth_store.is_authenticated() {
                    match crate::net::api::refresh_current_user(&http, &auth_store).await {
                        Err(e) if !e.is_unauthorized() => leptos::logging::warn!("profile refresh failed: {e}"),
                        _ => {}
                    }
                }
            };
            futures::join!(profile, cache.refresh(&http));
        });

        let teardown: Services = StoredValue::new_local(services.clone());
        on_cleanup(move || {
            listener.try_update_value(|l| l.take());
            teardown.try_with_value(ClientServices::dispose);
        });
    }

    let services: Services = StoredValue::new_local(services);
    provide_context(services);
    provide_context(auth);
    provide_context(settings);

    let site_name = move || settings.with(|s| s.public.branding().site_name);

    view! {
        <Stylesheet id="leptos" href="/pkg/examprep.css"/>
        <Title text=site_name/>

        <Router>
            <AnnouncementBanner/>
            <MaintenanceNotice/>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=(StaticSegment("admin"), StaticSegment("settings")) view=AdminSettingsPage/>
                <Route path=StaticSegment("") view=HomePage/>
            </Routes>
        </Router>
    }
}
