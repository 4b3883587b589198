//! Shared auth route guards.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical unauthenticated redirect behavior.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::auth::AuthState;

/// Whether a guarded route should send the visitor to login.
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    !state.loading && !state.is_authenticated()
}

/// Whether an admin-only route should turn the visitor away.
pub fn should_redirect_non_admin(state: &AuthState) -> bool {
    !state.loading && !state.is_admin()
}

/// Redirect to `login_path` whenever auth has loaded and no session is present.
pub fn install_unauth_redirect<F>(auth: RwSignal<AuthState>, login_path: String, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_redirect_unauth(&auth.get()) {
            navigate(&login_path, NavigateOptions::default());
        }
    });
}

/// Redirect to `/` whenever auth has loaded and the user is not an admin.
pub fn install_admin_redirect<F>(auth: RwSignal<AuthState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_redirect_non_admin(&auth.get()) {
            navigate("/", NavigateOptions::default());
        }
    });
}
