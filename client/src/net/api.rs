//! REST API helpers for the auth endpoints.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Result` outputs instead of panics so login/profile failures
//! degrade UI behavior without crashing hydration. A rejected session during
//! any of these calls has already been logged out by `HttpClient`.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde_json::Value;

use super::http::{ApiRequest, HttpClient};
use super::types::{LoginRequest, User};
use crate::error::ApiError;
use crate::state::auth::AuthStore;

pub const LOGIN_ENDPOINT: &str = "/api/auth/login";
pub const CURRENT_USER_ENDPOINT: &str = "/api/auth/me";
pub const LOGOUT_ENDPOINT: &str = "/api/auth/logout";

fn login_failed_message(err: &ApiError) -> String {
    match err {
        ApiError::Status { status: 400 | 401 | 403 } => "Invalid email or password.".to_owned(),
        ApiError::Status { status: 429 } => "Too many attempts. Try again shortly.".to_owned(),
        other => format!("Sign-in failed: {other}"),
    }
}

/// Validate login form fields, returning trimmed values.
///
/// # Errors
///
/// Returns a user-facing message when a field is missing.
pub fn validate_login_input(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter your email and password.");
    }
    if !email.contains('@') {
        return Err("Enter a valid email address.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

/// Sign in via `POST /api/auth/login` and store the returned session.
///
/// # Errors
///
/// Returns a user-facing message when the request fails or the response is
/// not a session payload.
pub async fn login(http: &HttpClient, auth: &AuthStore, email: &str, password: &str) -> Result<(), String> {
    let body = LoginRequest { email: email.to_owned(), password: password.to_owned() };
    let request = ApiRequest::post(LOGIN_ENDPOINT)
        .with_json(&body)
        .map_err(|e| login_failed_message(&e))?
        .allow_unauthorized();
    let response = http.send(request).await.map_err(|e| login_failed_message(&e))?;
    let payload: Value = response.json().map_err(|e| login_failed_message(&e))?;
    if auth.set_user(payload) {
        Ok(())
    } else {
        Err("Sign-in failed: unexpected response.".to_owned())
    }
}

/// Refresh the signed-in profile from `GET /api/auth/me`.
///
/// Keeps the current token and replaces the user record.
///
/// # Errors
///
/// Returns the API error; an expired session has already been cleared.
pub async fn refresh_current_user(http: &HttpClient, auth: &AuthStore) -> Result<User, ApiError> {
    let user: User = http.get_json(CURRENT_USER_ENDPOINT).await?;
    let mut session = auth.session();
    session.user = Some(user.clone());
    auth.set_session(session);
    Ok(user)
}

/// End the session server-side (best effort) and locally.
pub async fn logout(http: &HttpClient, auth: &AuthStore) {
    if let Err(e) = http.post_empty(LOGOUT_ENDPOINT).await {
        leptos::logging::warn!("server logout failed: {e}");
    }
    auth.logout();
}
