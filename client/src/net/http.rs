//! Authenticated REST client with request/response interception.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every backend call goes through `HttpClient::send`, which runs the two
//! interceptors around the transport:
//!
//! - request: add `Authorization` when the caller did not set one, from the
//!   persisted session read at request time (so a client built before
//!   `AuthStore::init` still authenticates), else the shared default header;
//! - response: a 401 or an "authentication required" body ends the session
//!   (storage cleared, header cleared, hook run, hard navigation to login).
//!
//! There is no retry, backoff or circuit breaking.
//!
//! Client-side (hydrate): transport via `gloo-net`.
//! Server-side (SSR) and native tests: transport returns `ApiError::Unavailable`.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::{ErrorBody, parse_persisted_session};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::util::navigation::hard_navigate;
use crate::util::storage::{SharedStorage, remove_all};

const AUTHORIZATION: &str = "Authorization";
const AUTH_REQUIRED_MARKER: &str = "authentication required";

/// Default headers shared between `AuthStore` (writer) and `HttpClient` (reader).
#[derive(Clone, Debug, Default)]
pub struct DefaultHeaders {
    authorization: Rc<RefCell<Option<String>>>,
}

impl DefaultHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authorization(&self) -> Option<String> {
        self.authorization.borrow().clone()
    }

    pub fn set_authorization(&self, value: Option<String>) {
        *self.authorization.borrow_mut() = value;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// An outbound request before transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// Let a 401 through as a plain status error (login form).
    pub allow_unauthorized: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: &str) -> Self {
        Self { method, path: path.to_owned(), headers: Vec::new(), body: None, allow_unauthorized: false }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::Post, path)
    }

    /// # Errors
    ///
    /// Returns `ApiError::Decode` if `body` cannot be serialized.
    pub fn with_json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let raw = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.body = Some(raw);
        Ok(self.with_header("Content-Type", "application/json"))
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn allow_unauthorized(mut self) -> Self {
        self.allow_unauthorized = true;
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A received response with its body already read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// # Errors
    ///
    /// Returns `ApiError::Decode` if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Whether a response means the session is no longer valid.
pub fn is_auth_failure(status: u16, body: &str) -> bool {
    if status == 401 {
        return true;
    }
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return false;
    };
    [parsed.message, parsed.error]
        .iter()
        .flatten()
        .any(|text| text.to_ascii_lowercase().contains(AUTH_REQUIRED_MARKER))
}

type Hook = Rc<dyn Fn()>;
type Navigator = Rc<dyn Fn(&str)>;

struct HttpInner {
    config: ClientConfig,
    storage: SharedStorage,
    headers: DefaultHeaders,
    on_unauthorized: RefCell<Option<Hook>>,
    navigator: RefCell<Navigator>,
}

/// Cheaply cloneable handle; clones share hooks and headers.
#[derive(Clone)]
pub struct HttpClient {
    inner: Rc<HttpInner>,
}

impl HttpClient {
    pub fn new(config: ClientConfig, storage: SharedStorage, headers: DefaultHeaders) -> Self {
        let navigator: Navigator = Rc::new(hard_navigate);
        Self {
            inner: Rc::new(HttpInner {
                config,
                storage,
                headers,
                on_unauthorized: RefCell::new(None),
                navigator: RefCell::new(navigator),
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Run `hook` after a forced logout has cleared storage.
    pub fn on_unauthorized<F: Fn() + 'static>(&self, hook: F) {
        *self.inner.on_unauthorized.borrow_mut() = Some(Rc::new(hook));
    }

    /// Replace the full-page navigation used after a forced logout.
    pub fn set_navigator<F: Fn(&str) + 'static>(&self, navigator: F) {
        *self.inner.navigator.borrow_mut() = Rc::new(navigator);
    }

    /// Request interceptor: fill in `Authorization` when missing.
    pub fn prepare(&self, mut request: ApiRequest) -> ApiRequest {
        if request.header(AUTHORIZATION).is_some() {
            return request;
        }
        if let Some(value) = self.persisted_bearer().or_else(|| self.inner.headers.authorization()) {
            request.headers.push((AUTHORIZATION.to_owned(), value));
        }
        request
    }

    fn persisted_bearer(&self) -> Option<String> {
        let raw = self.inner.storage.get(&self.inner.config.keys.auth)?;
        parse_persisted_session(&raw)?.value.bearer()
    }

    /// Response interceptor.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` after forcing a logout, or
    /// `ApiError::Status` for any other non-success status.
    pub fn intercept(&self, request: &ApiRequest, response: ApiResponse) -> Result<ApiResponse, ApiError> {
        if is_auth_failure(response.status, &response.body) {
            if request.allow_unauthorized {
                return Err(ApiError::Status { status: response.status });
            }
            self.force_logout();
            return Err(ApiError::Unauthorized);
        }
        if !response.ok() {
            return Err(ApiError::Status { status: response.status });
        }
        Ok(response)
    }

    /// Clear every persisted session entry and leave for the login page.
    pub fn force_logout(&self) {
        leptos::logging::warn!("session rejected by server, logging out");
        let keys = &self.inner.config.keys;
        remove_all(self.inner.storage.as_ref(), &[keys.auth.as_str(), keys.admin_auth.as_str()]);
        self.inner.headers.set_authorization(None);

        let hook = self.inner.on_unauthorized.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
        let navigator = Rc::clone(&self.inner.navigator.borrow());
        navigator(&self.inner.config.login_path);
    }

    /// Send `request` through both interceptors.
    ///
    /// # Errors
    ///
    /// See `intercept`; transport failures map to `ApiError::Network`.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let request = self.prepare(request);
        let response = self.transport(&request).await?;
        self.intercept(&request, response)
    }

    /// `GET path` and decode the body.
    ///
    /// # Errors
    ///
    /// See `send`; schema mismatches return `ApiError::Decode`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(ApiRequest::get(path)).await?.json()
    }

    /// Send `body` as JSON with `method` and decode the reply.
    ///
    /// # Errors
    ///
    /// See `send`; schema mismatches return `ApiError::Decode`.
    pub async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = ApiRequest::new(method, path).with_json(body)?;
        self.send(request).await?.json()
    }

    /// `POST path` with no body, ignoring the reply body.
    ///
    /// # Errors
    ///
    /// See `send`.
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        self.send(ApiRequest::post(path)).await.map(|_| ())
    }

    async fn transport(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            use gloo_net::http::Request;

            let url = self.inner.config.url(&request.path);
            let mut builder = match request.method {
                Method::Get => Request::get(&url),
                Method::Post => Request::post(&url),
                Method::Put => Request::put(&url),
                Method::Delete => Request::delete(&url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            let sent = match &request.body {
                Some(body) => builder
                    .body(body.clone())
                    .map_err(|e| ApiError::Network(e.to_string()))?
                    .send()
                    .await,
                None => builder.send().await,
            };
            let resp = sent.map_err(|e| ApiError::Network(e.to_string()))?;
            let status = resp.status();
            let body = resp.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
            Ok(ApiResponse { status, body })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
            Err(ApiError::Unavailable)
        }
    }
}
