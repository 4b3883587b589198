//! Client configuration resolved from build-time environment.
//!
//! The WASM bundle has no process environment at runtime, so values are
//! captured with `option_env!` when the crate is compiled and parsed by the
//! same pure helper the tests drive.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_SETTINGS_GRACE_MS: u64 = 30_000;
pub const DEFAULT_MAX_DATA_URI_BYTES: usize = 200 * 1024;

/// Durable storage key names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub auth: String,
    pub admin_auth: String,
    pub admin_settings: String,
    pub public_settings: String,
    pub force_local_until: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            auth: "auth".to_owned(),
            admin_auth: "adminAuth".to_owned(),
            admin_settings: "adminSettings".to_owned(),
            public_settings: "publicSiteSettings".to_owned(),
            force_local_until: "ADMIN_SETTINGS_FORCE_LOCAL_UNTIL".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix for every REST path, without a trailing slash. Empty means same origin.
    pub api_base: String,
    /// Where a forced logout sends the browser.
    pub login_path: String,
    /// How long remote settings are ignored after a local reset.
    pub settings_grace_ms: u64,
    /// Embedded `data:` URIs above this estimated size are dropped.
    pub max_data_uri_bytes: usize,
    pub keys: StorageKeys,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            settings_grace_ms: DEFAULT_SETTINGS_GRACE_MS,
            max_data_uri_bytes: DEFAULT_MAX_DATA_URI_BYTES,
            keys: StorageKeys::default(),
        }
    }
}

impl ClientConfig {
    /// Build config from the variables captured at compile time.
    ///
    /// Optional:
    /// - `EXAMPREP_API_BASE`: default same origin
    /// - `EXAMPREP_LOGIN_PATH`: default `/login`
    /// - `EXAMPREP_SETTINGS_GRACE_MS`: default 30000
    /// - `EXAMPREP_MAX_DATA_URI_BYTES`: default 204800
    pub fn from_build_env() -> Self {
        Self::from_lookup(|key| match key {
            "EXAMPREP_API_BASE" => option_env!("EXAMPREP_API_BASE"),
            "EXAMPREP_LOGIN_PATH" => option_env!("EXAMPREP_LOGIN_PATH"),
            "EXAMPREP_SETTINGS_GRACE_MS" => option_env!("EXAMPREP_SETTINGS_GRACE_MS"),
            "EXAMPREP_MAX_DATA_URI_BYTES" => option_env!("EXAMPREP_MAX_DATA_URI_BYTES"),
            _ => None,
        })
    }

    /// Build config from an arbitrary key lookup. Unparseable numbers fall back to defaults.
    pub fn from_lookup<'a, F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let defaults = Self::default();
        let api_base = lookup("EXAMPREP_API_BASE")
            .map(str::trim)
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_owned();
        let login_path = lookup("EXAMPREP_LOGIN_PATH")
            .map(str::trim)
            .filter(|p| p.starts_with('/'))
            .map_or(defaults.login_path, str::to_owned);
        let settings_grace_ms = lookup("EXAMPREP_SETTINGS_GRACE_MS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(defaults.settings_grace_ms);
        let max_data_uri_bytes = lookup("EXAMPREP_MAX_DATA_URI_BYTES")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(defaults.max_data_uri_bytes);

        Self { api_base, login_path, settings_grace_ms, max_data_uri_bytes, keys: defaults.keys }
    }

    /// Join `path` onto the configured API base.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }
}
