//! Site-wide configuration shape: defaults, public whitelist, typed views.
//!
//! DESIGN
//! ======
//! The settings document stays a JSON object so unknown server keys survive
//! a save round-trip. Components read it through small typed views that
//! default every field, so a partial or odd document still renders.

#[cfg(test)]
#[path = "site_settings_test.rs"]
mod site_settings_test;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Top-level keys safe to expose to signed-out visitors.
pub const PUBLIC_KEYS: [&str; 7] = ["announcement", "support", "maintenance", "branding", "footer", "features", "seo"];

/// Lowest-precedence settings layer.
pub fn default_settings() -> Value {
    json!({
        "announcement": { "enabled": false, "text": "", "tone": "info", "link": null },
        "support": { "email": "", "url": null, "hours": "" },
        "maintenance": {
            "enabled": false,
            "message": "We are performing scheduled maintenance. Please check back soon."
        },
        "branding": { "siteName": "ExamPrep", "logoDataUrl": null, "primaryColor": "#2563eb" },
        "footer": { "text": "", "links": [] },
        "features": { "aiPracticeTests": true, "signups": true },
        "seo": { "title": "ExamPrep", "description": "" },
        "billing": { "trialDays": 7, "currency": "usd" },
        "integrations": {}
    })
}

/// Whitelist projection of the admin document.
///
/// Only `PUBLIC_KEYS` are copied; a non-object input projects to `{}`.
pub fn project_public(admin: &Value) -> Value {
    let Some(map) = admin.as_object() else {
        return Value::Object(Map::new());
    };
    let projected = PUBLIC_KEYS
        .iter()
        .filter_map(|key| map.get(*key).map(|v| ((*key).to_owned(), v.clone())))
        .collect::<Map<String, Value>>();
    Value::Object(projected)
}

fn section<T: DeserializeOwned + Default>(settings: &Value, key: &str) -> T {
    settings
        .get(key)
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
}

impl Tone {
    pub fn css_modifier(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Announcement {
    pub enabled: bool,
    pub text: String,
    pub tone: Tone,
    pub link: Option<String>,
}

impl Announcement {
    pub fn is_visible(&self) -> bool {
        self.enabled && !self.text.trim().is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Maintenance {
    pub enabled: bool,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Support {
    pub email: String,
    pub url: Option<String>,
    pub hours: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Branding {
    pub site_name: String,
    pub logo_data_url: Option<String>,
    pub primary_color: String,
}

/// Typed read access over a merged settings document.
pub trait SettingsView {
    fn announcement(&self) -> Announcement;
    fn maintenance(&self) -> Maintenance;
    fn support(&self) -> Support;
    fn branding(&self) -> Branding;
}

impl SettingsView for Value {
    fn announcement(&self) -> Announcement {
        section(self, "announcement")
    }

    fn maintenance(&self) -> Maintenance {
        section(self, "maintenance")
    }

    fn support(&self) -> Support {
        section(self, "support")
    }

    fn branding(&self) -> Branding {
        section(self, "branding")
    }
}
