//! Typed DTOs for the client/backend boundary.
//!
//! DESIGN
//! ======
//! The backend owns these schemas. Known fields are typed; everything else on
//! a user record is kept in `extra` so persisted sessions round-trip without
//! losing data the UI does not model yet.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::util::stamped::{self, Stamped};

/// An authenticated user as returned by login and `/api/auth/me`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Backend user identifier. Numeric ids are normalized to strings.
    #[serde(default, deserialize_with = "deserialize_opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Role name, e.g. `"admin"` or `"student"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, rename = "isAdmin", alias = "is_admin", skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    /// Remaining profile fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.is_admin == Some(true) || self.role.as_deref().is_some_and(|r| r.eq_ignore_ascii_case("admin"))
    }

    /// Best label for the account menu.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.email.as_deref())
            .unwrap_or("Account")
    }
}

/// The client's view of who is signed in.
///
/// A `None` token with a `Some` user is valid: the backend may authenticate
/// with a cookie only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

impl Session {
    pub fn new(token: Option<String>, user: Option<User>) -> Self {
        Self { token: token.filter(|t| !t.trim().is_empty()), user }
    }

    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.user.is_none()
    }

    /// `Authorization` header value for this session, if it carries a token.
    pub fn bearer(&self) -> Option<String> {
        self.token.as_deref().map(bearer_header)
    }

    /// Normalize a login/profile payload into a session.
    ///
    /// Objects with a `token` or `user` key are full sessions. Any other
    /// object is a bare user record and keeps `current_token`. `null` is the
    /// empty session. Other shapes are rejected.
    pub fn from_input(input: Value, current_token: Option<&str>) -> Option<Self> {
        match input {
            Value::Null => Some(Self::default()),
            Value::Object(map) if map.contains_key("token") || map.contains_key("user") => {
                let token = match map.get("token") {
                    Some(Value::String(t)) => Some(t.clone()),
                    _ => None,
                };
                let user = match map.get("user") {
                    Some(Value::Object(u)) => Some(serde_json::from_value(Value::Object(u.clone())).ok()?),
                    Some(Value::Null) | None => None,
                    Some(_) => return None,
                };
                Some(Self::new(token, user))
            }
            Value::Object(map) => {
                let user = serde_json::from_value(Value::Object(map)).ok()?;
                Some(Self::new(current_token.map(str::to_owned), Some(user)))
            }
            _ => None,
        }
    }
}

/// Decode a persisted `auth` value. Legacy bare payloads are version 0.
///
/// Goes through `from_input`, so a blank token reads as no token.
pub fn parse_persisted_session(raw: &str) -> Option<Stamped<Session>> {
    let stamped = stamped::decode::<Value>(raw)?;
    let session = Session::from_input(stamped.value, None)?;
    Some(Stamped::new(stamped.version, session))
}

pub fn bearer_header(token: &str) -> String {
    format!("Bearer {token}")
}

/// `POST /api/auth/login` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Error envelope the backend uses on failures.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Some(n.to_string())),
        _ => Err(D::Error::custom("expected string or integer id")),
    }
}
