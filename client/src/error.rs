//! Error types shared by the storage and HTTP layers.
//!
//! ERROR HANDLING
//! ==============
//! Session and settings paths never surface these to the end user; they are
//! logged and the caller degrades to defaults, the last good cache, or a
//! logged-out session. Page-level API helpers return them so forms can show
//! a message.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Failures talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (offline, DNS, CORS, aborted).
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-success status.
    #[error("request failed: {status}")]
    Status { status: u16 },
    /// The server rejected the session; the client has already logged out.
    #[error("authentication required")]
    Unauthorized,
    /// The body did not match the expected schema.
    #[error("invalid response body: {0}")]
    Decode(String),
    /// HTTP is only available in the browser build.
    #[error("not available on server")]
    Unavailable,
}

impl ApiError {
    /// Whether this error ended the current session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// Failures writing to durable client storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("failed to write `{key}`")]
    Write { key: String },
    #[error("failed to remove `{key}`")]
    Remove { key: String },
    #[error("failed to serialize `{key}`: {message}")]
    Serialize { key: String, message: String },
}
