//! Error types for the agent API client
//!
//! Every failed call surfaces as a [`ClientError`]. The session turns these
//! into user-facing alerts via [`ClientError::detail`], which prefers the
//! most specific message the server provided.

use thiserror::Error;

/// Errors returned by [`crate::api_client::AgentApi`] operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered with a non-success status
    #[error("Server returned status {status}: {detail}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Server-provided detail, or the raw body when no detail field exists
        detail: String,
    },

    /// The request never produced a response (connection refused, timeout, ...)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not a valid agent state
    #[error("Failed to decode agent state: {0}")]
    Decode(String),

    /// The configured base URL cannot be used to build request URLs
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ClientError {
    /// Most specific human-readable message for alerts
    ///
    /// HTTP failures yield the server detail alone; other kinds fall back to
    /// their full display text.
    pub fn detail(&self) -> String {
        match self {
            ClientError::Http { detail, .. } if !detail.trim().is_empty() => detail.clone(),
            ClientError::Http { status, .. } => format!("Request failed with status code {}", status),
            other => other.to_string(),
        }
    }

    /// HTTP status code, when the server responded
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Extract the most specific detail from an error response body
///
/// FastAPI reports `{"detail": "..."}`; other servers commonly use `error` or
/// `message`. Structured details (validation error lists) are rendered as
/// JSON. Bodies that are not JSON are returned trimmed.
pub fn extract_detail(body: &str) -> String {
    let parsed: Result<serde_json::Value, _> = serde_json::from_str(body);
    if let Ok(serde_json::Value::Object(map)) = parsed {
        for key in ["detail", "error", "message"] {
            match map.get(key) {
                Some(serde_json::Value::String(s)) => return s.clone(),
                Some(serde_json::Value::Null) | None => continue,
                Some(other) => return other.to_string(),
            }
        }
    }
    body.trim().to_string()
}
