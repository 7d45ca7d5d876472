//! Client configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use crate::constants::DEFAULT_BASE_URL;
use std::env;
use std::time::Duration;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    /// Agent server configuration
    pub api: ApiConfig,
}

/// Agent server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the agent server, without a trailing slash
    pub base_url: String,
    /// Per-request timeout; `None` leaves requests unbounded
    pub timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// `from_env` delegates here; tests pass a closure over a map instead of
    /// mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("AGENT_API_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .map(|url| normalize_base_url(&url))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = lookup("AGENT_API_TIMEOUT_SECS")
            .and_then(|t| t.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            api: ApiConfig { base_url, timeout },
        }
    }

    /// Replace the base URL, e.g. from a command-line flag
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.api.base_url = normalize_base_url(base_url);
        self
    }
}

/// Trim whitespace and trailing slashes so paths can be appended directly
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
