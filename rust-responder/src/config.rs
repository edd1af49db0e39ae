//! Configuration module for environment variable parsing.
//!
//! All settings are read once at startup.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// Default location of the service account key file.
pub const DEFAULT_CREDENTIALS_PATH: &str = "./bm-agent-service-account-credentials.json";

/// Default Business Messages REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://businessmessages.googleapis.com/v1/";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Partner key used to verify the `X-Goog-Signature` header.
    /// `None` disables request authentication.
    pub partner_key: Option<String>,

    /// Path to the service account JSON key
    pub credentials_path: PathBuf,

    /// Base URL of the Business Messages API (with trailing slash)
    pub api_base_url: String,

    /// Pause between the steps of a live agent handoff
    pub handoff_delay_ms: u64,

    /// HTTP request timeout for outbound calls
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: parse_or("PORT", 3000),

            partner_key: partner_key_from(env::var("PARTNER_KEY").ok()),

            credentials_path: env::var("GOOGLE_APPLICATION_CREDENTIALS")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CREDENTIALS_PATH)),

            api_base_url: env::var("BM_API_BASE_URL")
                .map(with_trailing_slash)
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),

            handoff_delay_ms: parse_or("HANDOFF_DELAY_MS", 2000),

            request_timeout_ms: parse_or("REQUEST_TIMEOUT_MS", 10_000),
        }
    }

    pub fn handoff_delay(&self) -> Duration {
        Duration::from_millis(self.handoff_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 3000,
            partner_key: None,
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            handoff_delay_ms: 2000,
            request_timeout_ms: 10_000,
        }
    }
}

/// An empty partner key means verification is off; whitespace is kept as a key.
fn partner_key_from(raw: Option<String>) -> Option<String> {
    raw.filter(|key| !key.is_empty())
}

/// Parse a numeric variable, falling back to `default` when unset or invalid.
fn parse_or<T: FromStr + Copy>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid numeric value, using default");
            default
        }
    }
}

// Url::join drops the last path segment unless the base ends with '/'.
fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
