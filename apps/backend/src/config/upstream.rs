//! Upstream text-generation endpoint configuration.

use std::time::Duration;

use super::parse_var;
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-05-20";

/// Highest numbered `GEMINI_API_KEY_<n>` variable that is scanned.
const MAX_NUMBERED_KEYS: usize = 32;

#[derive(Clone)]
pub struct UpstreamConfig {
    /// Base URL, without trailing slash.
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    /// Pause before the single retry that follows a 429.
    pub retry_backoff: Duration,
    /// Credential secrets, in pool index order.
    pub api_keys: Vec<String>,
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("retry_backoff", &self.retry_backoff)
            .field("api_keys", &format_args!("[{} redacted]", self.api_keys.len()))
            .finish()
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(10),
            retry_backoff: Duration::from_millis(250),
            api_keys: Vec::new(),
        }
    }
}

impl UpstreamConfig {
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `UPSTREAM_BASE_URL` | Endpoint base URL |
    /// | `UPSTREAM_MODEL` | Model name used in the request path |
    /// | `UPSTREAM_TIMEOUT_SECS` | Per-call timeout |
    /// | `UPSTREAM_RETRY_BACKOFF_MS` | Pause before the rate-limit retry |
    /// | `GEMINI_API_KEYS` | Comma-separated credentials |
    /// | `GEMINI_API_KEY_1` … `GEMINI_API_KEY_32` | Numbered credentials |
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let mut keys: Vec<String> = lookup("GEMINI_API_KEYS")
            .map(|raw| raw.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_default();
        for n in 1..=MAX_NUMBERED_KEYS {
            if let Some(key) = lookup(&format!("GEMINI_API_KEY_{n}")) {
                keys.push(key.trim().to_string());
            }
        }

        Ok(Self {
            base_url: lookup("UPSTREAM_BASE_URL")
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            model: lookup("UPSTREAM_MODEL")
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
                .unwrap_or(defaults.model),
            timeout: parse_var::<u64, _>(lookup, "UPSTREAM_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            retry_backoff: parse_var::<u64, _>(lookup, "UPSTREAM_RETRY_BACKOFF_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_backoff),
            api_keys: normalize_keys(keys),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_api_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.api_keys = normalize_keys(keys.into_iter().map(Into::into).collect());
        self
    }
}

/// Drop blanks and duplicates, keeping first-seen order.
fn normalize_keys(keys: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(keys.len());
    for key in keys {
        if !key.is_empty() && !out.contains(&key) {
            out.push(key);
        }
    }
    out
}
