//! Runtime configuration.
//!
//! Every section has defaults, `with_*` setters, and a `from_lookup`
//! constructor fed by `std::env::var` in production and by a map in tests.

pub mod game;
pub mod upstream;

use std::fmt::Display;
use std::str::FromStr;

pub use game::{CacheConfig, PoolConfig, SessionConfig};
pub use upstream::UpstreamConfig;

use crate::error::AppError;

/// Full configuration for the game core.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub upstream: UpstreamConfig,
    pub pool: PoolConfig,
    pub cache: CacheConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            upstream: UpstreamConfig::from_lookup(&lookup)?,
            pool: PoolConfig::from_lookup(&lookup)?,
            cache: CacheConfig::from_lookup(&lookup)?,
            session: SessionConfig::from_lookup(&lookup)?,
        })
    }

    pub fn with_upstream(mut self, upstream: UpstreamConfig) -> Self {
        self.upstream = upstream;
        self
    }

    pub fn with_pool(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }

    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }
}

/// Read and parse an optional variable. Blank values count as unset.
pub(crate) fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AppError::config(format!("{name} is invalid ({raw:?}): {e}"))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let cfg = AppConfig::from_lookup(|_| None).unwrap();
        assert!(cfg.upstream.api_keys.is_empty());
        assert_eq!(cfg.upstream.timeout, Duration::from_secs(10));
        assert_eq!(cfg.pool.rate_limit_cooldown, Duration::from_secs(60));
        assert_eq!(cfg.cache.max_entries, 10_000);
        assert_eq!(cfg.session.max_rounds, None);
        assert_eq!(cfg.session.shuffle_seed, None);
    }

    #[test]
    fn test_numbers_are_parsed() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("UPSTREAM_TIMEOUT_SECS", "3"),
            ("RATE_LIMIT_COOLDOWN_SECS", "5"),
            ("RESPONSE_CACHE_MAX_ENTRIES", "42"),
            ("MAX_ROUNDS_PER_GAME", "10"),
            ("SHUFFLE_SEED", "7"),
        ]))
        .unwrap();
        assert_eq!(cfg.upstream.timeout, Duration::from_secs(3));
        assert_eq!(cfg.pool.rate_limit_cooldown, Duration::from_secs(5));
        assert_eq!(cfg.cache.max_entries, 42);
        assert_eq!(cfg.session.max_rounds, Some(10));
        assert_eq!(cfg.session.shuffle_seed, Some(7));
    }

    #[test]
    fn test_malformed_number_is_config_error() {
        let err = AppConfig::from_lookup(lookup_from(&[("UPSTREAM_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
        assert!(err.detail().contains("UPSTREAM_TIMEOUT_SECS"));
    }

    #[test]
    fn test_blank_value_counts_as_unset() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("MAX_ROUNDS_PER_GAME", "  ")])).unwrap();
        assert_eq!(cfg.session.max_rounds, None);
    }
}
