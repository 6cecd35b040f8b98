//! Pool, cache and session tuning.

use std::time::Duration;

use super::parse_var;
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// How long a credential stays out of rotation after a 429.
    pub rate_limit_cooldown: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            rate_limit_cooldown: Duration::from_secs(60),
        }
    }
}

impl PoolConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            rate_limit_cooldown: parse_var::<u64, _>(lookup, "RATE_LIMIT_COOLDOWN_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.rate_limit_cooldown),
        })
    }

    pub fn with_rate_limit_cooldown(mut self, cooldown: Duration) -> Self {
        self.rate_limit_cooldown = cooldown;
        self
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub max_entries: u64,
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(60 * 60),
        }
    }
}

impl CacheConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            max_entries: parse_var::<u64, _>(lookup, "RESPONSE_CACHE_MAX_ENTRIES")?
                .unwrap_or(defaults.max_entries),
            ttl: parse_var::<u64, _>(lookup, "RESPONSE_CACHE_TTL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.ttl),
        })
    }

    pub fn with_max_entries(mut self, max_entries: u64) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Sessions untouched for longer than this are dropped by
    /// `GameService::evict_idle_sessions`.
    pub idle_ttl: Duration,
    /// Optional cap on rounds dealt to one session.
    pub max_rounds: Option<usize>,
    /// Base seed for reproducible per-session shuffles. `None` uses OS entropy.
    pub shuffle_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl: Duration::from_secs(2 * 60 * 60),
            max_rounds: None,
            shuffle_seed: None,
        }
    }
}

impl SessionConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            idle_ttl: parse_var::<u64, _>(lookup, "SESSION_IDLE_TTL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.idle_ttl),
            max_rounds: parse_var::<usize, _>(lookup, "MAX_ROUNDS_PER_GAME")?
                .filter(|n| *n > 0),
            shuffle_seed: parse_var::<u64, _>(lookup, "SHUFFLE_SEED")?,
        })
    }

    pub fn with_idle_ttl(mut self, ttl: Duration) -> Self {
        self.idle_ttl = ttl;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = Some(max_rounds).filter(|n| *n > 0);
        self
    }

    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }
}
