//! Error codes for the riddler game core.
//!
//! This module defines all error codes surfaced to the boundary layer.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in problem-details bodies.

use core::fmt;

/// Centralized error codes for the game core.
///
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request Validation
    /// General validation error
    ValidationError,
    /// Request did not carry a user id
    MissingUserId,

    // Game State
    /// No record is loaded for the caller's current round
    GameNotInitialized,
    /// The entity catalog has no records to deal
    CatalogEmpty,

    // Upstream
    /// Every upstream credential is cooling down
    PoolExhausted,
    /// Upstream call exceeded its timeout
    UpstreamTimeout,
    /// Upstream answered 429 on every attempt
    UpstreamRateLimited,
    /// Any other upstream transport or protocol failure
    UpstreamUnavailable,

    // System Errors
    /// Configuration error
    ConfigError,
    /// Internal error
    Internal,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::MissingUserId => "MISSING_USER_ID",

            Self::GameNotInitialized => "GAME_NOT_INITIALIZED",
            Self::CatalogEmpty => "CATALOG_EMPTY",

            Self::PoolExhausted => "POOL_EXHAUSTED",
            Self::UpstreamTimeout => "UPSTREAM_TIMEOUT",
            Self::UpstreamRateLimited => "UPSTREAM_RATE_LIMITED",
            Self::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",

            Self::ConfigError => "CONFIG_ERROR",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
