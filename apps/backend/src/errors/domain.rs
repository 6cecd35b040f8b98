//! Domain-level error type used across services.
//!
//! This error type is transport-agnostic. The service facade converts it
//! into `crate::error::AppError` for the boundary layer, while the question
//! evaluator folds it into an `ERROR:`-prefixed answer string.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::ErrorCode;

/// Marker every error answer starts with. Callers check for it instead of a
/// separate error channel.
pub const ERROR_MARKER: &str = "ERROR";

/// Game-state failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StateErrorKind {
    /// No record is loaded for the session's current round
    GameNotInitialized,
    /// The catalog had zero records when a session was created
    CatalogEmpty,
}

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    RateLimited,
    PoolExhausted,
    Unavailable,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input validation
    Validation(ErrorCode, String),
    /// Session or catalog state does not allow the operation
    State(StateErrorKind, String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(code, d) => write!(f, "validation error {code}: {d}"),
            DomainError::State(kind, d) => write!(f, "state {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation(code, detail.into())
    }
    pub fn state(kind: StateErrorKind, detail: impl Into<String>) -> Self {
        Self::State(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    pub fn game_not_initialized() -> Self {
        Self::state(
            StateErrorKind::GameNotInitialized,
            "no record loaded for the current round",
        )
    }

    pub fn catalog_empty() -> Self {
        Self::state(StateErrorKind::CatalogEmpty, "entity catalog has no records")
    }

    pub fn pool_exhausted() -> Self {
        Self::infra(
            InfraErrorKind::PoolExhausted,
            "every upstream credential is rate limited",
        )
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::Validation(code, _) => *code,
            DomainError::State(StateErrorKind::GameNotInitialized, _) => {
                ErrorCode::GameNotInitialized
            }
            DomainError::State(StateErrorKind::CatalogEmpty, _) => ErrorCode::CatalogEmpty,
            DomainError::Infra(InfraErrorKind::Timeout, _) => ErrorCode::UpstreamTimeout,
            DomainError::Infra(InfraErrorKind::RateLimited, _) => ErrorCode::UpstreamRateLimited,
            DomainError::Infra(InfraErrorKind::PoolExhausted, _) => ErrorCode::PoolExhausted,
            DomainError::Infra(InfraErrorKind::Unavailable, _) => ErrorCode::UpstreamUnavailable,
            DomainError::Infra(InfraErrorKind::Other(_), _) => ErrorCode::Internal,
        }
    }

    /// User-visible answer text for this error. Always starts with
    /// [`ERROR_MARKER`].
    pub fn answer_text(&self) -> String {
        let text = match self {
            DomainError::Validation(_, detail) => return format!("{ERROR_MARKER}: {detail}"),
            DomainError::State(StateErrorKind::GameNotInitialized, _) => "Game not initialized.",
            DomainError::State(StateErrorKind::CatalogEmpty, _) => "Could not initialize game.",
            DomainError::Infra(InfraErrorKind::Timeout, _) => "Request timed out.",
            DomainError::Infra(InfraErrorKind::RateLimited, _) => {
                "Rate limit exceeded. Please try again later."
            }
            DomainError::Infra(InfraErrorKind::PoolExhausted, _) => "No API keys available.",
            DomainError::Infra(InfraErrorKind::Unavailable, _) => "API request failed.",
            DomainError::Infra(InfraErrorKind::Other(_), _) => "Internal server error.",
        };
        format!("{ERROR_MARKER}: {text}")
    }
}
