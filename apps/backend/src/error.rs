use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::errors::{DomainError, ErrorCode, InfraErrorKind, StateErrorKind};

/// Problem-details body the web layer can serialize as-is.
#[derive(Debug, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Game state error: {detail}")]
    State { code: ErrorCode, detail: String },
    #[error("Upstream error: {detail}")]
    Upstream { code: ErrorCode, detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::State { code, .. } => *code,
            AppError::Upstream { code, .. } => *code,
            AppError::Internal { .. } => ErrorCode::Internal,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            AppError::Validation { detail, .. } => detail.clone(),
            AppError::State { detail, .. } => detail.clone(),
            AppError::Upstream { detail, .. } => detail.clone(),
            AppError::Internal { detail } => detail.clone(),
            AppError::Config { detail } => detail.clone(),
        }
    }

    /// Suggested HTTP status for the boundary layer.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::State { code, .. } => match code {
                ErrorCode::GameNotInitialized => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Upstream { code, .. } => match code {
                ErrorCode::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
                ErrorCode::PoolExhausted | ErrorCode::UpstreamRateLimited => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                _ => StatusCode::BAD_GATEWAY,
            },
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn problem_details(&self) -> ProblemDetails {
        let code = self.code();
        ProblemDetails {
            type_: format!("https://riddler.invalid/errors/{}", code.as_str()),
            title: Self::humanize_code(code.as_str()),
            status: self.status().as_u16(),
            detail: self.detail(),
            code: code.as_str().to_string(),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let lower = word.to_lowercase();
                let mut chars = lower.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        let code = err.code();
        match err {
            DomainError::Validation(_, detail) => AppError::Validation { code, detail },
            DomainError::State(StateErrorKind::GameNotInitialized, detail)
            | DomainError::State(StateErrorKind::CatalogEmpty, detail) => {
                AppError::State { code, detail }
            }
            DomainError::Infra(InfraErrorKind::Other(kind), detail) => AppError::Internal {
                detail: format!("{kind}: {detail}"),
            },
            DomainError::Infra(_, detail) => AppError::Upstream { code, detail },
        }
    }
}
