//! Text-generation upstream: the [`TextGenerator`] seam and its HTTP
//! implementation against the Gemini `generateContent` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::credential_pool::CredentialHandle;
use crate::config::UpstreamConfig;
use crate::domain::{Record, NOT_FOUND};
use crate::error::AppError;
use crate::errors::{DomainError, InfraErrorKind};
use crate::logging::{fingerprint, redact};

/// Transport-level classification of a failed upstream call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream rate limited (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    #[error("upstream unavailable: {0}")]
    Unavailable(String),
}

impl From<UpstreamError> for DomainError {
    fn from(err: UpstreamError) -> Self {
        let kind = match &err {
            UpstreamError::Timeout => InfraErrorKind::Timeout,
            UpstreamError::RateLimited { .. } => InfraErrorKind::RateLimited,
            UpstreamError::Unavailable(_) => InfraErrorKind::Unavailable,
        };
        DomainError::infra(kind, err.to_string())
    }
}

/// Produces answer text for a question about a sanitized record.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        credential: &CredentialHandle,
        system_instruction: &str,
        user_query: &str,
        context: &Record,
    ) -> Result<String, UpstreamError>;
}

/// User content sent upstream: the question followed by the sanitized
/// record as pretty-printed JSON.
pub fn build_prompt(user_query: &str, context: &Record) -> String {
    format!(
        "The user is asking: '{user_query}'\n\nCharacter Data:\n{}",
        context.pretty_json()
    )
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

impl<'a> Content<'a> {
    fn text(text: &'a str) -> Self {
        Self {
            parts: vec![Part { text }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// First candidate's first text part, trimmed; `NOT FOUND` when the
    /// envelope lacks it.
    fn into_answer(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .map(|text| text.trim().to_string())
            .unwrap_or_else(|| NOT_FOUND.to_string())
    }
}

/// HTTP client for the Gemini `generateContent` API. The credential travels
/// as the `key` query parameter.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

fn classify_transport(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::Unavailable(redact(&err.to_string()))
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        credential: &CredentialHandle,
        system_instruction: &str,
        user_query: &str,
        context: &Record,
    ) -> Result<String, UpstreamError> {
        let prompt = build_prompt(user_query, context);
        let body = GenerateRequest {
            contents: vec![Content::text(&prompt)],
            system_instruction: Content::text(system_instruction),
        };

        debug!(
            model = %self.model,
            key = %fingerprint(credential.secret()),
            "Calling upstream"
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", credential.secret())])
            .json(&body)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            warn!(
                key = %fingerprint(credential.secret()),
                retry_after_secs = retry_after.map(|d| d.as_secs()),
                "Upstream returned 429"
            );
            return Err(UpstreamError::RateLimited { retry_after });
        }
        if !status.is_success() {
            warn!(status = status.as_u16(), "Upstream returned an error status");
            return Err(UpstreamError::Unavailable(format!("HTTP {}", status.as_u16())));
        }

        let envelope: GenerateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout
            } else {
                UpstreamError::Unavailable(format!(
                    "invalid response body: {}",
                    redact(&e.to_string())
                ))
            }
        })?;

        Ok(envelope.into_answer())
    }
}
