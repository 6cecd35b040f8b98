//! Turns a question about the hidden record into an answer string.
//!
//! Order of checks: game initialised, identity-probe filter, sanitize,
//! cache, upstream (one retry on a fresh credential after a 429), error
//! passthrough, win check, upper-casing. The probe filter runs before the
//! cache and the network so a probing question is never sent or cached.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::credential_pool::CredentialPool;
use super::response_cache::{CacheKey, ResponseCache};
use super::upstream::{TextGenerator, UpstreamError};
use crate::domain::{is_identity_probe, is_winning_guess, normalize, Record, BINGO, NOT_FOUND};
use crate::errors::{DomainError, ERROR_MARKER};
use crate::logging::Redacted;

/// Retries allowed after a rate-limited upstream call.
const MAX_RATE_LIMIT_RETRIES: u32 = 1;

pub const SYSTEM_INSTRUCTION: &str = "\
You are a strict trivia game master. Answer the user's question using ONLY the JSON data \
provided about the hidden character.
Rules:
1. Never mention, hint at, or reveal the character's identity or name.
2. If asked what or who the character is, or for its name, respond ONLY with 'NOT FOUND'.
3. For yes/no questions (e.g. 'Is the character male?'), respond ONLY with 'TRUE' or 'FALSE'.
4. For value questions (e.g. 'What is the gender?'), respond with the exact value from the JSON.
5. If the answer is not in the data, respond with 'NOT FOUND'.
6. Never use fields that reveal identity: 'CHARACTER', 'SOURCE'.
7. Keep responses to a single word or a very short phrase.

Examples:
Q: 'Is the character male?' -> 'TRUE' or 'FALSE'
Q: 'What is the gender?' -> 'MALE'
Q: 'Is it a villain?' -> 'TRUE' or 'FALSE'
Q: 'What is the character?' -> 'NOT FOUND'
Q: 'Who is this?' -> 'NOT FOUND'";

pub struct QuestionEvaluator {
    pool: Arc<CredentialPool>,
    cache: ResponseCache,
    generator: Arc<dyn TextGenerator>,
    retry_backoff: Duration,
}

impl std::fmt::Debug for QuestionEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionEvaluator")
            .field("pool", &self.pool)
            .field("cache", &self.cache)
            .field("retry_backoff", &self.retry_backoff)
            .finish_non_exhaustive()
    }
}

impl QuestionEvaluator {
    pub fn new(
        pool: Arc<CredentialPool>,
        cache: ResponseCache,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            pool,
            cache,
            generator,
            retry_backoff: Duration::ZERO,
        }
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn pool(&self) -> &Arc<CredentialPool> {
        &self.pool
    }

    /// Answer text for `question`. Failures come back as text starting with
    /// [`ERROR_MARKER`]; see [`QuestionEvaluator::try_evaluate`] for the
    /// structured form.
    pub async fn evaluate(&self, session_id: &str, question: &str, record: Option<&Record>) -> String {
        match self.try_evaluate(session_id, question, record).await {
            Ok(answer) => answer,
            Err(err) => {
                let detail = err.to_string();
                warn!(
                    session_id,
                    code = %err.code(),
                    error = %Redacted(&detail),
                    "Question evaluation failed"
                );
                err.answer_text()
            }
        }
    }

    pub async fn try_evaluate(
        &self,
        session_id: &str,
        question: &str,
        record: Option<&Record>,
    ) -> Result<String, DomainError> {
        let record = match record {
            Some(r) if !r.is_empty() => r,
            _ => return Err(DomainError::game_not_initialized()),
        };

        let normalized = normalize(question);
        if is_identity_probe(&normalized) {
            info!(session_id, "Blocked identity-probing question");
            return Ok(NOT_FOUND.to_string());
        }

        let context = record.sanitized();
        let key = CacheKey::new(&normalized, &context);

        let raw = match self.cache.get(&key).await {
            Some(hit) => hit,
            None => {
                let fresh = self
                    .call_upstream(session_id, question.trim(), &context)
                    .await?;
                if !fresh.contains(ERROR_MARKER) {
                    self.cache.put(key, fresh.clone()).await;
                }
                fresh
            }
        };

        if raw.contains(ERROR_MARKER) {
            return Ok(raw);
        }
        if is_winning_guess(question, record) {
            info!(session_id, "Correct guess");
            return Ok(BINGO.to_string());
        }
        Ok(raw.to_uppercase())
    }

    async fn call_upstream(
        &self,
        session_id: &str,
        question: &str,
        context: &Record,
    ) -> Result<String, DomainError> {
        let mut retries = 0;

        loop {
            // Pool lock is released before the call below.
            let credential = self.pool.acquire(session_id)?;
            self.pool.record_request(&credential);

            let result = self
                .generator
                .generate(&credential, SYSTEM_INSTRUCTION, question, context)
                .await;

            match result {
                Ok(text) => {
                    debug!(session_id, credential = credential.index(), "Upstream answered");
                    return Ok(text);
                }
                Err(e @ UpstreamError::RateLimited { .. }) => {
                    self.pool.report_rate_limited(&credential);
                    if retries >= MAX_RATE_LIMIT_RETRIES {
                        return Err(e.into());
                    }
                    retries += 1;
                    warn!(
                        session_id,
                        credential = credential.index(),
                        retry = retries,
                        backoff_ms = self.retry_backoff.as_millis() as u64,
                        "Retrying on a fresh credential"
                    );
                    if !self.retry_backoff.is_zero() {
                        tokio::time::sleep(self.retry_backoff).await;
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
