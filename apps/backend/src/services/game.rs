//! Game facade consumed by the web layer: ask, next round, status.

use serde::Serialize;
use tracing::{debug, info};

use super::credential_pool::CredentialStats;
use super::evaluator::QuestionEvaluator;
use super::sessions::SessionManager;
use crate::domain::{AnswerHistoryEntry, HintEngine, SessionStatus, BINGO};
use crate::error::AppError;
use crate::errors::{DomainError, ErrorCode, ERROR_MARKER};

pub const EMPTY_QUESTION_HINT: &str = "Try again!";
pub const NO_ROUND_HINT: &str = "Game Error.";

pub type GameStatus = SessionStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub hint: String,
    #[serde(rename = "gameOver")]
    pub game_over: bool,
}

impl AskResponse {
    /// Whether `answer` reports a failure rather than a game answer.
    pub fn is_error(&self) -> bool {
        self.answer.contains(ERROR_MARKER)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundStatus {
    NextRoundStarted,
    GameOverAllRounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundAdvance {
    pub status: RoundStatus,
    pub remaining_rounds: usize,
    pub total_rounds: usize,
    pub current_round: usize,
}

#[derive(Debug)]
pub struct GameService {
    sessions: SessionManager,
    evaluator: QuestionEvaluator,
    hints: HintEngine,
}

fn require_user_id(user_id: &str) -> Result<&str, AppError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid(
            ErrorCode::MissingUserId,
            "User ID is required.",
        ));
    }
    Ok(trimmed)
}

impl GameService {
    pub fn new(sessions: SessionManager, evaluator: QuestionEvaluator) -> Self {
        Self {
            sessions,
            evaluator,
            hints: HintEngine::new(),
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn evaluator(&self) -> &QuestionEvaluator {
        &self.evaluator
    }

    /// Answer a question about the user's current record.
    ///
    /// Upstream failures come back inside `answer`; only a missing user id
    /// or an empty catalog fail the call.
    pub async fn ask(
        &self,
        user_id: &str,
        question: &str,
        history: &[AnswerHistoryEntry],
    ) -> Result<AskResponse, AppError> {
        let user_id = require_user_id(user_id)?;

        // Cloned out of the session lock; nothing is held across the await.
        let Some(record) = self.sessions.current_record(user_id)? else {
            debug!(user_id, "Question asked with no active round");
            return Ok(AskResponse {
                answer: DomainError::game_not_initialized().answer_text(),
                hint: NO_ROUND_HINT.to_string(),
                game_over: false,
            });
        };

        if question.trim().is_empty() {
            return Ok(AskResponse {
                answer: format!("{ERROR_MARKER}: Please ask a question."),
                hint: EMPTY_QUESTION_HINT.to_string(),
                game_over: false,
            });
        }

        let answer = self
            .evaluator
            .evaluate(user_id, question, Some(record.as_ref()))
            .await;
        let hint = self.hints.hint(history, &record);
        let game_over = answer == BINGO;

        Ok(AskResponse {
            answer,
            hint,
            game_over,
        })
    }

    /// Start the next round. When every round has been played the user's
    /// credential binding is released.
    pub fn next_round(&self, user_id: &str) -> Result<RoundAdvance, AppError> {
        let user_id = require_user_id(user_id)?;
        let outcome = self.sessions.advance_round(user_id)?;

        let status = if outcome.started {
            RoundStatus::NextRoundStarted
        } else {
            self.evaluator.pool().release(user_id);
            RoundStatus::GameOverAllRounds
        };

        Ok(RoundAdvance {
            status,
            remaining_rounds: outcome.status.remaining_rounds,
            total_rounds: outcome.status.total_rounds,
            current_round: outcome.status.current_round,
        })
    }

    pub fn status(&self, user_id: &str) -> Result<GameStatus, AppError> {
        let user_id = require_user_id(user_id)?;
        Ok(self.sessions.status(user_id)?)
    }

    /// Drop idle sessions and their credential bindings. Returns how many
    /// sessions were evicted.
    pub fn evict_idle_sessions(&self) -> usize {
        let evicted = self.sessions.evict_idle();
        for user_id in &evicted {
            self.evaluator.pool().release(user_id);
        }
        if !evicted.is_empty() {
            info!(evicted = evicted.len(), "Released bindings of idle sessions");
        }
        evicted.len()
    }

    pub fn pool_stats(&self) -> Vec<CredentialStats> {
        self.evaluator.pool().stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_status_wire_names() {
        assert_eq!(
            serde_json::to_value(RoundStatus::NextRoundStarted).unwrap(),
            "NEXT_ROUND_STARTED"
        );
        assert_eq!(
            serde_json::to_value(RoundStatus::GameOverAllRounds).unwrap(),
            "GAME_OVER_ALL_ROUNDS"
        );
    }

    #[test]
    fn test_ask_response_wire_names() {
        let json = serde_json::to_value(AskResponse {
            answer: BINGO.to_string(),
            hint: "h".to_string(),
            game_over: true,
        })
        .unwrap();
        assert_eq!(json["gameOver"], true);
        assert_eq!(json["answer"], "BINGO!");
    }

    #[test]
    fn test_require_user_id() {
        assert_eq!(require_user_id(" alice ").unwrap(), "alice");
        let err = require_user_id("  ").unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingUserId);
    }
}
