//! Hints derived from the trailing answer history.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::question::NOT_FOUND;
use super::record::Record;

pub const ASK_MORE_HINT: &str = "Ask more questions to get hints!";
pub const FALLBACK_HINT: &str = "Try asking about the character's origin!";
pub const ENCOURAGEMENT_HINT: &str =
    "You're going in the right direction! Keep the good questions coming.";

/// One previous answer as echoed back by the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerHistoryEntry {
    #[serde(default)]
    pub answer: String,
}

impl AnswerHistoryEntry {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }

    fn is_negative(&self) -> bool {
        self.answer.contains("FALSE") || self.answer.contains(NOT_FOUND)
    }
}

/// Stateless hint generator. Randomness comes from the caller's RNG, so no
/// generator state is shared between users.
#[derive(Debug, Clone, Copy, Default)]
pub struct HintEngine;

impl HintEngine {
    pub fn new() -> Self {
        Self
    }

    /// Hint using the thread-local RNG.
    pub fn hint(&self, history: &[AnswerHistoryEntry], record: &Record) -> String {
        self.hint_with_rng(history, record, &mut rand::rng())
    }

    pub fn hint_with_rng<R: Rng + ?Sized>(
        &self,
        history: &[AnswerHistoryEntry],
        record: &Record,
        rng: &mut R,
    ) -> String {
        if history.len() < 2 {
            return ASK_MORE_HINT.to_string();
        }

        let last_two_negative = history[history.len() - 2..]
            .iter()
            .all(AnswerHistoryEntry::is_negative);
        if !last_two_negative {
            return ENCOURAGEMENT_HINT.to_string();
        }

        match record.hint_fields().choose(rng) {
            Some(field) => field_hint(field),
            None => FALLBACK_HINT.to_string(),
        }
    }
}

/// Hint text pointing at a field name (never its value).
pub fn field_hint(field: &str) -> String {
    let topic = field.to_lowercase().replace('_', " ");
    format!("Hint: Maybe focus on the character's **{topic}**...")
}
