//! Per-user game session state machine.
//!
//! `Uninitialized → RoundActive → (RoundActive | Complete)`. A session deals
//! every record at most once; the invariant
//! `current_round + remaining.len() == total_rounds` holds after every
//! advance.

use std::collections::VecDeque;
use std::sync::Arc;

use rand::Rng;
use serde::Serialize;

use super::record::Record;
use super::shuffle::shuffled;
use crate::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    RoundActive,
    Complete,
}

/// Snapshot of a session's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub total_rounds: usize,
    pub remaining_rounds: usize,
    pub current_round: usize,
    #[serde(rename = "game_ready")]
    pub ready: bool,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    remaining: VecDeque<Arc<Record>>,
    total_rounds: usize,
    current_round: usize,
    current: Option<Arc<Record>>,
}

impl GameSession {
    /// Deal a fresh session from the catalog: a session-local permutation,
    /// truncated to `max_rounds` when set. No round is started yet.
    pub fn deal<R: Rng + ?Sized>(
        catalog: &[Arc<Record>],
        max_rounds: Option<usize>,
        rng: &mut R,
    ) -> Result<Self, DomainError> {
        if catalog.is_empty() {
            return Err(DomainError::catalog_empty());
        }

        let mut order = shuffled(catalog, rng);
        if let Some(cap) = max_rounds {
            order.truncate(cap.max(1));
        }

        Ok(Self {
            total_rounds: order.len(),
            remaining: order.into(),
            current_round: 0,
            current: None,
        })
    }

    /// Pop the next record into the current round.
    ///
    /// Returns `false` and clears the current record when nothing is left;
    /// `current_round` is unchanged in that case.
    pub fn advance(&mut self) -> bool {
        match self.remaining.pop_front() {
            Some(next) => {
                self.current = Some(next);
                self.current_round += 1;
                true
            }
            None => {
                self.current = None;
                false
            }
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.current, self.current_round) {
            (Some(_), _) => SessionPhase::RoundActive,
            (None, 0) if !self.remaining.is_empty() => SessionPhase::Uninitialized,
            (None, _) => SessionPhase::Complete,
        }
    }

    pub fn current_record(&self) -> Option<&Arc<Record>> {
        self.current.as_ref()
    }

    pub fn total_rounds(&self) -> usize {
        self.total_rounds
    }

    pub fn current_round(&self) -> usize {
        self.current_round
    }

    pub fn remaining(&self) -> impl Iterator<Item = &Arc<Record>> {
        self.remaining.iter()
    }

    pub fn remaining_len(&self) -> usize {
        self.remaining.len()
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            total_rounds: self.total_rounds,
            remaining_rounds: self.remaining.len() + usize::from(self.current.is_some()),
            current_round: self.current_round,
            ready: self.current.is_some(),
        }
    }
}
