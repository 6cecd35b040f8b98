//! Per-user game sessions.
//!
//! Sessions live in a `DashMap` so different users never contend; each
//! session sits behind its own `parking_lot::Mutex` so concurrent calls for
//! the same user serialize and never skip or repeat a round. Lock order is
//! always map shard, then session.

use std::sync::Arc;
use std::time::Instant;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::catalog::EntityCatalog;
use crate::config::SessionConfig;
use crate::domain::{session_rng, GameSession, Record, SessionStatus};
use crate::errors::DomainError;

#[derive(Debug)]
struct SessionSlot {
    session: GameSession,
    last_active: Instant,
}

type SharedSlot = Arc<Mutex<SessionSlot>>;

/// Result of a round advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    /// A round is now active; `false` means every round has been played.
    pub started: bool,
    pub status: SessionStatus,
}

#[derive(Debug)]
pub struct SessionManager {
    sessions: DashMap<String, SharedSlot>,
    catalog: EntityCatalog,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(catalog: EntityCatalog, config: SessionConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            catalog,
            config,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.sessions.contains_key(user_id)
    }

    /// Deal a new session positioned on round 1.
    fn create(&self, user_id: &str, now: Instant) -> Result<SessionSlot, DomainError> {
        let mut rng = session_rng(self.config.shuffle_seed, user_id);
        let mut session = GameSession::deal(self.catalog.records(), self.config.max_rounds, &mut rng)?;
        session.advance();
        info!(
            user_id,
            total_rounds = session.total_rounds(),
            "Started new game session"
        );
        Ok(SessionSlot {
            session,
            last_active: now,
        })
    }

    /// The user's session, created on first access. The flag reports
    /// whether this call created it.
    fn slot(&self, user_id: &str, now: Instant) -> Result<(SharedSlot, bool), DomainError> {
        if let Some(existing) = self.sessions.get(user_id) {
            return Ok((Arc::clone(existing.value()), false));
        }
        match self.sessions.entry(user_id.to_string()) {
            Entry::Occupied(entry) => Ok((Arc::clone(entry.get()), false)),
            Entry::Vacant(entry) => {
                let slot = Arc::new(Mutex::new(self.create(user_id, now)?));
                entry.insert(Arc::clone(&slot));
                Ok((slot, true))
            }
        }
    }

    /// Create the session if absent; returns whether it was created.
    pub fn ensure_session(&self, user_id: &str) -> Result<bool, DomainError> {
        let (slot, created) = self.slot(user_id, Instant::now())?;
        slot.lock().last_active = Instant::now();
        Ok(created)
    }

    /// The record of the active round, if any.
    pub fn current_record(&self, user_id: &str) -> Result<Option<Arc<Record>>, DomainError> {
        let (slot, _) = self.slot(user_id, Instant::now())?;
        let mut guard = slot.lock();
        guard.last_active = Instant::now();
        Ok(guard.session.current_record().cloned())
    }

    /// Move to the next round. The call that creates a session reports its
    /// freshly started first round instead of skipping past it.
    pub fn advance_round(&self, user_id: &str) -> Result<RoundOutcome, DomainError> {
        let now = Instant::now();
        let (slot, created) = self.slot(user_id, now)?;
        let mut guard = slot.lock();
        guard.last_active = now;

        let started = created || guard.session.advance();
        let status = guard.session.status();
        if started {
            debug!(user_id, round = status.current_round, "Round started");
        } else {
            info!(user_id, total_rounds = status.total_rounds, "All rounds played");
        }
        Ok(RoundOutcome { started, status })
    }

    pub fn status(&self, user_id: &str) -> Result<SessionStatus, DomainError> {
        let (slot, _) = self.slot(user_id, Instant::now())?;
        let mut guard = slot.lock();
        guard.last_active = Instant::now();
        Ok(guard.session.status())
    }

    pub fn evict_idle(&self) -> Vec<String> {
        self.evict_idle_at(Instant::now())
    }

    /// Drop sessions idle for longer than the configured TTL and return
    /// their user ids.
    pub fn evict_idle_at(&self, now: Instant) -> Vec<String> {
        let ttl = self.config.idle_ttl;
        let mut evicted = Vec::new();
        self.sessions.retain(|user_id, slot| {
            // A session locked right now is in use.
            let Some(guard) = slot.try_lock() else {
                return true;
            };
            let keep = now.saturating_duration_since(guard.last_active) <= ttl;
            if !keep {
                evicted.push(user_id.clone());
            }
            keep
        });
        if !evicted.is_empty() {
            info!(evicted = evicted.len(), remaining = self.sessions.len(), "Evicted idle sessions");
        }
        evicted
    }
}
