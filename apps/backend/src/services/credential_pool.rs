//! Shared pool of upstream API credentials with sticky session bindings.
//!
//! One `parking_lot::Mutex` guards both the binding table and the
//! per-credential counters, so `acquire`, `release` and
//! `report_rate_limited` are atomic with respect to each other. The lock is
//! never held across an await point.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::PoolConfig;
use crate::errors::DomainError;
use crate::logging::fingerprint;

/// A credential selected for one upstream call.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHandle {
    index: usize,
    secret: Arc<str>,
}

impl CredentialHandle {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for CredentialHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHandle")
            .field("index", &self.index)
            .field("secret", &fingerprint(&self.secret))
            .finish()
    }
}

/// Point-in-time view of one credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CredentialStats {
    pub index: usize,
    /// Sessions currently bound to this credential.
    pub load: u64,
    /// Upstream dispatches made with this credential.
    pub requests: u64,
    pub rate_limited: bool,
}

#[derive(Debug)]
struct Credential {
    secret: Arc<str>,
    load: u64,
    requests: u64,
    limited_until: Option<Instant>,
}

impl Credential {
    fn is_limited(&self) -> bool {
        self.limited_until.is_some()
    }
}

#[derive(Debug, Default)]
struct PoolState {
    credentials: Vec<Credential>,
    bindings: HashMap<String, usize>,
}

impl PoolState {
    /// Clear cool-downs that have run out.
    fn expire_limits(&mut self, now: Instant) {
        for (index, cred) in self.credentials.iter_mut().enumerate() {
            if matches!(cred.limited_until, Some(reset_at) if now >= reset_at) {
                cred.limited_until = None;
                debug!(credential = index, "Credential cool-down expired");
            }
        }
    }

    fn handle(&self, index: usize) -> CredentialHandle {
        CredentialHandle {
            index,
            secret: Arc::clone(&self.credentials[index].secret),
        }
    }

    fn unbind(&mut self, session_id: &str) -> Option<usize> {
        let index = self.bindings.remove(session_id)?;
        if let Some(cred) = self.credentials.get_mut(index) {
            cred.load = cred.load.saturating_sub(1);
        }
        Some(index)
    }
}

pub struct CredentialPool {
    state: Mutex<PoolState>,
    cooldown: Duration,
}

impl fmt::Debug for CredentialPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPool")
            .field("credentials", &self.len())
            .field("cooldown", &self.cooldown)
            .finish()
    }
}

impl CredentialPool {
    pub fn new<I, S>(secrets: I, config: &PoolConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let credentials: Vec<Credential> = secrets
            .into_iter()
            .map(|secret| Credential {
                secret: secret.into(),
                load: 0,
                requests: 0,
                limited_until: None,
            })
            .collect();

        if credentials.is_empty() {
            warn!("Credential pool created without credentials; every upstream call will fail");
        } else {
            info!(credentials = credentials.len(), "Credential pool ready");
        }

        Self {
            state: Mutex::new(PoolState {
                credentials,
                bindings: HashMap::new(),
            }),
            cooldown: config.rate_limit_cooldown,
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn acquire(&self, session_id: &str) -> Result<CredentialHandle, DomainError> {
        self.acquire_at(session_id, Instant::now())
    }

    /// Sticky reuse of the session's binding while it is not rate-limited;
    /// otherwise the least-loaded unlimited credential (lowest index on
    /// ties) is bound and its load incremented.
    pub fn acquire_at(
        &self,
        session_id: &str,
        now: Instant,
    ) -> Result<CredentialHandle, DomainError> {
        let mut state = self.state.lock();
        state.expire_limits(now);

        if let Some(&index) = state.bindings.get(session_id) {
            let usable = state
                .credentials
                .get(index)
                .is_some_and(|cred| !cred.is_limited());
            if usable {
                return Ok(state.handle(index));
            }
            state.unbind(session_id);
            debug!(session_id, credential = index, "Failing over from limited credential");
        }

        let winner = state
            .credentials
            .iter()
            .enumerate()
            .filter(|(_, cred)| !cred.is_limited())
            .min_by_key(|(index, cred)| (cred.load, *index))
            .map(|(index, _)| index);

        let Some(index) = winner else {
            warn!(
                session_id,
                credentials = state.credentials.len(),
                "No credential available"
            );
            return Err(DomainError::pool_exhausted());
        };

        state.credentials[index].load += 1;
        state.bindings.insert(session_id.to_string(), index);
        debug!(
            session_id,
            credential = index,
            load = state.credentials[index].load,
            "Bound session to credential"
        );
        Ok(state.handle(index))
    }

    pub fn report_rate_limited(&self, handle: &CredentialHandle) {
        self.report_rate_limited_at(handle, Instant::now());
    }

    /// Start the cool-down for `handle`. Existing bindings stay in place and
    /// fail over on their next `acquire`.
    pub fn report_rate_limited_at(&self, handle: &CredentialHandle, now: Instant) {
        let mut state = self.state.lock();
        let Some(cred) = state.credentials.get_mut(handle.index) else {
            return;
        };
        cred.limited_until = Some(now + self.cooldown);
        warn!(
            credential = handle.index,
            key = %fingerprint(&cred.secret),
            cooldown_secs = self.cooldown.as_secs(),
            "Credential rate-limited"
        );
    }

    /// Drop the session's binding; returns whether one existed.
    pub fn release(&self, session_id: &str) -> bool {
        let mut state = self.state.lock();
        match state.unbind(session_id) {
            Some(index) => {
                debug!(session_id, credential = index, "Released credential binding");
                true
            }
            None => false,
        }
    }

    /// Count one upstream dispatch against `handle`.
    pub fn record_request(&self, handle: &CredentialHandle) {
        let mut state = self.state.lock();
        if let Some(cred) = state.credentials.get_mut(handle.index) {
            cred.requests += 1;
            debug!(
                credential = handle.index,
                key = %fingerprint(&cred.secret),
                requests = cred.requests,
                "Upstream request dispatched"
            );
        }
    }

    pub fn bound_index(&self, session_id: &str) -> Option<usize> {
        self.state.lock().bindings.get(session_id).copied()
    }

    pub fn stats(&self) -> Vec<CredentialStats> {
        self.stats_at(Instant::now())
    }

    pub fn stats_at(&self, now: Instant) -> Vec<CredentialStats> {
        let mut state = self.state.lock();
        state.expire_limits(now);
        state
            .credentials
            .iter()
            .enumerate()
            .map(|(index, cred)| CredentialStats {
                index,
                load: cred.load,
                requests: cred.requests,
                rate_limited: cred.is_limited(),
            })
            .collect()
    }
}
