#![allow(dead_code)]

//! Stub upstream and service wiring for integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use riddler::catalog::EntityCatalog;
use riddler::config::AppConfig;
use riddler::services::{CredentialHandle, TextGenerator, UpstreamError};
use riddler::{build_state, AppState, Record};

/// One observed upstream call.
#[derive(Debug, Clone)]
pub struct SeenCall {
    pub credential: usize,
    pub user_query: String,
    pub context: Record,
}

/// Call-counting `TextGenerator`: replays scripted results, then answers
/// with a fixed default.
pub struct StubGenerator {
    calls: AtomicUsize,
    script: Mutex<VecDeque<Result<String, UpstreamError>>>,
    default_answer: String,
    seen: Mutex<Vec<SeenCall>>,
}

impl StubGenerator {
    pub fn answering(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            script: Mutex::new(VecDeque::new()),
            default_answer: answer.to_string(),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn scripted(script: Vec<Result<String, UpstreamError>>, then: &str) -> Arc<Self> {
        let stub = Self::answering(then);
        stub.script.lock().extend(script);
        stub
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<SeenCall> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(
        &self,
        credential: &CredentialHandle,
        _system_instruction: &str,
        user_query: &str,
        context: &Record,
    ) -> Result<String, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push(SeenCall {
            credential: credential.index(),
            user_query: user_query.to_string(),
            context: context.clone(),
        });
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(self.default_answer.clone()))
    }
}

pub fn keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("test-key-{i}")).collect()
}

/// Assembled state over `catalog` with `n_keys` credentials and `stub` as
/// the upstream.
pub fn state_with(
    catalog: Vec<Record>,
    n_keys: usize,
    stub: Arc<StubGenerator>,
    config: AppConfig,
) -> AppState {
    let upstream = config.upstream.clone().with_api_keys(keys(n_keys));
    let config = config.with_upstream(upstream);
    build_state()
        .with_config(config)
        .with_catalog(EntityCatalog::from_records(catalog))
        .with_generator(stub)
        .build()
        .expect("state should build")
}
