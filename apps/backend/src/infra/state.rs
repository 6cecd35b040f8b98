use std::sync::Arc;

use tracing::info;

use crate::catalog::EntityCatalog;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::services::{
    CredentialPool, GameService, GeminiClient, QuestionEvaluator, ResponseCache, SessionManager,
    TextGenerator,
};
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and the
/// embedding process)
pub struct StateBuilder {
    config: AppConfig,
    catalog: EntityCatalog,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            catalog: EntityCatalog::default(),
            generator: None,
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_catalog(mut self, catalog: EntityCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the HTTP upstream client.
    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn build(self) -> Result<AppState, AppError> {
        let Self {
            config,
            catalog,
            generator,
        } = self;

        let generator = match generator {
            Some(generator) => generator,
            None => Arc::new(GeminiClient::new(&config.upstream)?),
        };

        let pool = Arc::new(CredentialPool::new(
            config.upstream.api_keys.iter().cloned(),
            &config.pool,
        ));
        let evaluator = QuestionEvaluator::new(pool, ResponseCache::new(&config.cache), generator)
            .with_retry_backoff(config.upstream.retry_backoff);
        info!(
            credentials = config.upstream.api_keys.len(),
            catalog = catalog.len(),
            "Game state assembled"
        );
        let sessions = SessionManager::new(catalog, config.session.clone());

        Ok(AppState::new(GameService::new(sessions, evaluator), config))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
