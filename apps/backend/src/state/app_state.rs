use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::GameService;

/// Shared handles passed to the request-handling layer.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Game facade (sessions, evaluator, credential pool)
    pub game: Arc<GameService>,
    /// Configuration the state was built from
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(game: GameService, config: AppConfig) -> Self {
        Self {
            game: Arc::new(game),
            config: Arc::new(config),
        }
    }

    pub fn game(&self) -> &GameService {
        &self.game
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
