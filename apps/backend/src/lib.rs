#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod infra;
pub mod logging;
pub mod services;
pub mod state;

// Re-exports for public API
pub use catalog::{CatalogLoader, EntityCatalog};
pub use config::AppConfig;
pub use domain::{AnswerHistoryEntry, Record};
pub use error::{AppError, ProblemDetails};
pub use errors::{DomainError, ErrorCode};
pub use infra::state::{build_state, StateBuilder};
pub use services::{AskResponse, GameService, GameStatus, RoundAdvance, RoundStatus, TextGenerator};
pub use state::AppState;

// Prelude for test convenience
pub mod prelude {
    pub use super::catalog::*;
    pub use super::config::*;
    pub use super::domain::*;
    pub use super::error::*;
    pub use super::errors::*;
    pub use super::services::*;
    pub use super::state::*;
}

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
