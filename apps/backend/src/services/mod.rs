//! Game core services: credential scheduling, answer caching, the upstream
//! client, question evaluation, per-user sessions, and the facade tying
//! them together.

pub mod credential_pool;
pub mod evaluator;
pub mod game;
pub mod response_cache;
pub mod sessions;
pub mod upstream;

pub use credential_pool::{CredentialHandle, CredentialPool, CredentialStats};
pub use evaluator::{QuestionEvaluator, SYSTEM_INSTRUCTION};
pub use game::{AskResponse, GameService, GameStatus, RoundAdvance, RoundStatus};
pub use response_cache::{CacheKey, ResponseCache};
pub use sessions::{RoundOutcome, SessionManager};
pub use upstream::{build_prompt, GeminiClient, TextGenerator, UpstreamError};
