//! Domain layer: pure game logic types and helpers.

pub mod hint;
pub mod question;
pub mod record;
pub mod session;
pub mod shuffle;

pub use hint::{AnswerHistoryEntry, HintEngine};
pub use question::{is_identity_probe, is_winning_guess, normalize, BINGO, NOT_FOUND};
pub use record::Record;
pub use session::{GameSession, SessionPhase, SessionStatus};
pub use shuffle::{derive_session_seed, session_rng, shuffled};
