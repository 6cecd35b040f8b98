//! Question normalization, identity-probe filtering, and the win check.

use super::record::Record;

/// Answer for anything the game will not answer.
pub const NOT_FOUND: &str = "NOT FOUND";
/// Answer for a correct guess.
pub const BINGO: &str = "BINGO!";

/// Substrings that mark a question as probing for the hidden identity.
///
/// Matched against the normalized question. A bare `"character"` is not in
/// the list: ordinary attribute questions ("Is the character male?") name
/// the subject that way.
pub const FORBIDDEN_PATTERNS: [&str; 12] = [
    "name",
    "who is",
    "who are",
    "who's",
    "what is the character",
    "tell me who",
    "reveal",
    "character name",
    "character's name",
    "identity",
    "what character",
    "which character",
];

/// Trimmed, lower-cased question text.
pub fn normalize(question: &str) -> String {
    question.trim().to_lowercase()
}

/// True when the normalized question contains an identity-probing pattern.
pub fn is_identity_probe(normalized: &str) -> bool {
    FORBIDDEN_PATTERNS.iter().any(|p| normalized.contains(p))
}

/// True when the question, stripped of `?` and `!`, equals the record's
/// display name (case-insensitive).
pub fn is_winning_guess(question: &str, record: &Record) -> bool {
    let name = record.display_name().trim();
    if name.is_empty() {
        return false;
    }
    let guess: String = normalize(question)
        .chars()
        .filter(|c| *c != '?' && *c != '!')
        .collect();
    guess.trim() == name.to_lowercase()
}
