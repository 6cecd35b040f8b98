//! Unique ids for test isolation.
//!
//! Sessions and credential bindings are keyed by user id, so tests sharing
//! a service instance should never reuse one.

use ulid::Ulid;

/// A unique user id in the format `{prefix}-{ulid}`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_user_id;
///
/// let a = unique_user_id("player");
/// let b = unique_user_id("player");
/// assert_ne!(a, b);
/// assert!(a.starts_with("player-"));
/// ```
pub fn unique_user_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// `n` distinct user ids sharing a prefix.
pub fn unique_user_ids(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|_| unique_user_id(prefix)).collect()
}
