//! Content-addressed answer cache.
//!
//! Keyed by an xxh3-128 digest of the normalized question and the canonical
//! (lexicographically ordered) JSON of the sanitized record. Bounded by
//! entry count and a time-to-live.

use moka::future::Cache;
use tracing::debug;
use xxhash_rust::xxh3::xxh3_128;

use crate::config::CacheConfig;
use crate::domain::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey(u128);

impl CacheKey {
    /// `normalized_question` must already be trimmed and lower-cased;
    /// `sanitized` must have identity fields removed.
    pub fn new(normalized_question: &str, sanitized: &Record) -> Self {
        let mut material = String::with_capacity(normalized_question.len() + 64);
        material.push_str(normalized_question);
        // Unit separator between question and context.
        material.push('\u{1f}');
        material.push_str(&sanitized.canonical_json());
        Self(xxh3_128(material.as_bytes()))
    }
}

#[derive(Clone)]
pub struct ResponseCache {
    entries: Cache<CacheKey, String>,
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl ResponseCache {
    pub fn new(config: &CacheConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();
        Self { entries }
    }

    pub async fn get(&self, key: &CacheKey) -> Option<String> {
        let hit = self.entries.get(key).await;
        debug!(hit = hit.is_some(), "Response cache lookup");
        hit
    }

    pub async fn put(&self, key: CacheKey, answer: String) {
        self.entries.insert(key, answer).await;
    }

    /// Approximate; moka applies pending writes lazily.
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}
