//! Time-boxed cache of rendered calendar documents.
//!
//! Entries are keyed by project id. Freshness is checked when an entry is
//! read; nothing runs in the background to evict stale entries.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

/// How long a rendered calendar is served before it is regenerated.
pub const DEFAULT_CACHE_TTL_SECS: i64 = 5 * 60;

#[derive(Debug, Clone)]
struct CacheEntry {
    content: String,
    last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CalendarCache {
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl Default for CalendarCache {
    fn default() -> Self {
        CalendarCache::new(Duration::seconds(DEFAULT_CACHE_TTL_SECS))
    }
}

impl CalendarCache {
    pub fn new(ttl: Duration) -> Self {
        CalendarCache {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached content for `key`, if it was stored less than `ttl` before `now`.
    pub fn get(&self, key: &str, now: DateTime<Utc>) -> Option<&str> {
        self.entries
            .get(key)
            .filter(|entry| now - entry.last_updated < self.ttl)
            .map(|entry| entry.content.as_str())
    }

    /// Store (or replace) the content for `key`, stamped with `now`.
    pub fn put(&mut self, key: impl Into<String>, content: impl Into<String>, now: DateTime<Utc>) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                content: content.into(),
                last_updated: now,
            },
        );
    }

    /// Drop the entry for `key`. Returns whether an entry was present.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
