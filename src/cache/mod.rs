use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::models::catalog::{MovieCategory, TvCategory};

mod macros;

/// Cache keys for upstream catalog reads
///
/// A key is a pure function of the logically distinguishing request
/// parameters, so two identical requests collide and two different
/// requests never do.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Movies(MovieCategory, u32),
    Tv(TvCategory, u32),
    Trending(u32),
    Search { query: String, page: u32 },
    Genres,
    Featured,
    MovieDetails(u64),
    MovieCredits(u64),
    TvDetails(u64),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Movies(category, page) => {
                write!(f, "movies:{}:{}", category.as_path(), page)
            }
            CacheKey::Tv(category, page) => write!(f, "tv:{}:{}", category.as_path(), page),
            CacheKey::Trending(page) => write!(f, "trending:all:{}", page),
            CacheKey::Search { query, page } => {
                write!(f, "search:{}:{}", query.to_lowercase(), page)
            }
            CacheKey::Genres => write!(f, "genres:all"),
            CacheKey::Featured => write!(f, "featured:movie"),
            CacheKey::MovieDetails(id) => write!(f, "movie:{}", id),
            CacheKey::MovieCredits(id) => write!(f, "movie:{}:credits", id),
            CacheKey::TvDetails(id) => write!(f, "tv:{}", id),
        }
    }
}

struct CacheEntry {
    payload: String,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    /// An entry is visible to readers only while `now - stored_at <= ttl`.
    fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) <= self.ttl
    }
}

/// Process-local TTL cache for upstream API responses
///
/// Entries are serialized JSON payloads stamped at insertion time. Every
/// operation performs its own freshness check and evicts what it finds
/// expired, so the periodic sweep is purely housekeeping. On any
/// serialization problem the cache degrades to a miss; it never surfaces
/// an error to callers.
#[derive(Clone, Default)]
pub struct Cache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value under `key`, overwriting any existing entry
    pub async fn set<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: Duration) {
        let payload = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Cache serialization error");
                return;
            }
        };

        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                payload,
                stored_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Retrieves a fresh value by key
    ///
    /// Expired entries are evicted as a side effect and reported absent.
    pub async fn get<T: serde::de::DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let key = key.to_string();
        let mut entries = self.entries.write().await;

        let entry = entries.get(&key)?;
        if !entry.is_fresh(Instant::now()) {
            entries.remove(&key);
            return None;
        }

        match serde_json::from_str(&entry.payload) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Evicting undeserializable cache entry");
                entries.remove(&key);
                None
            }
        }
    }

    /// Same freshness check as `get`, without touching the payload
    pub async fn has(&self, key: &CacheKey) -> bool {
        let key = key.to_string();
        let mut entries = self.entries.write().await;

        match entries.get(&key) {
            Some(entry) if entry.is_fresh(Instant::now()) => true,
            Some(_) => {
                entries.remove(&key);
                false
            }
            None => false,
        }
    }

    /// Sweeps all entries, evicting any whose freshness check fails
    pub async fn cleanup(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now));
        before - entries.len()
    }

    /// Spawns the background sweep, running `cleanup` every `period`
    pub fn start_sweeper(&self, period: Duration) {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // the first tick fires immediately
            loop {
                interval.tick().await;
                let evicted = cache.cleanup().await;
                if evicted > 0 {
                    tracing::debug!(evicted, "Cache sweep evicted expired entries");
                }
            }
        });
    }
}
