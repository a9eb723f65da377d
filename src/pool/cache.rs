//! Track pool disk cache.
//!
//! Saves built pools so a new game doesn't have to query every catalog
//! again. Entries are keyed by source, category and the queries used, and
//! expire after a TTL.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

use super::TrackPool;
use crate::model::Track;

/// Hex digits of the query fingerprint kept in a key.
const FINGERPRINT_LEN: usize = 12;

/// On-disk cache entry.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    saved_at: DateTime<Utc>,
    tracks: Vec<Track>,
}

/// Track pool disk cache.
pub struct PoolCache {
    cache_dir: PathBuf,
}

impl PoolCache {
    /// Create a new cache in the specified directory.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Create a cache in the default location (user cache directory).
    pub fn default_location() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("music-guess")
            .join("pools");
        Self::new(cache_dir)
    }

    /// Cache key for a source/category pair.
    ///
    /// Ends in a short SHA-256 fingerprint of the query list and per-query
    /// limit, so editing either in the config misses the old entry.
    pub fn key(source: &str, category: &str, queries: &[String], per_query_limit: u32) -> String {
        let mut hasher = Sha256::new();
        hasher.update(per_query_limit.to_le_bytes());
        for query in queries {
            hasher.update(query.as_bytes());
            hasher.update([0u8]);
        }
        let digest = format!("{:x}", hasher.finalize());
        format!("{}-{}-{}", source, category, &digest[..FINGERPRINT_LEN])
    }

    /// Cached tracks for a key, if present and younger than `ttl`.
    ///
    /// Tracks still need to go through [`super::rebuild_pool`].
    pub fn get(&self, key: &str, ttl: TimeDelta) -> Option<Vec<Track>> {
        self.get_at(key, ttl, Utc::now())
    }

    fn get_at(&self, key: &str, ttl: TimeDelta, now: DateTime<Utc>) -> Option<Vec<Track>> {
        let path = self.cache_path(key);
        let contents = fs::read_to_string(&path).ok()?;

        let entry: CacheEntry = match serde_json::from_str(&contents) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Ignoring corrupt pool cache {:?}: {}", path, e);
                return None;
            }
        };

        if now - entry.saved_at > ttl {
            tracing::debug!("Pool cache {:?} expired", path);
            return None;
        }

        Some(entry.tracks)
    }

    /// Store a pool in the cache.
    pub fn put(&self, key: &str, pool: &TrackPool) -> Result<PathBuf, std::io::Error> {
        self.put_at(key, pool, Utc::now())
    }

    fn put_at(
        &self,
        key: &str,
        pool: &TrackPool,
        now: DateTime<Utc>,
    ) -> Result<PathBuf, std::io::Error> {
        fs::create_dir_all(&self.cache_dir)?;

        let entry = CacheEntry {
            saved_at: now,
            tracks: pool.tracks().to_vec(),
        };
        let contents = serde_json::to_string(&entry)?;

        let path = self.cache_path(key);
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Check if a key has a cache file (fresh or not).
    pub fn contains(&self, key: &str) -> bool {
        self.cache_path(key).exists()
    }

    /// Clear all cached pools.
    pub fn clear(&self) -> Result<usize, std::io::Error> {
        let mut removed = 0;
        if self.cache_dir.exists() {
            for entry in fs::read_dir(&self.cache_dir)? {
                let entry = entry?;
                if entry.file_type()?.is_file() {
                    fs::remove_file(entry.path())?;
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }

    fn cache_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.cache_dir.join(format!("{}.json", safe))
    }
}
