//! Timed on-disk cache of metrics responses.
//!
//! Entries are keyed by the active date-range filter and hold the raw
//! response plus the time it was stored. Entries older than
//! [`CACHE_FRESHNESS_MS`] are bypassed. Caching is best-effort: read
//! failures are treated as misses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};
use crate::metric::MetricsResponse;

/// How long a cached response stays fresh (5 minutes).
pub const CACHE_FRESHNESS_MS: i64 = 5 * 60 * 1000;

/// Get the current Unix timestamp in milliseconds.
pub fn current_timestamp_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Cache key for a date-filtered metrics query.
pub fn cache_key(start: NaiveDate, end: NaiveDate) -> String {
    format!("metrics_{}_{}", start, end)
}

/// A cached response and the time it was stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedMetricsResponse {
    pub data: MetricsResponse,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}

impl CachedMetricsResponse {
    /// Whether this entry is still fresh at `now`.
    pub fn is_fresh(&self, now: i64) -> bool {
        now - self.timestamp < CACHE_FRESHNESS_MS
    }
}

/// Directory-backed response cache, one JSON file per key.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    /// Create a cache rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache in the platform cache directory (`<cache dir>/playsight`).
    pub fn default_location() -> Option<Self> {
        dirs::cache_dir().map(|dir| Self::new(dir.join("playsight")))
    }

    /// The cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", file))
    }

    /// Look up a fresh entry.
    pub fn get(&self, key: &str) -> Option<MetricsResponse> {
        self.get_at(key, current_timestamp_millis())
    }

    /// Look up an entry that is fresh at `now`.
    pub fn get_at(&self, key: &str, now: i64) -> Option<MetricsResponse> {
        let path = self.path_for(key);
        let content = std::fs::read(&path).ok()?;

        let entry: CachedMetricsResponse = match serde_json::from_slice(&content) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "Ignoring unreadable cache entry");
                return None;
            }
        };

        if entry.is_fresh(now) {
            tracing::debug!(key = %key, "Cache hit");
            Some(entry.data)
        } else {
            tracing::debug!(key = %key, age_ms = now - entry.timestamp, "Cache entry is stale");
            None
        }
    }

    /// Store a response under `key`.
    pub fn put(&self, key: &str, data: &MetricsResponse) -> Result<()> {
        self.put_at(key, data, current_timestamp_millis())
    }

    /// Store a response under `key` with an explicit timestamp.
    pub fn put_at(&self, key: &str, data: &MetricsResponse, timestamp: i64) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let entry = CachedMetricsResponse {
            data: data.clone(),
            timestamp,
        };
        std::fs::write(self.path_for(key), serde_json::to_vec(&entry)?)?;
        Ok(())
    }

    /// Remove every cached entry. Returns the number of entries removed.
    pub fn clear(&self) -> Result<usize> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(Error::Io(e)),
        };

        let mut removed = 0;
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                std::fs::remove_file(&path).map_err(|e| {
                    Error::Cache(format!("Failed to remove '{}': {}", path.display(), e))
                })?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
