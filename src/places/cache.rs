//! File-based address search cache at ~/.midmeet/cache.json.
//!
//! TTL: 7 days. Case-insensitive, whitespace-trimmed keys.
//! Missing or corrupt files load as an empty cache; write failures are ignored.

use super::types::{Place, PlaceSource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const CACHE_TTL_MS: i64 = 7 * 24 * 3600 * 1000;

#[derive(Serialize, Deserialize, Clone)]
struct CacheEntry {
    places: Vec<Place>,
    timestamp: i64,
}

/// The search cache.
pub struct SearchCache {
    path: PathBuf,
    entries: HashMap<String, CacheEntry>,
}

impl SearchCache {
    /// Load cache from the default location (~/.midmeet/cache.json).
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    pub fn load_from(path: PathBuf) -> Self {
        let entries = Self::read_file(&path).unwrap_or_default();
        Self { path, entries }
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".midmeet")
            .join("cache.json")
    }

    fn read_file(path: &Path) -> Option<HashMap<String, CacheEntry>> {
        let data = fs::read_to_string(path).ok()?;
        serde_json::from_str(&data).ok()
    }

    fn key(query: &str) -> String {
        query.trim().to_lowercase()
    }

    /// Look up a query. Returns None if missing or expired.
    pub fn get(&self, query: &str) -> Option<Vec<Place>> {
        let entry = self.entries.get(&Self::key(query))?;

        let now = chrono::Utc::now().timestamp_millis();
        if now - entry.timestamp > CACHE_TTL_MS {
            return None;
        }

        Some(
            entry
                .places
                .iter()
                .cloned()
                .map(|p| Place { source: PlaceSource::Cache, ..p })
                .collect(),
        )
    }

    /// Store search results and persist to disk. Empty result sets are not cached.
    /// Expired entries are pruned before writing.
    pub fn put(&mut self, query: &str, places: &[Place]) {
        if places.is_empty() {
            return;
        }
        let now = chrono::Utc::now().timestamp_millis();
        self.entries.retain(|_, e| now - e.timestamp <= CACHE_TTL_MS);
        let entry = CacheEntry {
            places: places.to_vec(),
            timestamp: now,
        };
        self.entries.insert(Self::key(query), entry);
        self.persist();
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Ok(json) = serde_json::to_string_pretty(&self.entries) {
            let _ = fs::write(&self.path, json);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
