//! Memoization of per-file results across analysis passes.
//!
//! Entries are keyed by path and validated by an xxh3 hash of the file bytes,
//! so any edit invalidates the entry on the next lookup. Files are still read
//! on every pass; only the parsing work is skipped. A cache is optional and
//! is meant to be shared by repeated passes over the same tree (watch mode).

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use xxhash_rust::xxh3::xxh3_64;

use crate::analyzer::analyze_bytes;
use crate::stats::ScriptStats;

#[derive(Debug, Clone)]
struct CacheEntry {
    hash: u64,
    stats: ScriptStats,
}

/// Thread-safe cache of file statistics.
#[derive(Debug, Default)]
pub struct StatsCache {
    entries: RwLock<HashMap<PathBuf, CacheEntry>>,
}

impl StatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return cached stats for `path` if `bytes` are unchanged, otherwise
    /// analyze and store them. Returns `None` for undecodable bytes, which
    /// are never cached.
    pub fn get_or_analyze(&self, path: &Path, bytes: &[u8]) -> Option<ScriptStats> {
        let hash = xxh3_64(bytes);

        if let Ok(entries) = self.entries.read() {
            if let Some(entry) = entries.get(path).filter(|e| e.hash == hash) {
                tracing::trace!(path = %path.display(), "cache hit");
                return Some(entry.stats.clone());
            }
        }

        let stats = analyze_bytes(bytes)?;
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                path.to_path_buf(),
                CacheEntry {
                    hash,
                    stats: stats.clone(),
                },
            );
        }
        Some(stats)
    }

    /// Whether an entry exists for `path`
    pub fn contains(&self, path: &Path) -> bool {
        self.entries
            .read()
            .map(|entries| entries.contains_key(path))
            .unwrap_or(false)
    }

    /// Number of cached files
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop entries whose path is not in `keep`. Returns how many were removed.
    pub fn retain_paths(&self, keep: &HashSet<PathBuf>) -> usize {
        let Ok(mut entries) = self.entries.write() else {
            return 0;
        };
        let before = entries.len();
        entries.retain(|path, _| keep.contains(path));
        before - entries.len()
    }

    /// Remove every entry
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}
