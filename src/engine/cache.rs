//! Content-addressed dump cache
//!
//! Caches structural dumps by SHA-256 of the source text. Within a batch,
//! identical uploads are parsed once; with persistence enabled, unchanged
//! files are not re-parsed across runs.

use crate::PairsimResult;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const CACHE_FILE_NAME: &str = ".pairsim-cache.json";
const CACHE_VERSION: u32 = 1;

/// Cached normalization result for one content hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedDump {
    pub dump: String,
    pub parseable: bool,
    pub parsed_at: String,
}

/// On-disk cache layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpCacheData {
    pub version: u32,
    pub dumps: HashMap<String, CachedDump>,
}

impl Default for DumpCacheData {
    fn default() -> Self {
        Self {
            version: CACHE_VERSION,
            dumps: HashMap::new(),
        }
    }
}

pub struct DumpCache {
    cache_path: Option<PathBuf>,
    data: DumpCacheData,
    hits: usize,
    misses: usize,
}

impl DumpCache {
    /// Load the cache stored in `dir`, or start empty
    pub fn load(dir: &Path) -> Self {
        let cache_path = dir.join(CACHE_FILE_NAME);
        let data = match std::fs::read_to_string(&cache_path) {
            Ok(content) => match serde_json::from_str::<DumpCacheData>(&content) {
                Ok(d) if d.version == CACHE_VERSION => {
                    tracing::info!("Loaded dump cache ({} entries)", d.dumps.len());
                    d
                }
                _ => {
                    tracing::debug!("Cache version mismatch, starting fresh");
                    DumpCacheData::default()
                }
            },
            Err(_) => DumpCacheData::default(),
        };

        Self {
            cache_path: Some(cache_path),
            data,
            hits: 0,
            misses: 0,
        }
    }

    /// A cache that never touches disk
    pub fn ephemeral() -> Self {
        Self {
            cache_path: None,
            data: DumpCacheData::default(),
            hits: 0,
            misses: 0,
        }
    }

    /// Look up a dump, counting the hit or miss
    pub fn lookup(&mut self, sha256: &str) -> Option<&CachedDump> {
        match self.data.dumps.get(sha256) {
            Some(cached) => {
                self.hits += 1;
                Some(cached)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Look up a dump without touching the statistics
    pub fn peek(&self, sha256: &str) -> Option<&CachedDump> {
        self.data.dumps.get(sha256)
    }

    pub fn insert(&mut self, sha256: String, dump: String, parseable: bool) {
        self.data.dumps.insert(
            sha256,
            CachedDump {
                dump,
                parseable,
                parsed_at: chrono::Utc::now().to_rfc3339(),
            },
        );
    }

    /// Write the cache back to disk. No-op for ephemeral caches.
    pub fn save(&self) -> PairsimResult<()> {
        let Some(path) = &self.cache_path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(path, json)?;
        tracing::info!(
            "Saved dump cache ({} entries, {}/{} hit rate)",
            self.data.dumps.len(),
            self.hits,
            self.hits + self.misses
        );
        Ok(())
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn hits(&self) -> usize {
        self.hits
    }
    pub fn misses(&self) -> usize {
        self.misses
    }
    pub fn len(&self) -> usize {
        self.data.dumps.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.dumps.is_empty()
    }
}

/// SHA-256 of a text, hex encoded
pub fn content_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
