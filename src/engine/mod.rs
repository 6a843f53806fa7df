//! # Batch Engine: pairwise orchestration
//!
//! - `workspace`: explicit upload/result directories, file loading
//! - `cache`: content-addressed structural dump cache
//!
//! The engine normalizes each distinct file content once, then scores every
//! unordered pair `(i, j)` with `i < j` in combination order:
//! `(0,1), (0,2), …, (0,n-1), (1,2), …`. Parallel scoring collects results
//! in that same order, so output never depends on the thread pool.

pub mod cache;
pub mod workspace;

use crate::config::PairsimConfig;
use crate::normalize;
use crate::scoring::{self, SimilarityScore};
use crate::{PairsimError, PairsimResult};
use cache::DumpCache;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

// ─── Inputs ────────────────────────────────────────────────────────

/// One decoded source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub id: String,
    pub text: String,
    /// SHA-256 of `text`, hex encoded
    pub sha256: String,
}

impl SourceFile {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let sha256 = cache::content_digest(&text);
        Self {
            id: id.into(),
            text,
            sha256,
        }
    }
}

// ─── Outputs ───────────────────────────────────────────────────────

/// One row of the batch output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairResult {
    pub file_a: String,
    pub file_b: String,
    pub score: SimilarityScore,
    pub structural_ratio: f64,
    pub raw_ratio: f64,
}

/// Per-file metadata recorded in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSummary {
    pub id: String,
    pub sha256: String,
    pub chars: usize,
    pub parseable: bool,
}

/// A file left out of the batch by the loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Contents are not valid UTF-8
    NotUtf8,
    TooLarge { bytes: u64, limit: u64 },
    Unreadable(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotUtf8 => write!(f, "not valid UTF-8"),
            Self::TooLarge { bytes, limit } => {
                write!(f, "{} bytes exceeds the {} byte limit", bytes, limit)
            }
            Self::Unreadable(e) => write!(f, "unreadable: {}", e),
        }
    }
}

/// Complete result of one batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub generated_at: String,
    pub files: Vec<FileSummary>,
    pub pairs: Vec<PairResult>,
    pub skipped: Vec<SkippedFile>,
    pub duration_ms: u64,
    /// Dump cache hit rate, when a persistent cache was used
    pub cache_hit_rate: Option<f64>,
}

impl BatchReport {
    pub fn with_skipped(mut self, skipped: Vec<SkippedFile>) -> Self {
        self.skipped = skipped;
        self
    }
}

// ─── Pair Enumeration ──────────────────────────────────────────────

/// Number of unordered pairs in a batch of `n` files
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Index pairs `(i, j)` with `i < j`, in combination order
pub fn pair_indices(n: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(pair_count(n));
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push((i, j));
        }
    }
    pairs
}

// ─── Engine ────────────────────────────────────────────────────────

/// Scores every unordered pair of a batch
pub struct BatchEngine {
    config: PairsimConfig,
}

impl BatchEngine {
    pub fn new(config: PairsimConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PairsimConfig {
        &self.config
    }

    /// Score a batch with a throwaway dump cache
    pub fn compare(&self, files: &[SourceFile]) -> PairsimResult<BatchReport> {
        let mut cache = DumpCache::ephemeral();
        let mut report = self.compare_with_cache(files, &mut cache)?;
        report.cache_hit_rate = None;
        Ok(report)
    }

    /// Score a batch, reusing and filling `cache`
    pub fn compare_with_cache(
        &self,
        files: &[SourceFile],
        cache: &mut DumpCache,
    ) -> PairsimResult<BatchReport> {
        let start = std::time::Instant::now();
        let total_pairs = pair_count(files.len());
        if total_pairs > self.config.max_pairs {
            return Err(PairsimError::BatchTooLarge {
                pairs: total_pairs,
                limit: self.config.max_pairs,
            });
        }

        tracing::info!(
            "Comparing {} files ({} pairs{})",
            files.len(),
            total_pairs,
            if self.config.parallel { ", parallel" } else { "" }
        );

        let dumps = self.prepare_dumps(files, cache);

        let score_pair = |&(i, j): &(usize, usize)| {
            let (a, b) = (&files[i], &files[j]);
            let scored = scoring::score_prepared(&dumps[i].0, &dumps[j].0, &a.text, &b.text);
            tracing::debug!("  {} ↔ {}: {}", a.id, b.id, scored.score);
            PairResult {
                file_a: a.id.clone(),
                file_b: b.id.clone(),
                score: scored.score,
                structural_ratio: scored.structural_ratio,
                raw_ratio: scored.raw_ratio,
            }
        };

        let indices = pair_indices(files.len());
        let pairs: Vec<PairResult> = if self.config.parallel {
            indices.par_iter().map(score_pair).collect()
        } else {
            indices.iter().map(score_pair).collect()
        };

        let summaries = files
            .iter()
            .zip(&dumps)
            .map(|(f, (_, parseable))| FileSummary {
                id: f.id.clone(),
                sha256: f.sha256.clone(),
                chars: f.text.chars().count(),
                parseable: *parseable,
            })
            .collect();

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!("  ✓ {} pairs scored in {}ms", pairs.len(), duration_ms);

        Ok(BatchReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            files: summaries,
            pairs,
            skipped: Vec::new(),
            duration_ms,
            cache_hit_rate: Some(cache.hit_rate()),
        })
    }

    /// Structural dump and parseability per file, parsing each distinct
    /// content at most once
    fn prepare_dumps(&self, files: &[SourceFile], cache: &mut DumpCache) -> Vec<(String, bool)> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut missing: Vec<&SourceFile> = Vec::new();
        for file in files {
            if !seen.insert(file.sha256.as_str()) {
                continue;
            }
            if cache.lookup(&file.sha256).is_none() {
                missing.push(file);
            }
        }

        let parse_one = |f: &&SourceFile| {
            let outcome = normalize::parse(&f.text);
            let parseable = outcome.is_parsed();
            if !parseable {
                tracing::warn!("{}: syntax error, comparing raw text only", f.id);
            }
            (f.sha256.clone(), outcome.into_dump(), parseable)
        };
        let parsed: Vec<(String, String, bool)> = if self.config.parallel {
            missing.par_iter().map(parse_one).collect()
        } else {
            missing.iter().map(parse_one).collect()
        };
        for (sha256, dump, parseable) in parsed {
            cache.insert(sha256, dump, parseable);
        }

        files
            .iter()
            .map(|f| match cache.peek(&f.sha256) {
                Some(cached) => (cached.dump.clone(), cached.parseable),
                None => {
                    let outcome = normalize::parse(&f.text);
                    let parseable = outcome.is_parsed();
                    (outcome.into_dump(), parseable)
                }
            })
            .collect()
    }
}

impl Default for BatchEngine {
    fn default() -> Self {
        Self::new(PairsimConfig::default())
    }
}

// ─── Tests ─────────────────────────────────────────────────────────
