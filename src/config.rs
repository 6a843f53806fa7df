//! Configuration: `pairsim.toml`
//!
//! ```toml
//! upload_dir = "uploads"
//! result_dir = "results"
//! parallel = true
//! max_pairs = 5000
//! max_file_bytes = 262144
//! use_cache = false
//! formats = ["csv", "svg"]
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use crate::report::ReportFormat;
use crate::{PairsimError, PairsimResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File names probed by [`PairsimConfig::from_project_root`], in order
pub const CONFIG_FILE_NAMES: &[&str] = &["pairsim.toml", ".pairsim.toml"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairsimConfig {
    /// Directory uploaded files are stored in
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Directory result files are written to
    #[serde(default = "default_result_dir")]
    pub result_dir: PathBuf,

    /// Score pairs on the rayon thread pool
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Reject batches with more pairs than this
    #[serde(default = "default_max_pairs")]
    pub max_pairs: usize,

    /// Skip files larger than this many bytes at load time.
    ///
    /// Matching is O(N·D) per pair (N total length, D edit distance), so two
    /// unrelated files of N bytes cost on the order of N² character steps on
    /// the raw text and more on their dumps.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Persist structural dumps between runs (`.pairsim-cache.json`)
    #[serde(default)]
    pub use_cache: bool,

    /// Report files written after a batch
    #[serde(default = "default_formats")]
    pub formats: Vec<ReportFormat>,
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}
fn default_result_dir() -> PathBuf {
    PathBuf::from("results")
}
fn default_true() -> bool {
    true
}
fn default_max_pairs() -> usize {
    5_000
}
fn default_max_file_bytes() -> u64 {
    256 * 1024
}
fn default_formats() -> Vec<ReportFormat> {
    vec![ReportFormat::Csv, ReportFormat::Svg]
}

impl Default for PairsimConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            result_dir: default_result_dir(),
            parallel: true,
            max_pairs: default_max_pairs(),
            max_file_bytes: default_max_file_bytes(),
            use_cache: false,
            formats: default_formats(),
        }
    }
}

impl PairsimConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> PairsimResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PairsimError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| PairsimError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml_str(content: &str) -> PairsimResult<Self> {
        toml::from_str(content).map_err(|e| PairsimError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Try the known config file names under `root`, fall back to defaults
    pub fn from_project_root(root: &Path) -> Self {
        for name in CONFIG_FILE_NAMES {
            let path = root.join(name);
            if !path.exists() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => {
                    tracing::warn!("{}: using defaults", e);
                }
            }
        }

        tracing::debug!("No config file under {}, using defaults", root.display());
        Self::default()
    }
}
