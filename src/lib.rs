//! # pairsim: Pairwise Source Similarity
//!
//! Scores every unordered pair in a batch of source files by blending two
//! signals with equal weight:
//!
//! ```text
//! ┌──────────────┐   normalize    ┌────────────────┐
//! │  SourceText  │ ─────────────▶ │ StructuralDump │──┐
//! └──────┬───────┘  (tree-sitter) └────────────────┘  │ ratio
//!        │                                            ▼
//!        │              ratio (raw text)        ┌───────────┐
//!        └────────────────────────────────────▶ │   blend   │ ─▶ 0.00..=100.00
//!                                               └───────────┘
//! ```
//!
//! ## Modules
//!
//! - `normalize`: parse Python source into a language-neutral `SyntaxNode`
//!   tree and serialize it to a canonical structural dump
//! - `scoring`: LCS matching ratio and the blended percentage score
//! - `engine`: batch orchestration, explicit workspace directories, and a
//!   content-addressed dump cache
//! - `report`: CSV, Markdown, JSON and SVG chart output
//! - `config`: `pairsim.toml` settings

pub mod config;
pub mod engine;
pub mod normalize;
pub mod report;
pub mod scoring;

// Re-exports for convenience
pub use config::PairsimConfig;
pub use engine::{BatchEngine, BatchReport, PairResult, SkippedFile, SourceFile};
pub use engine::workspace::Workspace;
pub use normalize::{normalize, parse, ParseOutcome, SyntaxNode};
pub use report::{render_report, write_report, ReportFormat};
pub use scoring::{ratio, score, score_detailed, PairScore, SimilarityScore};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PairsimError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Batch too large: {pairs} pairs exceeds the limit of {limit}")]
    BatchTooLarge { pairs: usize, limit: usize },

    #[error("Invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type PairsimResult<T> = Result<T, PairsimError>;
