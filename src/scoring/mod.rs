//! Similarity scorer: blends structural and raw-text matching ratios
//!
//! ```text
//! structural = ratio(normalize(a), normalize(b))
//! raw        = ratio(a, b)
//! score      = round(((structural + raw) / 2) * 100, 2)
//! ```
//!
//! The two channels carry equal weight. Nothing here fails: unparseable
//! sources arrive as empty dumps and fall under the empty-input convention
//! of [`ratio`].

pub mod matching;

pub use matching::ratio;

use crate::normalize::normalize;
use serde::{Deserialize, Serialize};

// ─── Types ─────────────────────────────────────────────────────────

/// Blended similarity as a percentage in `[0.00, 100.00]`, two decimals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityScore(f64);

impl SimilarityScore {
    pub const MIN: Self = Self(0.0);
    pub const MAX: Self = Self(100.0);

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn band(self) -> SimilarityBand {
        if self.0 >= 100.0 {
            SimilarityBand::Identical
        } else if self.0 >= 75.0 {
            SimilarityBand::High
        } else if self.0 >= 50.0 {
            SimilarityBand::Moderate
        } else if self.0 >= 25.0 {
            SimilarityBand::Low
        } else {
            SimilarityBand::Distinct
        }
    }
}

impl std::fmt::Display for SimilarityScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Coarse reading of a score, for reports only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimilarityBand {
    Identical,
    High,
    Moderate,
    Low,
    Distinct,
}

impl std::fmt::Display for SimilarityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identical => write!(f, "IDENTICAL"),
            Self::High => write!(f, "HIGH"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::Low => write!(f, "LOW"),
            Self::Distinct => write!(f, "DISTINCT"),
        }
    }
}

/// A score together with the two ratios it was blended from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairScore {
    pub structural_ratio: f64,
    pub raw_ratio: f64,
    pub score: SimilarityScore,
}

// ─── Core Functions ────────────────────────────────────────────────

/// Blend a structural ratio and a raw-text ratio into a percentage.
pub fn blend(structural_ratio: f64, raw_ratio: f64) -> SimilarityScore {
    let percent = ((structural_ratio + raw_ratio) / 2.0) * 100.0;
    SimilarityScore(round2(percent).clamp(0.0, 100.0))
}

/// Score two source texts.
pub fn score(a: &str, b: &str) -> SimilarityScore {
    score_detailed(a, b).score
}

/// Score two source texts, keeping the component ratios.
pub fn score_detailed(a: &str, b: &str) -> PairScore {
    let dump_a = normalize(a);
    let dump_b = normalize(b);
    score_prepared(&dump_a, &dump_b, a, b)
}

/// Score with structural dumps computed ahead of time.
pub fn score_prepared(dump_a: &str, dump_b: &str, text_a: &str, text_b: &str) -> PairScore {
    let structural_ratio = ratio(dump_a, dump_b);
    let raw_ratio = ratio(text_a, text_b);
    PairScore {
        structural_ratio,
        raw_ratio,
        score: blend(structural_ratio, raw_ratio),
    }
}

/// Two-decimal rounding on the exact binary value, ties to even.
fn round2(v: f64) -> f64 {
    format!("{:.2}", v).parse().unwrap_or(v)
}

// ─── Tests ─────────────────────────────────────────────────────────
