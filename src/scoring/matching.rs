//! Character-level matching ratio
//!
//! `ratio = 2 * M / (len(a) + len(b))` where `M` is the longest common
//! subsequence of the two character sequences. Myers' algorithm finds a
//! minimal edit script, and a minimal insert/delete script keeps exactly an
//! LCS as its equal runs, so the count is the same whichever side is `old`.

use similar::{capture_diff_slices, Algorithm, DiffTag};
use std::hash::Hash;

/// Matching ratio of two texts in `[0.0, 1.0]`.
///
/// Two empty texts are identical (1.0). One empty text against a non-empty
/// one shares nothing (0.0).
pub fn ratio(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let total = a_chars.len() + b_chars.len();
    if a_chars.is_empty() || b_chars.is_empty() {
        return 0.0;
    }

    let matched = matched_len(&a_chars, &b_chars);
    (2.0 * matched as f64 / total as f64).clamp(0.0, 1.0)
}

/// Length of the longest common subsequence of two slices.
pub fn matched_len<T: Eq + Hash + Ord>(a: &[T], b: &[T]) -> usize {
    capture_diff_slices(Algorithm::Myers, a, b)
        .iter()
        .filter(|op| op.tag() == DiffTag::Equal)
        .map(|op| op.old_range().len())
        .sum()
}
