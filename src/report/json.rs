//! JSON report renderer

use crate::engine::BatchReport;
use crate::PairsimResult;

/// Render a batch report as pretty-printed JSON
pub fn render(report: &BatchReport) -> PairsimResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
