//! Report generation: CSV, Markdown, JSON, and SVG chart output
//!
//! Turns a `BatchReport` into the downloadable table (`result.csv`), a
//! human-readable summary, a machine-readable dump, and a bar chart.

pub mod chart;
pub mod csv;
pub mod json;
pub mod markdown;

use crate::engine::BatchReport;
use crate::{PairsimError, PairsimResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output format for a batch report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// `File 1,File 2,Similarity (%)` table
    Csv,
    /// Markdown table with bands and batch metadata
    Markdown,
    /// Pretty-printed JSON of the whole report
    Json,
    /// Horizontal bar chart
    Svg,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 4] = [Self::Csv, Self::Markdown, Self::Json, Self::Svg];

    /// File name used when writing into a result directory
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Csv => "result.csv",
            Self::Markdown => "result.md",
            Self::Json => "result.json",
            Self::Svg => "graph.svg",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
            Self::Svg => write!(f, "svg"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = PairsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "svg" | "chart" => Ok(Self::Svg),
            other => Err(PairsimError::Report(format!("Unknown report format: {}", other))),
        }
    }
}

/// Write a report in the specified format
pub fn write_report(report: &BatchReport, format: ReportFormat, output: &Path) -> PairsimResult<()> {
    let content = render_report(report, format)?;
    std::fs::write(output, content)?;
    Ok(())
}

/// Render a report to a string
pub fn render_report(report: &BatchReport, format: ReportFormat) -> PairsimResult<String> {
    match format {
        ReportFormat::Csv => Ok(csv::render(report)),
        ReportFormat::Markdown => Ok(markdown::render(report)),
        ReportFormat::Json => json::render(report),
        ReportFormat::Svg => Ok(chart::render(report)),
    }
}
