//! Markdown report renderer
//!
//! Summary table, one row per pair in batch order, then any files that
//! could not be parsed or loaded.

use crate::engine::BatchReport;

/// Render a batch report as Markdown
pub fn render(report: &BatchReport) -> String {
    let mut md = String::with_capacity(4096);

    md.push_str("# Pairwise File Similarity\n\n");
    md.push_str("| | |\n|---|---|\n");
    md.push_str(&format!("| **Files** | {} |\n", report.files.len()));
    md.push_str(&format!("| **Pairs** | {} |\n", report.pairs.len()));
    md.push_str(&format!("| **Generated** | {} |\n", report.generated_at));
    md.push_str(&format!("| **Duration** | {}ms |\n", report.duration_ms));
    if let Some(rate) = report.cache_hit_rate {
        md.push_str(&format!("| **Cache Hit Rate** | {:.1}% |\n", rate * 100.0));
    }
    md.push('\n');

    if report.pairs.is_empty() {
        md.push_str("_Fewer than two files were compared; no pairs to report._\n\n");
    } else {
        md.push_str("## Results\n\n");
        md.push_str("| File 1 | File 2 | Similarity (%) | Structure | Text | Band |\n");
        md.push_str("|---|---|---:|---:|---:|---|\n");
        for pair in &report.pairs {
            md.push_str(&format!(
                "| `{}` | `{}` | **{}** | {:.1}% | {:.1}% | {} |\n",
                pair.file_a,
                pair.file_b,
                pair.score,
                pair.structural_ratio * 100.0,
                pair.raw_ratio * 100.0,
                pair.score.band(),
            ));
        }
        md.push('\n');
    }

    let unparseable: Vec<&str> = report
        .files
        .iter()
        .filter(|f| !f.parseable)
        .map(|f| f.id.as_str())
        .collect();
    if !unparseable.is_empty() {
        md.push_str("## Syntax Errors\n\n");
        md.push_str("These files did not parse; their structural channel is empty and only raw text was compared:\n\n");
        for id in unparseable {
            md.push_str(&format!("- `{}`\n", id));
        }
        md.push('\n');
    }

    if !report.skipped.is_empty() {
        md.push_str("## Skipped Files\n\n");
        md.push_str("| File | Reason |\n|---|---|\n");
        for s in &report.skipped {
            md.push_str(&format!("| `{}` | {} |\n", s.path.display(), s.reason));
        }
        md.push('\n');
    }

    md
}
