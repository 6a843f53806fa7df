//! CSV renderer: the downloadable result table
//!
//! Columns match the upload form's download:
//! `File 1,File 2,Similarity (%)`. Fields are quoted per RFC 4180 when they
//! contain a comma, quote, or line break.

use crate::engine::BatchReport;

pub const HEADER: [&str; 3] = ["File 1", "File 2", "Similarity (%)"];

/// Render the pair table as CSV
pub fn render(report: &BatchReport) -> String {
    let mut out = String::with_capacity(64 + report.pairs.len() * 48);
    out.push_str(&HEADER.join(","));
    out.push('\n');
    for pair in &report.pairs {
        out.push_str(&escape(&pair.file_a));
        out.push(',');
        out.push_str(&escape(&pair.file_b));
        out.push(',');
        out.push_str(&pair.score.to_string());
        out.push('\n');
    }
    out
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::sample_report;

    #[test]
    fn test_render_rows() {
        let csv = render(&sample_report());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "File 1,File 2,Similarity (%)",
                "a.py,\"b,c.py\",80.00",
                "a.py,bad.py,25.00",
            ]
        );
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape("say \"hi\".py"), "\"say \"\"hi\"\".py\"");
        assert_eq!(escape("plain.py"), "plain.py");
    }
}
