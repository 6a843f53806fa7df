//! SVG bar chart renderer
//!
//! One horizontal bar per pair, labelled `A ↔ B`, on a fixed 0–100 axis.
//! Rows follow batch order top to bottom.

use crate::engine::BatchReport;

const WIDTH: f64 = 1000.0;
const LABEL_WIDTH: f64 = 320.0;
const PLOT_WIDTH: f64 = 600.0;
const ROW_HEIGHT: f64 = 28.0;
const BAR_HEIGHT: f64 = 20.0;
const TOP: f64 = 60.0;
const BOTTOM: f64 = 60.0;
const BAR_COLOR: &str = "#87ceeb";

/// Render the pair scores as a standalone SVG document
pub fn render(report: &BatchReport) -> String {
    let rows = report.pairs.len().max(1) as f64;
    let plot_height = rows * ROW_HEIGHT;
    let height = TOP + plot_height + BOTTOM;
    let x0 = LABEL_WIDTH;
    let axis_y = TOP + plot_height;

    let mut svg = String::with_capacity(2048 + report.pairs.len() * 256);
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\" font-size=\"12\">\n",
        w = WIDTH,
        h = height
    ));
    svg.push_str(&format!(
        "  <rect width=\"{}\" height=\"{}\" fill=\"white\"/>\n",
        WIDTH, height
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"30\" text-anchor=\"middle\" font-size=\"16\">Pairwise File Similarity</text>\n",
        x0 + PLOT_WIDTH / 2.0
    ));

    // Grid + ticks
    for tick in (0..=100).step_by(20) {
        let x = x0 + PLOT_WIDTH * tick as f64 / 100.0;
        svg.push_str(&format!(
            "  <line x1=\"{x}\" y1=\"{}\" x2=\"{x}\" y2=\"{}\" stroke=\"#dddddd\"/>\n",
            TOP, axis_y
        ));
        svg.push_str(&format!(
            "  <text x=\"{x}\" y=\"{}\" text-anchor=\"middle\">{}</text>\n",
            axis_y + 16.0,
            tick
        ));
    }
    svg.push_str(&format!(
        "  <line x1=\"{x0}\" y1=\"{axis_y}\" x2=\"{}\" y2=\"{axis_y}\" stroke=\"black\"/>\n",
        x0 + PLOT_WIDTH
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\">Similarity (%)</text>\n",
        x0 + PLOT_WIDTH / 2.0,
        axis_y + 40.0
    ));

    if report.pairs.is_empty() {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" fill=\"#666666\">No pairs</text>\n",
            x0 + PLOT_WIDTH / 2.0,
            TOP + ROW_HEIGHT / 2.0 + 4.0
        ));
    }

    for (i, pair) in report.pairs.iter().enumerate() {
        let y = TOP + i as f64 * ROW_HEIGHT + (ROW_HEIGHT - BAR_HEIGHT) / 2.0;
        let bar = PLOT_WIDTH * pair.score.value() / 100.0;
        let label = format!("{} ↔ {}", pair.file_a, pair.file_b);
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"end\">{}</text>\n",
            x0 - 8.0,
            y + BAR_HEIGHT / 2.0 + 4.0,
            escape_xml(&label)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{x0}\" y=\"{y}\" width=\"{bar:.2}\" height=\"{BAR_HEIGHT}\" fill=\"{BAR_COLOR}\"><title>{}: {}%</title></rect>\n",
            escape_xml(&label),
            pair.score
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.2}\" y=\"{}\">{}</text>\n",
            x0 + bar + 4.0,
            y + BAR_HEIGHT / 2.0 + 4.0,
            pair.score
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::sample_report;

    #[test]
    fn test_one_bar_per_pair() {
        let svg = render(&sample_report());
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches(&format!("fill=\"{}\"", BAR_COLOR)).count(), 2);
        assert!(svg.contains("a.py ↔ b,c.py"));
        // 80% of the plot width
        assert!(svg.contains("width=\"480.00\""));
        assert!(svg.contains("Pairwise File Similarity"));
    }

    #[test]
    fn test_labels_escaped() {
        let mut report = sample_report();
        report.pairs[0].file_a = "<a&b>.py".into();
        let svg = render(&report);
        assert!(svg.contains("&lt;a&amp;b&gt;.py ↔ b,c.py"));
        assert!(!svg.contains("<a&b>"));
    }

    #[test]
    fn test_empty_chart() {
        let mut report = sample_report();
        report.pairs.clear();
        let svg = render(&report);
        assert!(svg.contains("No pairs"));
    }
}
