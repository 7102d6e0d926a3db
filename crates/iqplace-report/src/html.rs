//! HTML analytics report.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined: summary
//! metrics, a CGPA vs IQ scatter plot, the prediction distribution, and the
//! full record table.

use std::path::Path;

use iqplace_core::report::SessionReport;
use iqplace_core::scorer::{IQ_CEILING, IQ_FLOOR};
use iqplace_core::statistics::SessionSummary;
use iqplace_core::store::SessionRecord;
use iqplace_core::traits::CGPA_MAX;

use crate::csv_export::TIMESTAMP_FORMAT;
use crate::error::ExportError;

const PLACED_COLOR: &str = "#10b981";
const NOT_PLACED_COLOR: &str = "#ef4444";

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.precision$}"))
}

/// Generate an HTML report from a session report.
pub fn generate_html(report: &SessionReport) -> Result<String, ExportError> {
    let raw_json = serde_json::to_string_pretty(report)?;
    let summary = &report.summary;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>iqplace report - session {}</title>\n",
        report.session_id
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str("<h1>iqplace report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Session <strong>{}</strong> | {} records | {}</p>\n",
        report.session_id,
        summary.count,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    if report.records.is_empty() {
        html.push_str("<p class=\"empty\">No predictions were made in this session.</p>\n");
        html.push_str("</body>\n</html>");
        return Ok(html);
    }

    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str(&summary_table(summary));
    if !summary.per_branch.is_empty() {
        html.push_str(&branch_table(summary));
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"charts\">\n");
    html.push_str("<h2>Visualizations</h2>\n");
    html.push_str("<div class=\"chart-row\">\n");
    html.push_str(&scatter_chart(&report.records));
    html.push_str(&distribution_chart(summary));
    html.push_str("</div>\n");
    html.push_str("</section>\n");

    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>All Records</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"records\">\n");
    html.push_str("<thead><tr>");
    for (i, header) in [
        "CGPA",
        "IQ",
        "Branch",
        "Year",
        "Prediction",
        "Confidence",
        "Dominant Factor",
        "Actual",
        "Time",
    ]
    .iter()
    .enumerate()
    {
        html.push_str(&format!("<th onclick=\"sortTable({i})\">{header}</th>"));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for r in &report.records {
        let class = if r.predicted_placement.is_placed() {
            "pass"
        } else {
            "fail"
        };
        html.push_str(&format!(
            "<tr><td>{:.2}</td><td>{:.1}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td><td>{:.1}%</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            r.cgpa,
            r.iq_score,
            html_escape(&r.branch.to_string()),
            html_escape(&r.year.to_string()),
            class,
            r.predicted_placement,
            r.confidence * 100.0,
            html_escape(&r.dominant_factor),
            r.actual_placement,
            r.timestamp.format(TIMESTAMP_FORMAT),
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(&raw_json));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    Ok(html)
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &SessionReport, path: &Path) -> Result<(), ExportError> {
    let html = generate_html(report)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    tracing::info!(path = %path.display(), "wrote HTML report");
    Ok(())
}

fn summary_table(summary: &SessionSummary) -> String {
    let agreement = match summary.agreement_rate {
        Some(rate) => format!("{:.1}% of {}", rate * 100.0, summary.labelled),
        None => "-".to_string(),
    };
    let rows = [
        ("Total Tests", summary.count.to_string()),
        ("Avg CGPA", fmt_opt(summary.mean_cgpa, 2)),
        ("Avg IQ", fmt_opt(summary.mean_iq, 1)),
        (
            "Predicted Placed",
            format!("{}/{}", summary.predicted_placed, summary.count),
        ),
        (
            "Placement Rate",
            format!("{:.1}%", summary.placement_rate * 100.0),
        ),
        (
            "Mean Confidence",
            summary
                .mean_confidence
                .map_or_else(|| "-".to_string(), |c| format!("{:.1}%", c * 100.0)),
        ),
        ("Agreement With Outcome", agreement),
    ];

    let mut out = String::from("<table class=\"summary\">\n<tbody>\n");
    for (label, value) in rows {
        out.push_str(&format!("<tr><th>{label}</th><td>{value}</td></tr>\n"));
    }
    out.push_str("</tbody></table>\n");
    out
}

fn branch_table(summary: &SessionSummary) -> String {
    let mut out = String::from("<table class=\"branches\">\n");
    out.push_str(
        "<thead><tr><th>Branch</th><th>Records</th><th>Avg CGPA</th><th>Avg IQ</th><th>Predicted Placed</th></tr></thead>\n<tbody>\n",
    );
    for (branch, stats) in &summary.per_branch {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.1}</td><td>{}</td></tr>\n",
            html_escape(branch),
            stats.count,
            stats.mean_cgpa,
            stats.mean_iq,
            stats.predicted_placed
        ));
    }
    out.push_str("</tbody></table>\n");
    out
}

/// CGPA on the x axis, IQ on the y axis, one dot per record.
fn scatter_chart(records: &[SessionRecord]) -> String {
    let width = 420.0;
    let height = 320.0;
    let margin = 40.0;
    let plot_w = width - 2.0 * margin;
    let plot_h = height - 2.0 * margin;

    let x = |cgpa: f64| margin + (cgpa / CGPA_MAX).clamp(0.0, 1.0) * plot_w;
    let y = |iq: f64| {
        let t = ((iq - IQ_FLOOR) / (IQ_CEILING - IQ_FLOOR)).clamp(0.0, 1.0);
        height - margin - t * plot_h
    };

    let mut svg = format!(
        "<svg class=\"scatter\" width=\"{width}\" height=\"{height}\" xmlns=\"http://www.w3.org/2000/svg\">\n"
    );
    svg.push_str("  <title>CGPA vs IQ Distribution</title>\n");
    svg.push_str(&format!(
        "  <line x1=\"{margin}\" y1=\"{b}\" x2=\"{r}\" y2=\"{b}\" stroke=\"currentColor\"/>\n",
        b = height - margin,
        r = width - margin
    ));
    svg.push_str(&format!(
        "  <line x1=\"{margin}\" y1=\"{margin}\" x2=\"{margin}\" y2=\"{b}\" stroke=\"currentColor\"/>\n",
        b = height - margin
    ));

    for tick in (0..=10).step_by(2) {
        let tx = x(tick as f64);
        svg.push_str(&format!(
            "  <text x=\"{tx:.1}\" y=\"{:.1}\" font-size=\"11\" fill=\"currentColor\" text-anchor=\"middle\">{tick}</text>\n",
            height - margin + 16.0
        ));
    }
    for tick in (70..=160).step_by(30) {
        let ty = y(tick as f64);
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{ty:.1}\" font-size=\"11\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{tick}</text>\n",
            margin - 6.0
        ));
    }
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\" font-weight=\"bold\" fill=\"currentColor\" text-anchor=\"middle\">CGPA</text>\n",
        width / 2.0,
        height - 6.0
    ));
    svg.push_str(&format!(
        "  <text x=\"12\" y=\"{:.1}\" font-size=\"12\" font-weight=\"bold\" fill=\"currentColor\" text-anchor=\"middle\" transform=\"rotate(-90 12 {:.1})\">IQ Score</text>\n",
        height / 2.0,
        height / 2.0
    ));

    for r in records {
        let color = if r.predicted_placement.is_placed() {
            PLACED_COLOR
        } else {
            NOT_PLACED_COLOR
        };
        svg.push_str(&format!(
            "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"6\" fill=\"{color}\" fill-opacity=\"0.6\" stroke=\"black\"/>\n",
            x(r.cgpa),
            y(r.iq_score)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Horizontal bars for placed / not placed counts.
fn distribution_chart(summary: &SessionSummary) -> String {
    let bar_height = 30;
    let max_width = 300;
    let padding = 10;
    let label_width = 110;

    let bars = [
        ("Placed", summary.predicted_placed, PLACED_COLOR),
        ("Not Placed", summary.predicted_not_placed, NOT_PLACED_COLOR),
    ];
    let total = summary.count.max(1) as f64;
    let total_height = bars.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg class=\"distribution\" width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 80,
        total_height
    );
    svg.push_str("  <title>Placement Prediction Distribution</title>\n");

    for (i, (label, count, color)) in bars.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let share = *count as f64 / total;
        let width = (share * max_width as f64) as usize;

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            label
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{} ({:.1}%)</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            count,
            share * 100.0
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta, .empty { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
table.summary { width: auto; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.results-table th { cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
.chart-row { display: flex; flex-wrap: wrap; gap: 2rem; align-items: flex-start; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('records');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const na = parseFloat(va), nb = parseFloat(vb);
    const cmp = !isNaN(na) && !isNaN(nb) ? na - nb : va.localeCompare(vb);
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use iqplace_core::model::{Branch, Placement, PlacementStatus, Year};

    fn record(cgpa: f64, iq: f64, placement: Placement, branch: Branch) -> SessionRecord {
        SessionRecord {
            cgpa,
            iq_score: iq,
            branch,
            year: Year::Third,
            predicted_placement: placement,
            confidence: 0.7,
            dominant_factor: "<IQ>".into(),
            actual_placement: PlacementStatus::Undecided,
            timestamp: Local::now(),
        }
    }

    fn make_test_report() -> SessionReport {
        SessionReport::new(
            uuid::Uuid::nil(),
            vec![
                record(8.5, 125.0, Placement::Placed, Branch::ComputerScience),
                record(5.9, 92.0, Placement::NotPlaced, Branch::Civil),
                record(7.4, 110.0, Placement::Placed, Branch::ComputerScience),
            ],
        )
    }

    #[test]
    fn html_report_contains_required_elements() {
        let report = make_test_report();
        let html = generate_html(&report).unwrap();

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("00000000-0000-0000-0000-000000000000"));
        assert!(html.contains("Computer Science"));
        assert!(html.contains("2/3"));
        assert!(html.contains("CGPA vs IQ Distribution"));
        assert!(html.contains("Placement Prediction Distribution"));
    }

    #[test]
    fn scatter_has_one_point_per_record() {
        let report = make_test_report();
        let svg = scatter_chart(&report.records);
        assert_eq!(svg.matches("<circle").count(), 3);
        assert_eq!(svg.matches(PLACED_COLOR).count(), 2);
    }

    #[test]
    fn predictor_labels_are_escaped() {
        let html = generate_html(&make_test_report()).unwrap();
        assert!(html.contains("&lt;IQ&gt;"));
        assert!(!html.contains("<IQ>"));
    }

    #[test]
    fn raw_data_block_holds_serialized_report() {
        let report = make_test_report();
        let html = generate_html(&report).unwrap();
        let expected = html_escape(&serde_json::to_string_pretty(&report).unwrap());
        assert!(html.contains(&format!("<pre><code>{expected}</code></pre>")));
        assert!(html.contains("&quot;session_id&quot;"));
    }

    #[test]
    fn empty_session_renders_placeholder() {
        let report = SessionReport::new(uuid::Uuid::nil(), vec![]);
        let html = generate_html(&report).unwrap();
        assert!(html.contains("No predictions were made"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn html_report_write_to_file() {
        let report = make_test_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");

        write_html_report(&report, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
