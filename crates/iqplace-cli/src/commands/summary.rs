//! The `iqplace summary` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use iqplace_core::report::SessionReport;
use iqplace_core::statistics::SessionSummary;
use iqplace_core::store::SessionRecord;

pub fn execute(report_path: PathBuf) -> Result<()> {
    let report = SessionReport::load_json(&report_path)?;

    println!("Session: {}", report.session_id);
    println!(
        "Created: {}",
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    if report.records.is_empty() {
        println!("\nNo predictions recorded in this session.");
        return Ok(());
    }

    println!("\n{}", summary_table(&report.summary));
    if report.summary.per_branch.len() > 1 {
        println!("\n{}", branch_table(&report.summary));
    }
    println!("\n{}", records_table(&report.records));

    Ok(())
}

pub fn summary_table(summary: &SessionSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Total Tests",
        "Avg CGPA",
        "Avg IQ",
        "Predicted Placed",
        "Mean Confidence",
        "Agreement",
    ]);
    table.add_row(vec![
        Cell::new(summary.count),
        Cell::new(
            summary
                .mean_cgpa
                .map_or_else(|| "-".to_string(), |v| format!("{v:.2}")),
        ),
        Cell::new(
            summary
                .mean_iq
                .map_or_else(|| "-".to_string(), |v| format!("{v:.1}")),
        ),
        Cell::new(format!("{}/{}", summary.predicted_placed, summary.count)),
        Cell::new(
            summary
                .mean_confidence
                .map_or_else(|| "-".to_string(), |v| format!("{:.1}%", v * 100.0)),
        ),
        Cell::new(match summary.agreement_rate {
            Some(rate) => format!("{:.1}% ({} known)", rate * 100.0, summary.labelled),
            None => "-".to_string(),
        }),
    ]);
    table
}

fn branch_table(summary: &SessionSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Branch", "Records", "Avg CGPA", "Avg IQ", "Placed"]);
    for (branch, stats) in &summary.per_branch {
        table.add_row(vec![
            Cell::new(branch),
            Cell::new(stats.count),
            Cell::new(format!("{:.2}", stats.mean_cgpa)),
            Cell::new(format!("{:.1}", stats.mean_iq)),
            Cell::new(stats.predicted_placed),
        ]);
    }
    table
}

fn records_table(records: &[SessionRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "CGPA",
        "IQ",
        "Branch",
        "Year",
        "Prediction",
        "Confidence",
        "Actual",
        "Time",
    ]);
    for r in records {
        table.add_row(vec![
            Cell::new(format!("{:.2}", r.cgpa)),
            Cell::new(format!("{:.1}", r.iq_score)),
            Cell::new(r.branch),
            Cell::new(r.year),
            Cell::new(r.predicted_placement),
            Cell::new(format!("{:.1}%", r.confidence * 100.0)),
            Cell::new(r.actual_placement),
            Cell::new(r.timestamp.format("%Y-%m-%d %H:%M:%S")),
        ]);
    }
    table
}
