//! iqplace-report: Export of session records.
//!
//! CSV for spreadsheets, JSON for reloading with `iqplace summary`, and a
//! self-contained HTML analytics page.

pub mod csv_export;
pub mod error;
pub mod html;

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use iqplace_core::report::SessionReport;

pub use csv_export::{to_csv_string, write_csv, write_csv_file};
pub use error::ExportError;
pub use html::{generate_html, write_html_report};

/// An export target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Json,
    Html,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Html];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "html" => Ok(ExportFormat::Html),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Parse a comma-separated format list such as `csv,html` or `all`.
///
/// Duplicates are dropped; order of first appearance is kept.
pub fn parse_formats(list: &str) -> Result<Vec<ExportFormat>, ExportError> {
    if list.trim().eq_ignore_ascii_case("all") {
        return Ok(ExportFormat::ALL.to_vec());
    }
    let mut formats = Vec::new();
    for part in list.split(',').filter(|p| !p.trim().is_empty()) {
        let format: ExportFormat = part.parse()?;
        if !formats.contains(&format) {
            formats.push(format);
        }
    }
    Ok(formats)
}

/// Write the report as pretty-printed JSON.
pub fn write_json_report(report: &SessionReport, path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;
    tracing::info!(path = %path.display(), "wrote JSON report");
    Ok(())
}

/// Export a session in each requested format into `dir`.
///
/// Files are named `session-<id>.<ext>`. Returns the written paths.
pub fn export_session(
    report: &SessionReport,
    dir: &Path,
    formats: &[ExportFormat],
) -> Result<Vec<PathBuf>, ExportError> {
    let stem = format!("session-{}", report.session_id.simple());
    let mut written = Vec::with_capacity(formats.len());
    for format in formats {
        let path = dir.join(format!("{stem}.{}", format.extension()));
        match format {
            ExportFormat::Csv => write_csv_file(&report.records, &path)?,
            ExportFormat::Json => write_json_report(report, &path)?,
            ExportFormat::Html => write_html_report(report, &path)?,
        }
        written.push(path);
    }
    Ok(written)
}
