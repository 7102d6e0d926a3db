//! Tabular CSV export of session records.
//!
//! One row per record, in store order, with the columns
//! `cgpa, iq, branch, year, predicted_placement, confidence,
//! actual_placement, timestamp`.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use iqplace_core::store::SessionRecord;

use crate::error::ExportError;

/// Timestamp layout used in exported rows (local time).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Serialize)]
struct Row {
    cgpa: f64,
    iq: f64,
    branch: String,
    year: String,
    predicted_placement: u8,
    confidence: f64,
    /// `1`, `0`, or empty when the outcome is not yet known.
    actual_placement: Option<u8>,
    timestamp: String,
}

impl From<&SessionRecord> for Row {
    fn from(record: &SessionRecord) -> Self {
        Self {
            cgpa: record.cgpa,
            iq: record.iq_score,
            branch: record.branch.to_string(),
            year: record.year.to_string(),
            predicted_placement: record.predicted_placement.as_flag(),
            confidence: record.confidence,
            actual_placement: record.actual_placement.outcome().map(|p| p.as_flag()),
            timestamp: record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Write records as CSV to any writer, header included.
pub fn write_csv<W: Write>(records: &[SessionRecord], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if records.is_empty() {
        // serde only emits the header alongside the first row
        csv_writer.write_record([
            "cgpa",
            "iq",
            "branch",
            "year",
            "predicted_placement",
            "confidence",
            "actual_placement",
            "timestamp",
        ])?;
    }
    for record in records {
        csv_writer.serialize(Row::from(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Render records as a CSV string.
pub fn to_csv_string(records: &[SessionRecord]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    String::from_utf8(buf)
        .map_err(|e| ExportError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Write records as CSV to a file, creating parent directories.
pub fn write_csv_file(records: &[SessionRecord], path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_csv(records, std::io::BufWriter::new(file))?;
    tracing::info!(path = %path.display(), rows = records.len(), "wrote CSV export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use iqplace_core::model::{Branch, Placement, PlacementStatus, Year};

    const HEADER: &str =
        "cgpa,iq,branch,year,predicted_placement,confidence,actual_placement,timestamp";

    fn record(cgpa: f64, iq: f64, actual: PlacementStatus) -> SessionRecord {
        SessionRecord {
            cgpa,
            iq_score: iq,
            branch: Branch::ComputerScience,
            year: Year::Fourth,
            predicted_placement: Placement::Placed,
            confidence: 0.82,
            dominant_factor: "CGPA".into(),
            actual_placement: actual,
            timestamp: Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap(),
        }
    }

    #[test]
    fn one_row_per_record_in_order() {
        let records = vec![
            record(8.1, 118.0, PlacementStatus::Placed),
            record(6.4, 97.5, PlacementStatus::NotPlaced),
            record(7.3, 104.2, PlacementStatus::Undecided),
        ];
        let csv = to_csv_string(&records).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], HEADER);
        assert_eq!(
            lines[1],
            "8.1,118.0,Computer Science,4th Year,1,0.82,1,2024-03-09 14:05:00"
        );
        assert!(lines[2].starts_with("6.4,97.5,"));
        assert!(lines[2].contains(",0.82,0,"));
        assert!(lines[3].starts_with("7.3,104.2,"));
        assert!(lines[3].contains(",0.82,,2024-03-09"));
    }

    #[test]
    fn empty_export_has_header_only() {
        let csv = to_csv_string(&[]).unwrap();
        assert_eq!(csv.trim_end(), HEADER);
    }

    #[test]
    fn readable_by_csv_reader() {
        let records = vec![record(9.0, 131.4, PlacementStatus::Undecided)];
        let csv = to_csv_string(&records).unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 8);
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[1], "131.4");
        assert_eq!(&row[6], "");
    }

    #[test]
    fn writes_file_in_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("records.csv");
        write_csv_file(&[record(7.0, 100.0, PlacementStatus::Placed)], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
