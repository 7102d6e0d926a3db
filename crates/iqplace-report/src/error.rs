use thiserror::Error;

/// Errors that can occur while exporting session records.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown export format '{0}' (expected csv, json, html or all)")]
    UnknownFormat(String),
}
