//! Session report and its JSON loader.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::statistics::{compute_summary, SessionSummary};
use crate::store::SessionRecord;

/// A snapshot of one session's records and their summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// The session the records came from.
    pub session_id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Records in append order.
    pub records: Vec<SessionRecord>,
    /// Aggregates computed when the report was created.
    pub summary: SessionSummary,
}

impl SessionReport {
    pub fn new(session_id: Uuid, records: Vec<SessionRecord>) -> Self {
        let summary = compute_summary(&records);
        Self {
            session_id,
            created_at: Utc::now(),
            records,
            summary,
        }
    }

    /// Load a report from a JSON file.
    ///
    /// The summary is recomputed from the loaded records.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let mut report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        report.summary = compute_summary(&report.records);
        Ok(report)
    }
}
