//! Append-only record of completed predictions for one session.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::model::{Branch, Placement, PlacementStatus, Year};
use crate::statistics::{compute_summary, SessionSummary};

/// One completed prediction cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub cgpa: f64,
    pub iq_score: f64,
    pub branch: Branch,
    pub year: Year,
    pub predicted_placement: Placement,
    pub confidence: f64,
    /// Label reported by the predictor; not part of the tabular export.
    #[serde(default)]
    pub dominant_factor: String,
    /// Ground truth as entered by the user.
    #[serde(default)]
    pub actual_placement: PlacementStatus,
    pub timestamp: DateTime<Local>,
}

/// Ordered, append-only record store.
///
/// Aggregates are computed from the current contents on every call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionRecordStore {
    records: Vec<SessionRecord>,
}

impl SessionRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: SessionRecord) {
        self.records.push(record);
    }

    /// All records in append order.
    pub fn all(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Mean CGPA, or `None` for an empty store.
    pub fn mean_cgpa(&self) -> Option<f64> {
        mean(self.records.iter().map(|r| r.cgpa))
    }

    /// Mean IQ estimate, or `None` for an empty store.
    pub fn mean_iq(&self) -> Option<f64> {
        mean(self.records.iter().map(|r| r.iq_score))
    }

    /// Number of records predicted as placed.
    pub fn predicted_placed(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.predicted_placement.is_placed())
            .count()
    }

    pub fn summary(&self) -> SessionSummary {
        compute_summary(&self.records)
    }
}

pub(crate) fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cgpa: f64, iq: f64, placement: Placement) -> SessionRecord {
        SessionRecord {
            cgpa,
            iq_score: iq,
            branch: Branch::ComputerScience,
            year: Year::Fourth,
            predicted_placement: placement,
            confidence: 0.75,
            dominant_factor: "CGPA".into(),
            actual_placement: PlacementStatus::Undecided,
            timestamp: Local::now(),
        }
    }

    #[test]
    fn empty_store_has_no_means() {
        let store = SessionRecordStore::new();
        assert!(store.is_empty());
        assert_eq!(store.count(), 0);
        assert_eq!(store.mean_cgpa(), None);
        assert_eq!(store.mean_iq(), None);
        assert_eq!(store.predicted_placed(), 0);
    }

    #[test]
    fn aggregates_reflect_current_contents() {
        let mut store = SessionRecordStore::new();
        store.append(record(8.0, 120.0, Placement::Placed));
        assert_eq!(store.mean_cgpa(), Some(8.0));

        store.append(record(6.0, 100.0, Placement::NotPlaced));
        assert_eq!(store.count(), 2);
        assert_eq!(store.mean_cgpa(), Some(7.0));
        assert_eq!(store.mean_iq(), Some(110.0));
        assert_eq!(store.predicted_placed(), 1);

        store.append(record(9.0, 140.0, Placement::Placed));
        assert_eq!(store.predicted_placed(), 2);
        assert_eq!(store.mean_iq(), Some(120.0));
    }

    #[test]
    fn records_keep_append_order() {
        let mut store = SessionRecordStore::new();
        for cgpa in [5.0, 9.0, 7.0] {
            store.append(record(cgpa, 100.0, Placement::NotPlaced));
        }
        let cgpas: Vec<f64> = store.all().iter().map(|r| r.cgpa).collect();
        assert_eq!(cgpas, vec![5.0, 9.0, 7.0]);
    }
}
