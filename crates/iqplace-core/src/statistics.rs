//! Aggregate statistics over session records.
//!
//! Everything here is a pure function of the records passed in; nothing is
//! cached between calls.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::{mean, SessionRecord};

/// Summary of all records in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Number of completed predictions.
    pub count: usize,
    pub mean_cgpa: Option<f64>,
    pub mean_iq: Option<f64>,
    /// Records predicted as placed.
    pub predicted_placed: usize,
    /// Records predicted as not placed.
    pub predicted_not_placed: usize,
    /// `predicted_placed / count`, or 0 for an empty session.
    pub placement_rate: f64,
    pub mean_confidence: Option<f64>,
    /// Records whose ground truth is known.
    pub labelled: usize,
    /// Fraction of labelled records where the prediction matched.
    pub agreement_rate: Option<f64>,
    /// Per-branch breakdown, keyed by branch label.
    pub per_branch: BTreeMap<String, BranchStats>,
}

/// Statistics for the records of one branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchStats {
    pub count: usize,
    pub mean_cgpa: f64,
    pub mean_iq: f64,
    pub predicted_placed: usize,
}

/// Compute the session summary from records.
pub fn compute_summary(records: &[SessionRecord]) -> SessionSummary {
    let count = records.len();
    let predicted_placed = records
        .iter()
        .filter(|r| r.predicted_placement.is_placed())
        .count();

    let placement_rate = if count == 0 {
        0.0
    } else {
        predicted_placed as f64 / count as f64
    };

    // Agreement is only meaningful where the user reported an outcome
    let labelled: Vec<_> = records
        .iter()
        .filter_map(|r| r.actual_placement.outcome().map(|o| (r, o)))
        .collect();
    let agreement_rate = if labelled.is_empty() {
        None
    } else {
        let agreed = labelled
            .iter()
            .filter(|(r, outcome)| r.predicted_placement == *outcome)
            .count();
        Some(agreed as f64 / labelled.len() as f64)
    };

    let mut grouped: BTreeMap<String, Vec<&SessionRecord>> = BTreeMap::new();
    for r in records {
        grouped.entry(r.branch.to_string()).or_default().push(r);
    }
    let per_branch = grouped
        .into_iter()
        .map(|(branch, group)| {
            let n = group.len() as f64;
            let stats = BranchStats {
                count: group.len(),
                mean_cgpa: group.iter().map(|r| r.cgpa).sum::<f64>() / n,
                mean_iq: group.iter().map(|r| r.iq_score).sum::<f64>() / n,
                predicted_placed: group
                    .iter()
                    .filter(|r| r.predicted_placement.is_placed())
                    .count(),
            };
            (branch, stats)
        })
        .collect();

    SessionSummary {
        count,
        mean_cgpa: mean(records.iter().map(|r| r.cgpa)),
        mean_iq: mean(records.iter().map(|r| r.iq_score)),
        predicted_placed,
        predicted_not_placed: count - predicted_placed,
        placement_rate,
        mean_confidence: mean(records.iter().map(|r| r.confidence)),
        labelled: labelled.len(),
        agreement_rate,
        per_branch,
    }
}
