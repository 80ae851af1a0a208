//! Case-level accuracy and false-positive rates.

use serde::{Deserialize, Serialize};

use logeval_core::{DetectionResult, ExpectedAnomaly};

use crate::matcher::MatchOutcome;

/// Arithmetic mean of `values`, or `empty` when there are none.
pub fn mean_or(values: &[f64], empty: f64) -> f64 {
    if values.is_empty() {
        empty
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Quality of one detector run on one case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaseMetrics {
    /// Fraction of required anomalies found; 1.0 when none are required.
    pub accuracy: f64,
    /// Fraction of scored lines not credited to an anomaly; 0.0 when nothing was scored.
    pub false_positive_rate: f64,
    pub required: usize,
    pub found_required: usize,
    pub scored_lines: usize,
    pub false_positives: usize,
}

impl CaseMetrics {
    /// Score a match outcome.
    ///
    /// Optional anomalies are left out of accuracy entirely, found or not.
    /// Every scored line of every file counts toward the false-positive
    /// rate, whatever its score.
    pub fn score(
        anomalies: &[ExpectedAnomaly],
        outcome: &MatchOutcome,
        result: &DetectionResult,
    ) -> Self {
        let required_hits: Vec<f64> = anomalies
            .iter()
            .enumerate()
            .filter(|(_, a)| !a.optional)
            .map(|(idx, _)| if outcome.is_found(idx) { 1.0 } else { 0.0 })
            .collect();

        let line_flags: Vec<f64> = result
            .files
            .iter()
            .flat_map(|(name, file)| {
                file.scored_lines()
                    .map(move |(_, position)| (name.as_str(), position))
            })
            .map(|(name, position)| {
                if outcome.is_matched(name, position) {
                    0.0
                } else {
                    1.0
                }
            })
            .collect();

        Self {
            accuracy: mean_or(&required_hits, 1.0),
            false_positive_rate: mean_or(&line_flags, 0.0),
            required: required_hits.len(),
            found_required: required_hits.iter().filter(|&&v| v > 0.0).count(),
            scored_lines: line_flags.len(),
            false_positives: line_flags.iter().filter(|&&v| v > 0.0).count(),
        }
    }
}
