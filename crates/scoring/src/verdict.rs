//! Reduction of case metrics into per-variant and overall verdicts.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::metrics::{mean_or, CaseMetrics};

/// A variant passes only when its mean accuracy is strictly above this.
pub const ACCURACY_THRESHOLD: f64 = 0.95;
/// A variant passes only when its mean false-positive rate is strictly below this.
pub const FALSE_POSITIVE_THRESHOLD: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Success,
    Failed,
}

impl Status {
    pub fn from_means(mean_accuracy: f64, mean_false_positive_rate: f64) -> Self {
        if mean_accuracy > ACCURACY_THRESHOLD && mean_false_positive_rate < FALSE_POSITIVE_THRESHOLD {
            Status::Success
        } else {
            Status::Failed
        }
    }

    pub fn is_success(self) -> bool {
        self == Status::Success
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => write!(f, "SUCCESS"),
            Status::Failed => write!(f, "FAILED"),
        }
    }
}

/// Metrics of one case under one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseScore {
    pub name: String,
    pub path: PathBuf,
    pub metrics: CaseMetrics,
}

/// Aggregate verdict of one model variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariantVerdict {
    pub mean_accuracy: f64,
    pub mean_false_positive_rate: f64,
    pub status: Status,
    pub cases: usize,
}

/// Case scores of one variant, kept in case order.
#[derive(Debug, Clone, Default)]
pub struct VariantSummary {
    scores: Vec<CaseScore>,
}

impl VariantSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, score: CaseScore) {
        self.scores.push(score);
    }

    pub fn scores(&self) -> &[CaseScore] {
        &self.scores
    }

    /// Mean the case rates and apply the fixed thresholds.
    ///
    /// An empty summary uses the case-level conventions: accuracy 1.0,
    /// false-positive rate 0.0.
    pub fn verdict(&self) -> VariantVerdict {
        let accuracies: Vec<f64> = self.scores.iter().map(|s| s.metrics.accuracy).collect();
        let fps: Vec<f64> = self
            .scores
            .iter()
            .map(|s| s.metrics.false_positive_rate)
            .collect();

        let mean_accuracy = mean_or(&accuracies, 1.0);
        let mean_false_positive_rate = mean_or(&fps, 0.0);

        VariantVerdict {
            mean_accuracy,
            mean_false_positive_rate,
            status: Status::from_means(mean_accuracy, mean_false_positive_rate),
            cases: self.scores.len(),
        }
    }

    pub fn into_report(self, model: impl Into<String>) -> VariantReport {
        let verdict = self.verdict();
        VariantReport {
            model: model.into(),
            verdict,
            cases: self.scores,
        }
    }
}

impl FromIterator<CaseScore> for VariantSummary {
    fn from_iter<I: IntoIterator<Item = CaseScore>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

/// Everything known about one variant after its run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantReport {
    pub model: String,
    pub verdict: VariantVerdict,
    pub cases: Vec<CaseScore>,
}

/// Verdicts of every evaluated variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunVerdict {
    pub variants: Vec<VariantReport>,
}

impl RunVerdict {
    pub fn push(&mut self, report: VariantReport) {
        self.variants.push(report);
    }

    /// Failed as soon as any variant failed.
    pub fn overall(&self) -> Status {
        if self.variants.iter().all(|v| v.verdict.status.is_success()) {
            Status::Success
        } else {
            Status::Failed
        }
    }
}
