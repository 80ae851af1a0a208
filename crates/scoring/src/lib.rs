//! Scoring of detector output against expected anomalies.
//!
//! This crate provides:
//! - The match engine reconciling expected anomaly text with scored lines
//! - Case-level accuracy and false-positive rates
//! - Per-model-variant and overall pass/fail verdicts

pub mod matcher;
pub mod metrics;
pub mod verdict;

pub use matcher::{match_anomalies, FalsePositive, MatchOutcome};
pub use metrics::{mean_or, CaseMetrics};
pub use verdict::{
    CaseScore, RunVerdict, Status, VariantReport, VariantSummary, VariantVerdict,
    ACCURACY_THRESHOLD, FALSE_POSITIVE_THRESHOLD,
};
