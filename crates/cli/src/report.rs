//! Human-readable and JSON rendering of run results.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use logeval_detector::ModelVariant;
use logeval_scoring::{CaseScore, RunVerdict, Status, VariantReport};

/// `"{model}: {name:>20}: 100.00% accuracy, 50.00% false-positive"`.
///
/// The model prefix is omitted for the default variant.
pub fn case_line(model: &ModelVariant, score: &CaseScore) -> String {
    let prefix = if model.is_default() {
        String::new()
    } else {
        format!("{}: ", model)
    };
    format!(
        "{}{:>20}: {:03.2}% accuracy, {:03.2}% false-positive",
        prefix,
        score.name,
        score.metrics.accuracy * 100.0,
        score.metrics.false_positive_rate * 100.0
    )
}

/// `"{model}: SUCCESS: 97.50% accuracy, 12.00% false-positive"`.
pub fn variant_line(report: &VariantReport) -> String {
    format!(
        "{}: {}: {:03.2}% accuracy, {:03.2}% false-positive",
        report.model,
        report.verdict.status,
        report.verdict.mean_accuracy * 100.0,
        report.verdict.mean_false_positive_rate * 100.0
    )
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    status: Status,
    variants: &'a [VariantReport],
}

/// Write `verdict` as pretty JSON to `path`.
pub fn write_json(path: &Path, verdict: &RunVerdict) -> Result<()> {
    let report = JsonReport {
        generated_at: Utc::now(),
        status: verdict.overall(),
        variants: &verdict.variants,
    };
    let json = serde_json::to_string_pretty(&report).context("failed to serialize run report")?;
    fs::write(path, json).with_context(|| format!("failed to write report: {}", path.display()))?;
    Ok(())
}
