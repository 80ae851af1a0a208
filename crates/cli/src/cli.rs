use std::path::PathBuf;

use clap::Parser;

use logeval_core::EvalConfig;
use logeval_detector::ModelVariant;

use crate::runner::RunOptions;

/// Regression harness for the logreduce anomaly detector.
///
/// Runs the detector on every case directory, compares its output with the
/// expected anomalies and reports accuracy and false-positive rates per case
/// and per model variant. Exits non-zero when any variant fails.
#[derive(Parser, Debug)]
#[command(name = "logeval", version, about = "Regression harness for the logreduce anomaly detector")]
pub struct CliArgs {
    /// Print the detector command, missed anomalies and false positives
    #[arg(long)]
    pub debug: bool,

    /// Model variant to evaluate (repeatable; default: the detector's default model)
    #[arg(long = "model-type", value_name = "MODEL")]
    pub model_type: Vec<String>,

    /// Detector executable (overrides LOGEVAL_DETECTOR_BIN)
    #[arg(long)]
    pub detector: Option<String>,

    /// Case definition file name inside each case directory (overrides LOGEVAL_CASE_FILE)
    #[arg(long)]
    pub case_file: Option<String>,

    /// Number of cases evaluated concurrently (overrides LOGEVAL_JOBS)
    #[arg(long, short = 'j')]
    pub jobs: Option<usize>,

    /// Write the run verdict as JSON to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Case directory glob patterns (default: LOGEVAL_CASES or "tests/*")
    pub cases: Vec<String>,
}

impl CliArgs {
    /// Variants in the order given; the implicit default variant when none.
    pub fn models(&self) -> Vec<ModelVariant> {
        if self.model_type.is_empty() {
            return vec![ModelVariant::Default];
        }
        self.model_type
            .iter()
            .map(|m| m.parse::<ModelVariant>().unwrap_or_default())
            .collect()
    }

    pub fn patterns(&self, config: &EvalConfig) -> Vec<String> {
        if self.cases.is_empty() {
            vec![config.default_cases.clone()]
        } else {
            self.cases.clone()
        }
    }

    pub fn detector_bin(&self, config: &EvalConfig) -> String {
        self.detector
            .clone()
            .unwrap_or_else(|| config.detector_bin.clone())
    }

    pub fn case_file(&self, config: &EvalConfig) -> String {
        self.case_file
            .clone()
            .unwrap_or_else(|| config.case_file.clone())
    }

    pub fn run_options(&self, config: &EvalConfig) -> RunOptions {
        RunOptions {
            debug: self.debug,
            jobs: self.jobs.unwrap_or(config.jobs).max(1),
        }
    }
}
