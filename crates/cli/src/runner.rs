//! Run driver: evaluates every case under every model variant.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info};

use logeval_cases::CaseLoader;
use logeval_core::TestCase;
use logeval_detector::{DetectionRequest, Detector, ModelVariant};
use logeval_scoring::{
    match_anomalies, CaseMetrics, CaseScore, RunVerdict, VariantReport, VariantSummary,
};

use crate::report;

/// Settings of one harness run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Log detector commands, missed anomalies and false positives.
    pub debug: bool,
    /// Cases evaluated concurrently; 1 keeps the run strictly sequential.
    pub jobs: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { debug: false, jobs: 1 }
    }
}

pub struct Runner<D> {
    detector: D,
    loader: CaseLoader,
    options: RunOptions,
}

impl<D: Detector> Runner<D> {
    pub fn new(detector: D, loader: CaseLoader, options: RunOptions) -> Self {
        Self {
            detector,
            loader,
            options,
        }
    }

    /// Load every case directory up front so corpus defects abort the run
    /// before the detector is invoked.
    pub fn load_cases(&self, dirs: &[PathBuf]) -> Result<Vec<TestCase>> {
        dirs.iter()
            .map(|dir| {
                self.loader
                    .load(dir)
                    .with_context(|| format!("failed to load case {}", dir.display()))
            })
            .collect()
    }

    /// Evaluate `cases` under each of `models`, writing report lines to `out`.
    pub fn run<W: Write>(
        &self,
        models: &[ModelVariant],
        cases: &[TestCase],
        out: &mut W,
    ) -> Result<RunVerdict> {
        let pool = if self.options.jobs > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(self.options.jobs)
                    .build()
                    .context("failed to build worker pool")?,
            )
        } else {
            None
        };

        let mut verdict = RunVerdict::default();
        for model in models {
            info!(model = %model, cases = cases.len(), "evaluating variant");

            let summary = match &pool {
                Some(pool) => {
                    // Results come back in case order regardless of completion order.
                    let scores = pool.install(|| {
                        cases
                            .par_iter()
                            .map(|case| self.evaluate(case, model))
                            .collect::<Result<Vec<_>>>()
                    })?;
                    for score in &scores {
                        writeln!(out, "{}", report::case_line(model, score))?;
                    }
                    scores.into_iter().collect::<VariantSummary>()
                }
                None => {
                    let mut summary = VariantSummary::new();
                    for case in cases {
                        let score = self.evaluate(case, model)?;
                        writeln!(out, "{}", report::case_line(model, &score))?;
                        summary.push(score);
                    }
                    summary
                }
            };

            let variant: VariantReport = summary.into_report(model.name());
            writeln!(out, "{}", report::variant_line(&variant))?;
            verdict.push(variant);
        }

        Ok(verdict)
    }

    /// Run the detector on one case and score its output.
    pub fn evaluate(&self, case: &TestCase, model: &ModelVariant) -> Result<CaseScore> {
        let request = DetectionRequest::for_case(case, model);
        if self.options.debug {
            info!("Running [{}]", self.detector.describe(&request));
        }

        let result = self
            .detector
            .detect(&request)
            .with_context(|| format!("detector failed on case {}", case.path.display()))?;

        let outcome = match_anomalies(&case.anomalies, &result);
        let metrics = CaseMetrics::score(&case.anomalies, &outcome, &result);

        if self.options.debug {
            for anomaly in outcome.missed_required(&case.anomalies) {
                info!(case = %case.name(), "Didn't catch anomaly: [{}]", anomaly.needle());
            }
            for fp in outcome.false_positives(&result) {
                info!(case = %case.name(), file = fp.file, "False positive found: [{}]", fp.line);
            }
        }
        debug!(
            case = %case.name(),
            model = %model,
            accuracy = metrics.accuracy,
            false_positive_rate = metrics.false_positive_rate,
            "case scored"
        );

        Ok(CaseScore {
            name: case.name(),
            path: case.path.clone(),
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;

    use logeval_core::DetectionResult;
    use logeval_detector::DetectorError;
    use logeval_scoring::Status;
    use tempfile::TempDir;

    /// Serves canned results keyed by the fail sample's path.
    #[derive(Default)]
    struct CannedDetector {
        results: HashMap<PathBuf, String>,
        calls: Mutex<Vec<DetectionRequest>>,
    }

    impl CannedDetector {
        fn with(mut self, fail: PathBuf, raw: &str) -> Self {
            self.results.insert(fail, raw.to_string());
            self
        }

        fn calls(&self) -> Vec<DetectionRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Detector for CannedDetector {
        fn detect(&self, request: &DetectionRequest) -> logeval_detector::Result<DetectionResult> {
            self.calls.lock().unwrap().push(request.clone());
            let raw = self.results.get(&request.fail).cloned().unwrap_or_default();
            DetectionResult::from_json(raw.as_bytes()).map_err(|source| DetectorError::Malformed {
                stdout: raw,
                stderr: String::new(),
                source,
            })
        }
    }

    fn write_case(root: &Path, name: &str, yaml: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("inf.yaml"), yaml).unwrap();
        fs::write(dir.join("job.good"), "").unwrap();
        fs::write(dir.join("job.fail"), "").unwrap();
        dir
    }

    const PANIC_YAML: &str = "anomalies:\n  - line: kernel panic\n";
    const PANIC_JSON: &str = r#"{"files": {"a.log": {"lines": ["ok", "kernel panic: oops"], "scores": [[0,0.1],[1,0.9]]}}}"#;
    const OOM_YAML: &str = "threshold: 0.4\nanomalies:\n  - line: OOM\n  - line: watchdog\n    optional: true\n";
    const OOM_JSON: &str = r#"{"files": {"syslog": {"lines": ["OOM killer"], "scores": [[7, 1.0]]}}}"#;

    fn corpus() -> (TempDir, Vec<PathBuf>, CannedDetector) {
        let root = TempDir::new().expect("create tempdir");
        let panic = write_case(root.path(), "kernel-panic", PANIC_YAML);
        let oom = write_case(root.path(), "oom", OOM_YAML);
        let detector = CannedDetector::default()
            .with(panic.join("job.fail"), PANIC_JSON)
            .with(oom.join("job.fail"), OOM_JSON);
        (root, vec![panic, oom], detector)
    }

    fn run_corpus(options: RunOptions, models: &[ModelVariant]) -> (RunVerdict, String, Vec<DetectionRequest>) {
        let (_root, dirs, detector) = corpus();
        let runner = Runner::new(&detector, CaseLoader::default(), options);
        let cases = runner.load_cases(&dirs).unwrap();

        let mut out = Vec::new();
        let verdict = runner.run(models, &cases, &mut out).unwrap();
        (verdict, String::from_utf8(out).unwrap(), detector.calls())
    }

    #[test]
    fn sequential_run_reports_cases_and_variant() {
        let (verdict, out, calls) = run_corpus(RunOptions::default(), &[ModelVariant::Default]);

        let lines: Vec<_> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "        kernel-panic: 100.00% accuracy, 50.00% false-positive",
                "                 oom: 100.00% accuracy, 0.00% false-positive",
                "default: FAILED: 100.00% accuracy, 25.00% false-positive",
            ]
        );

        // 25% false positives is not strictly below the threshold.
        assert_eq!(verdict.overall(), Status::Failed);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].threshold, Some(0.4));
        assert!(calls.iter().all(|c| c.model == ModelVariant::Default));
    }

    #[test]
    fn every_variant_sees_every_case() {
        let models = [
            ModelVariant::Default,
            ModelVariant::Named("hashing_nn".into()),
        ];
        let (verdict, out, calls) = run_corpus(RunOptions::default(), &models);

        assert_eq!(verdict.variants.len(), 2);
        assert_eq!(verdict.variants[1].model, "hashing_nn");
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[2].model, ModelVariant::Named("hashing_nn".into()));
        assert!(out.contains("hashing_nn:         kernel-panic: 100.00% accuracy"));
        assert!(out.contains("hashing_nn: FAILED:"));
    }

    #[test]
    fn parallel_run_matches_sequential() {
        let (seq_verdict, seq_out, _) = run_corpus(RunOptions::default(), &[ModelVariant::Default]);
        let (par_verdict, par_out, _) = run_corpus(
            RunOptions { debug: true, jobs: 4 },
            &[ModelVariant::Default],
        );

        assert_eq!(seq_out, par_out);
        assert_eq!(seq_verdict.variants[0].verdict, par_verdict.variants[0].verdict);
        let names = |v: &RunVerdict| -> Vec<String> {
            v.variants[0].cases.iter().map(|c| c.name.clone()).collect()
        };
        assert_eq!(names(&seq_verdict), names(&par_verdict));
    }

    #[test]
    fn malformed_detector_output_aborts() {
        let root = TempDir::new().expect("create tempdir");
        let dir = write_case(root.path(), "broken", PANIC_YAML);
        let detector = CannedDetector::default().with(dir.join("job.fail"), "Traceback: boom");
        let runner = Runner::new(&detector, CaseLoader::default(), RunOptions::default());
        let cases = runner.load_cases(&[dir]).unwrap();

        let mut out = Vec::new();
        let err = runner
            .run(&[ModelVariant::Default], &cases, &mut out)
            .unwrap_err();
        assert!(format!("{err:#}").contains("Traceback: boom"));
        assert!(out.is_empty());
    }

    #[test]
    fn missing_sample_fails_before_detection() {
        let root = TempDir::new().expect("create tempdir");
        let dir = write_case(root.path(), "nogood", PANIC_YAML);
        fs::remove_file(dir.join("job.good")).unwrap();

        let detector = CannedDetector::default();
        let runner = Runner::new(&detector, CaseLoader::default(), RunOptions::default());
        assert!(runner.load_cases(&[dir]).is_err());
        assert!(detector.calls().is_empty());
    }
}
