//! Subprocess detector: runs the `logreduce diff` command line tool.

use std::ffi::OsString;
use std::process::{Command, Stdio};

use tracing::warn;

use logeval_core::DetectionResult;

use crate::error::{DetectorError, Result};
use crate::request::DetectionRequest;
use crate::traits::Detector;

/// Runs the detector binary once per request and parses its JSON report.
///
/// The report is written to `/dev/stdout`, so stdout must carry nothing but
/// the JSON document. stderr is captured (and attached to errors) unless
/// `passthrough_stderr` is set, in which case it goes straight to the
/// terminal.
#[derive(Debug, Clone)]
pub struct LogreduceDetector {
    binary: String,
    passthrough_stderr: bool,
}

impl LogreduceDetector {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            passthrough_stderr: false,
        }
    }

    pub fn with_stderr_passthrough(mut self, enabled: bool) -> Self {
        self.passthrough_stderr = enabled;
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Arguments for `request`, without the binary itself.
    ///
    /// `--model-type` is a global option and goes before the subcommand.
    pub fn args(&self, request: &DetectionRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(16);
        if let Some(model) = request.model.model_type() {
            args.push("--model-type".into());
            args.push(model.into());
        }
        args.push("diff".into());
        args.push(request.good.clone().into_os_string());
        args.push(request.fail.clone().into_os_string());
        args.push("--json".into());
        args.push("/dev/stdout".into());
        args.push("--before-context".into());
        args.push(request.options.before_context.to_string().into());
        args.push("--after-context".into());
        args.push(request.options.after_context.to_string().into());
        args.push("--merge-distance".into());
        args.push(request.options.merge_distance.to_string().into());
        if let Some(threshold) = request.threshold {
            args.push("--threshold".into());
            args.push(threshold.to_string().into());
        }
        args
    }
}

impl Detector for LogreduceDetector {
    fn detect(&self, request: &DetectionRequest) -> Result<DetectionResult> {
        let stderr = if self.passthrough_stderr {
            Stdio::inherit()
        } else {
            Stdio::piped()
        };
        let output = Command::new(&self.binary)
            .args(self.args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(stderr)
            .output()
            .map_err(|source| DetectorError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        match DetectionResult::from_json(&output.stdout) {
            Ok(result) => {
                if !output.status.success() {
                    warn!(
                        status = %output.status,
                        fail = %request.fail.display(),
                        "detector exited with failure but produced a report"
                    );
                }
                Ok(result)
            }
            Err(source) => Err(DetectorError::Malformed {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                source,
            }),
        }
    }

    fn describe(&self, request: &DetectionRequest) -> String {
        let mut parts = vec![self.binary.clone()];
        parts.extend(
            self.args(request)
                .iter()
                .map(|a| a.to_string_lossy().into_owned()),
        );
        parts.join(" ")
    }
}
