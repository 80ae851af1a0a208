use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One expected anomalous log line of a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedAnomaly {
    /// Text that must be contained in a scored line.
    pub line: String,
    /// Optional anomalies never count against accuracy.
    #[serde(default)]
    pub optional: bool,
    /// Which sample file the line is expected in. Recorded, not used for matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl ExpectedAnomaly {
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            optional: false,
            filename: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// The matching text: `line` with a single trailing newline removed.
    ///
    /// YAML block scalars (`line: |`) keep their final newline, which would
    /// otherwise never be contained in a detector line.
    pub fn needle(&self) -> &str {
        self.line.strip_suffix('\n').unwrap_or(&self.line)
    }
}

/// Contents of a case definition file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseDefinition {
    /// Detector threshold override for this case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub anomalies: Vec<ExpectedAnomaly>,
}

/// A fully resolved case: definition plus the two samples to compare.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    /// Case directory, used as the case identity.
    pub path: PathBuf,
    pub good_sample: PathBuf,
    pub fail_sample: PathBuf,
    pub threshold: Option<f64>,
    pub anomalies: Vec<ExpectedAnomaly>,
}

impl TestCase {
    /// Short display name (the directory's base name).
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn required_count(&self) -> usize {
        self.anomalies.iter().filter(|a| !a.optional).count()
    }
}
