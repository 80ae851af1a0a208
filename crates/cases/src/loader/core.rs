//! Core [`CaseLoader`] struct: reads case definitions and locates samples.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use logeval_core::{CaseDefinition, TestCase};

use super::error::{CaseError, Result, SampleKind};

/// Filesystem-backed case loader.
///
/// Every case directory is expected to contain a YAML definition named
/// `case_file` and one `*.good` / `*.fail` sample pair.
#[derive(Debug, Clone)]
pub struct CaseLoader {
    case_file: String,
}

impl CaseLoader {
    pub fn new(case_file: impl Into<String>) -> Self {
        Self {
            case_file: case_file.into(),
        }
    }

    pub fn case_file(&self) -> &str {
        &self.case_file
    }

    /// Load the case stored in `dir`.
    pub fn load(&self, dir: &Path) -> Result<TestCase> {
        let definition = self.load_definition(&dir.join(&self.case_file))?;
        let good_sample = find_sample(dir, SampleKind::Good)?;
        let fail_sample = find_sample(dir, SampleKind::Fail)?;

        debug!(
            case = %dir.display(),
            anomalies = definition.anomalies.len(),
            threshold = ?definition.threshold,
            "loaded case"
        );

        Ok(TestCase {
            path: dir.to_path_buf(),
            good_sample,
            fail_sample,
            threshold: definition.threshold,
            anomalies: definition.anomalies,
        })
    }

    /// Parse a single YAML case definition file.
    pub fn load_definition(&self, path: &Path) -> Result<CaseDefinition> {
        let contents = fs::read_to_string(path).map_err(|source| CaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|source| CaseError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for CaseLoader {
    fn default() -> Self {
        Self::new(logeval_core::config::DEFAULT_CASE_FILE)
    }
}

/// First file in `dir` (sorted by name) with the sample's extension.
fn find_sample(dir: &Path, kind: SampleKind) -> Result<PathBuf> {
    let entries = fs::read_dir(dir).map_err(|source| CaseError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CaseError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e == kind.extension())
            .unwrap_or(false);
        if matches && path.is_file() {
            candidates.push(path);
        }
    }

    candidates.sort();
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| CaseError::MissingSample {
            dir: dir.to_path_buf(),
            kind,
        })
}
