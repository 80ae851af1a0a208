//! Error types for case discovery and loading.

use std::fmt;
use std::path::PathBuf;

/// Errors that can occur while resolving or loading cases.
///
/// All of them are corpus defects: the run aborts instead of skipping the case.
#[derive(Debug, thiserror::Error)]
pub enum CaseError {
    /// Filesystem I/O error.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse/deserialization error.
    #[error("YAML parse error in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A case pattern is not a valid glob.
    #[error("invalid case pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A case pattern matched no case directory.
    #[error("{pattern}: no file found")]
    NoMatch { pattern: String },

    /// The case directory has no sample of the given kind.
    #[error("{}: no *.{kind} sample found", dir.display())]
    MissingSample { dir: PathBuf, kind: SampleKind },
}

/// Result alias for case operations.
pub type Result<T> = std::result::Result<T, CaseError>;

/// The two log samples compared for every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    Good,
    Fail,
}

impl SampleKind {
    pub fn extension(self) -> &'static str {
        match self {
            SampleKind::Good => "good",
            SampleKind::Fail => "fail",
        }
    }
}

impl fmt::Display for SampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
