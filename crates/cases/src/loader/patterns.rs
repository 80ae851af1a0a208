//! Expansion of case-directory glob patterns.

use std::path::{Component, PathBuf};

use tracing::{debug, warn};

use super::error::{CaseError, Result};

/// Expand every pattern into case directories.
///
/// Directories come out in argument order, then in the glob's sorted order
/// within each pattern. Matched paths that are not directories are skipped.
/// The first pattern that yields no case directory fails the whole
/// resolution, so nothing is evaluated against a partial or empty corpus.
pub fn resolve_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let paths = glob::glob(pattern).map_err(|source| CaseError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let mut matched = 0usize;
        for entry in paths {
            let path = entry.map_err(|e| CaseError::Io {
                path: e.path().to_path_buf(),
                source: e.into_error(),
            })?;
            if !path.is_dir() {
                warn!(path = %path.display(), "skipping non-directory case path");
                continue;
            }
            matched += 1;
            dirs.push(normalize(path));
        }

        if matched == 0 {
            return Err(CaseError::NoMatch {
                pattern: pattern.to_string(),
            });
        }
        debug!(pattern, matched, "resolved case pattern");
    }

    Ok(dirs)
}

/// Drop trailing separators and `.` components so case names are stable.
fn normalize(path: PathBuf) -> PathBuf {
    let cleaned: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if cleaned.as_os_str().is_empty() {
        path
    } else {
        cleaned
    }
}
