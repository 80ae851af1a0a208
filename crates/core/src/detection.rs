use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};

/// Opaque per-line coordinate assigned by the detector.
///
/// Usually a number, but any JSON value is accepted. Two positions are the
/// same line when their JSON values are equal. Identity only holds within the
/// file that produced the position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(pub Value);

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Equal JSON values always serialize to the same text.
        self.0.to_string().hash(state);
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Position {
    fn from(v: u64) -> Self {
        Position(Value::from(v))
    }
}

/// Scored lines the detector reported for one file.
///
/// `lines` and `scores` are index-aligned: `scores[i]` is the
/// `(position, score)` pair of `lines[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileResult {
    pub lines: Vec<String>,
    pub scores: Vec<(Position, f64)>,
}

impl FileResult {
    /// Iterate `(line, position)` pairs in detector order.
    pub fn scored_lines(&self) -> impl Iterator<Item = (&str, &Position)> {
        self.lines
            .iter()
            .zip(self.scores.iter())
            .map(|(line, (pos, _))| (line.as_str(), pos))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Parsed output of one detector run.
///
/// Files are keyed (and therefore iterated) by identifier in sorted order,
/// which makes "first matching file" deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub files: BTreeMap<String, FileResult>,
}

impl DetectionResult {
    /// Parse detector JSON output and check that every file is well formed.
    pub fn from_json(raw: &[u8]) -> Result<Self> {
        let result: DetectionResult = serde_json::from_slice(raw)?;
        result.validate()?;
        Ok(result)
    }

    /// Reject files whose `lines` and `scores` are not index-aligned.
    pub fn validate(&self) -> Result<()> {
        for (name, file) in &self.files {
            if file.lines.len() != file.scores.len() {
                return Err(CoreError::MisalignedScores {
                    file: name.clone(),
                    lines: file.lines.len(),
                    scores: file.scores.len(),
                });
            }
        }
        Ok(())
    }

    /// Total number of scored lines across all files.
    pub fn scored_line_count(&self) -> usize {
        self.files.values().map(FileResult::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const SAMPLE: &str = r#"{
        "files": {
            "b.log": {"lines": ["x"], "scores": [[7, 0.3]]},
            "a.log": {"lines": ["ok", "kernel panic: oops"], "scores": [[0, 0.1], [1, 0.9]]}
        },
        "training": {"ignored": true}
    }"#;

    #[test]
    fn parses_detector_output_and_ignores_unknown_keys() {
        let result = DetectionResult::from_json(SAMPLE.as_bytes()).unwrap();
        assert_eq!(result.files.len(), 2);
        assert_eq!(result.scored_line_count(), 3);

        let a = &result.files["a.log"];
        let pairs: Vec<_> = a.scored_lines().collect();
        assert_eq!(pairs[1].0, "kernel panic: oops");
        assert_eq!(pairs[1].1, &Position::from(1));
        assert_eq!(a.scores[1].1, 0.9);
    }

    #[test]
    fn files_iterate_in_identifier_order() {
        let result = DetectionResult::from_json(SAMPLE.as_bytes()).unwrap();
        let names: Vec<_> = result.files.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["a.log", "b.log"]);
    }

    #[test]
    fn misaligned_scores_are_rejected() {
        let raw = r#"{"files": {"a.log": {"lines": ["a", "b"], "scores": [[0, 0.5]]}}}"#;
        let err = DetectionResult::from_json(raw.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::MisalignedScores { lines: 2, scores: 1, .. }
        ));
    }

    #[test]
    fn non_json_output_is_an_error() {
        let err = DetectionResult::from_json(b"Traceback (most recent call last)").unwrap_err();
        assert!(matches!(err, CoreError::Json(_)));
    }

    #[test]
    fn positions_may_be_any_json_value() {
        let raw = r#"{"files": {"a": {"lines": ["x", "y"], "scores": [["chunk-3", 1.0], [[2, 4], 0.2]]}}}"#;
        let result = DetectionResult::from_json(raw.as_bytes()).unwrap();
        let positions: HashSet<_> = result.files["a"].scores.iter().map(|(p, _)| p.clone()).collect();
        assert!(positions.contains(&Position(Value::from("chunk-3"))));
        assert!(positions.contains(&Position(serde_json::json!([2, 4]))));
    }

    #[test]
    fn file_without_lines_or_scores_is_a_schema_error() {
        let err = DetectionResult::from_json(br#"{"files": {"job-output.txt": {"chunks": 3}}}"#)
            .unwrap_err();
        assert!(matches!(err, CoreError::Json(_)));

        let err = DetectionResult::from_json(br#"{"files": {"a.log": {"lines": ["x"]}}}"#)
            .unwrap_err();
        assert!(matches!(err, CoreError::Json(_)));
    }

    #[test]
    fn missing_files_key_is_a_schema_error() {
        assert!(DetectionResult::from_json(b"{}").is_err());

        let empty = DetectionResult::from_json(br#"{"files": {}}"#).unwrap();
        assert!(empty.files.is_empty());
        assert_eq!(empty.scored_line_count(), 0);
    }
}
