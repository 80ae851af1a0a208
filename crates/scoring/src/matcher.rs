//! Match engine: credits scored lines to expected anomalies.
//!
//! For every expected anomaly, in declared order, the files of the detection
//! result are scanned in identifier order. An anomaly matches a line when its
//! text (minus one trailing newline) is contained in the line. Every matching
//! line of the first file with at least one match is credited to the anomaly;
//! later files are not searched for it. Positions credited this way are the
//! true positives, every other scored line is a false positive.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use logeval_core::{DetectionResult, ExpectedAnomaly, Position};

/// Result of matching one case's anomalies against one detection result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome {
    /// Index-aligned with the anomaly list that was matched.
    pub found: Vec<bool>,
    /// Positions credited to some anomaly, per file identifier.
    pub matched: HashMap<String, HashSet<Position>>,
}

/// A scored line that no anomaly was credited with.
#[derive(Debug, Clone, PartialEq)]
pub struct FalsePositive<'a> {
    pub file: &'a str,
    pub line: &'a str,
    pub position: &'a Position,
}

/// Reconcile `anomalies` with the scored lines of `result`.
///
/// The `filename` hint of an anomaly does not restrict the search.
pub fn match_anomalies(anomalies: &[ExpectedAnomaly], result: &DetectionResult) -> MatchOutcome {
    let mut outcome = MatchOutcome {
        found: vec![false; anomalies.len()],
        matched: HashMap::new(),
    };

    for (idx, anomaly) in anomalies.iter().enumerate() {
        let needle = anomaly.needle();

        for (name, file) in &result.files {
            let mut hit = false;
            for (line, position) in file.scored_lines() {
                if line.contains(needle) {
                    hit = true;
                    outcome
                        .matched
                        .entry(name.clone())
                        .or_default()
                        .insert(position.clone());
                }
            }

            if hit {
                trace!(anomaly = needle, file = %name, "anomaly matched");
                outcome.found[idx] = true;
                break;
            }
        }
    }

    outcome
}

impl MatchOutcome {
    pub fn is_found(&self, idx: usize) -> bool {
        self.found.get(idx).copied().unwrap_or(false)
    }

    /// Whether `position` of `file` was credited to an anomaly.
    pub fn is_matched(&self, file: &str, position: &Position) -> bool {
        self.matched
            .get(file)
            .map(|set| set.contains(position))
            .unwrap_or(false)
    }

    /// Required anomalies that no line matched.
    pub fn missed_required<'a>(&self, anomalies: &'a [ExpectedAnomaly]) -> Vec<&'a ExpectedAnomaly> {
        anomalies
            .iter()
            .enumerate()
            .filter(|(idx, a)| !a.optional && !self.is_found(*idx))
            .map(|(_, a)| a)
            .collect()
    }

    /// Every scored line of `result` not credited to an anomaly, in file then line order.
    pub fn false_positives<'a>(&self, result: &'a DetectionResult) -> Vec<FalsePositive<'a>> {
        result
            .files
            .iter()
            .flat_map(|(name, file)| {
                file.scored_lines()
                    .map(move |(line, position)| (name.as_str(), line, position))
            })
            .filter(|(file, _, position)| !self.is_matched(file, position))
            .map(|(file, line, position)| FalsePositive {
                file,
                line,
                position,
            })
            .collect()
    }
}
