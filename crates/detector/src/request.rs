//! Detector invocation inputs.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use logeval_core::TestCase;

const DEFAULT_VARIANT: &str = "default";

/// A named configuration of the detector, evaluated independently.
///
/// `Default` runs the detector without any model selection flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ModelVariant {
    #[default]
    Default,
    Named(String),
}

impl ModelVariant {
    pub fn name(&self) -> &str {
        match self {
            ModelVariant::Default => DEFAULT_VARIANT,
            ModelVariant::Named(name) => name,
        }
    }

    /// Value for `--model-type`, if any.
    pub fn model_type(&self) -> Option<&str> {
        match self {
            ModelVariant::Default => None,
            ModelVariant::Named(name) => Some(name),
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ModelVariant::Default)
    }
}

impl FromStr for ModelVariant {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == DEFAULT_VARIANT {
            ModelVariant::Default
        } else {
            ModelVariant::Named(s.to_string())
        })
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ModelVariant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ModelVariant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(name.parse::<ModelVariant>().unwrap_or_default())
    }
}

/// Fixed comparison settings: every flagged line stands alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOptions {
    pub before_context: u32,
    pub after_context: u32,
    pub merge_distance: u32,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            before_context: 0,
            after_context: 0,
            merge_distance: 0,
        }
    }
}

/// Everything needed for one detector run.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionRequest {
    pub good: PathBuf,
    pub fail: PathBuf,
    pub threshold: Option<f64>,
    pub model: ModelVariant,
    pub options: DiffOptions,
}

impl DetectionRequest {
    /// Request for `case` under `model` with the fixed diff options.
    pub fn for_case(case: &TestCase, model: &ModelVariant) -> Self {
        Self {
            good: case.good_sample.clone(),
            fail: case.fail_sample.clone(),
            threshold: case.threshold,
            model: model.clone(),
            options: DiffOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logeval_core::ExpectedAnomaly;

    #[test]
    fn default_variant_has_no_model_type() {
        let variant: ModelVariant = "default".parse().unwrap();
        assert!(variant.is_default());
        assert_eq!(variant.model_type(), None);
        assert_eq!(variant.to_string(), "default");

        let named: ModelVariant = "hashing_nn".parse().unwrap();
        assert_eq!(named.model_type(), Some("hashing_nn"));
        assert_eq!(serde_json::to_string(&named).unwrap(), "\"hashing_nn\"");
    }

    #[test]
    fn request_carries_case_threshold() {
        let case = TestCase {
            path: PathBuf::from("tests/nova"),
            good_sample: PathBuf::from("tests/nova/n.good"),
            fail_sample: PathBuf::from("tests/nova/n.fail"),
            threshold: Some(0.2),
            anomalies: vec![ExpectedAnomaly::new("Traceback")],
        };
        let request = DetectionRequest::for_case(&case, &ModelVariant::Default);
        assert_eq!(request.threshold, Some(0.2));
        assert_eq!(request.good, PathBuf::from("tests/nova/n.good"));
        assert_eq!(request.options, DiffOptions::default());
        assert_eq!(request.options.merge_distance, 0);
    }
}
