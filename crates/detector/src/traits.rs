//! Detector trait definition.

use logeval_core::DetectionResult;

use crate::error::Result;
use crate::request::DetectionRequest;

/// Anything that can score the lines of a good/fail sample pair.
///
/// Implementations are treated as pure functions of the request: the same
/// request is expected to produce the same result.
pub trait Detector: Send + Sync {
    /// Compare the request's samples and return per-file line scores.
    fn detect(&self, request: &DetectionRequest) -> Result<DetectionResult>;

    /// Human-readable rendering of how `request` would be executed.
    fn describe(&self, request: &DetectionRequest) -> String {
        format!(
            "diff {} {}",
            request.good.display(),
            request.fail.display()
        )
    }
}

impl<T: Detector + ?Sized> Detector for &T {
    fn detect(&self, request: &DetectionRequest) -> Result<DetectionResult> {
        (**self).detect(request)
    }

    fn describe(&self, request: &DetectionRequest) -> String {
        (**self).describe(request)
    }
}
