//! Gateway to the external log-anomaly detector.
//!
//! The harness only ever talks to the [`Detector`] trait; the subprocess
//! implementation lives in [`logreduce`].

pub mod error;
pub mod logreduce;
pub mod request;
pub mod traits;

pub use error::{DetectorError, Result};
pub use logreduce::LogreduceDetector;
pub use request::{DetectionRequest, DiffOptions, ModelVariant};
pub use traits::Detector;
