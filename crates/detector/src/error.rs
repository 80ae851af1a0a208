use thiserror::Error;

/// Errors that can occur while running the detector.
///
/// None of these are retried: a broken detector aborts the run.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("failed to run detector '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed detector output: {source}\n--- stdout ---\n{stdout}\n--- stderr ---\n{stderr}")]
    Malformed {
        stdout: String,
        stderr: String,
        #[source]
        source: logeval_core::CoreError,
    },
}

pub type Result<T> = std::result::Result<T, DetectorError>;
