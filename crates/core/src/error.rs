use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("file '{file}': {lines} lines but {scores} scores")]
    MisalignedScores {
        file: String,
        lines: usize,
        scores: usize,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
