//! Error types for cross-validation and post-processing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CvError {
    /// Invalid input to an aggregation or configuration value
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persisted bundle does not match the expected shape
    #[error("Schema error: {0}")]
    Schema(String),

    /// Bundle file could not be read at all
    #[error("cannot read bundle {path}: {source}")]
    BundleRead {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    /// Failure propagated from the training backend; aborts the run
    #[error("Training error: {0}")]
    Training(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CvError>;
