//! Pipeline error types
//!
//! One taxonomy for the whole feature pipeline: request-shape violations are
//! recoverable at the service boundary, everything else is fatal to the
//! frame, record, or run that produced it.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the landmark feature pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The detector reported a pose with the wrong number of keypoints.
    #[error("pose detector reported {got} keypoints, expected {expected}")]
    KeypointCount { got: usize, expected: usize },

    /// A flattened feature vector has the wrong number of values.
    #[error("feature vector has {got} values, expected {expected}")]
    FeatureLength { got: usize, expected: usize },

    /// A label outside the closed grade set.
    #[error("unknown grade label '{0}'")]
    UnknownGrade(String),

    /// A persisted record that cannot be decoded.
    #[error("malformed record at {path}:{line}: {message}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Training was requested on a dataset with no examples.
    #[error("dataset contains no examples")]
    EmptyDataset,

    /// Training was requested with too few classes represented.
    #[error("training requires at least 2 distinct grades, found {found}")]
    InsufficientGrades { found: usize },

    /// The classifier fit itself failed.
    #[error("classifier training failed: {0}")]
    Training(String),

    /// The loaded model produced an unusable prediction.
    #[error("prediction failed: {0}")]
    Prediction(String),

    /// The model artifact could not be written, read, or decoded.
    #[error("model artifact at {path}: {message}")]
    ModelArtifact { path: PathBuf, message: String },

    /// A configuration file could not be parsed.
    #[error("config file at {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
