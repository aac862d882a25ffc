//! Formgrade Core Module
//!
//! The core module provides the landmark feature pipeline for pose-quality
//! classification: extraction of fixed-length feature vectors from detector
//! output, the per-grade dataset stores, classifier training, and the
//! persisted model artifact consumed by the prediction service.
//!
//! The central invariant lives in [`landmarks`]: training-time and
//! inference-time feature vectors share one validated construction path, so
//! both sides of the pipeline agree on keypoint order and dimensionality.

pub mod capture;
pub mod config;
pub mod dataset;
pub mod error;
pub mod landmarks;
pub mod model;
pub mod trainer;

// Re-export the pipeline surface for the api and cli crates
pub use capture::{run_capture, CaptureStats, DetectionLog, FrameSource, RecordedDetector};
pub use config::PipelineConfig;
pub use dataset::{DatasetLoader, DatasetWriter, Grade, LabeledDataset};
pub use error::PipelineError;
pub use landmarks::{
    Keypoint, LandmarkExtractor, PoseDetector, PoseFeatures, PoseLandmark, FEATURE_DIMENSIONS,
    POSE_KEYPOINTS,
};
pub use model::{GradeClassifier, ModelMetadata};
pub use trainer::{train, train_and_save, TrainingConfig, TrainingReport};
