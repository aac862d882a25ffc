//! Trained classifier artifact
//!
//! Wraps the fitted decision tree together with the grade table and run
//! metadata. The artifact is serialized wholesale with bincode, overwritten
//! on every training run, and loaded once per service process.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use linfa::prelude::*;
use linfa_trees::DecisionTree;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::dataset::Grade;
use crate::error::PipelineError;
use crate::landmarks::{PoseFeatures, FEATURE_DIMENSIONS};

/// Metadata recorded with every trained model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub id: Uuid,
    pub trained_at: DateTime<Utc>,
    /// Number of examples the tree was fitted on.
    pub training_examples: usize,
    /// Holdout accuracy reported by the training run.
    pub holdout_accuracy: f64,
    /// Feature vector length the model was trained against.
    pub feature_dimensions: usize,
}

/// A fitted pose-quality classifier.
///
/// Read-only after training; safe to share across concurrent requests
/// behind an `Arc` without locking.
#[derive(Debug, Serialize, Deserialize)]
pub struct GradeClassifier {
    metadata: ModelMetadata,
    /// Class-index to grade mapping captured at training time.
    grades: Vec<Grade>,
    tree: DecisionTree<f64, usize>,
}

impl GradeClassifier {
    pub(crate) fn new(tree: DecisionTree<f64, usize>, metadata: ModelMetadata) -> Self {
        Self {
            metadata,
            grades: Grade::ALL.to_vec(),
            tree,
        }
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Classify one feature vector.
    ///
    /// The input must have gone through the same [`PoseFeatures`] validation
    /// as training capture; no further normalization is applied here.
    pub fn predict(&self, features: &PoseFeatures) -> Result<Grade, PipelineError> {
        let record = Array2::from_shape_vec((1, FEATURE_DIMENSIONS), features.as_slice().to_vec())
            .expect("feature vector length validated at construction");

        let targets = self.tree.predict(&record);
        let index = targets[0];

        self.grades.get(index).copied().ok_or_else(|| {
            PipelineError::Prediction(format!("classifier produced unknown class index {index}"))
        })
    }

    /// Persist the artifact, unconditionally overwriting any previous model
    /// at `path`.
    pub fn save(&self, path: &Path) -> Result<(), PipelineError> {
        let artifact = |message: String| PipelineError::ModelArtifact {
            path: path.to_path_buf(),
            message,
        };

        let bytes = bincode::serialize(self).map_err(|e| artifact(e.to_string()))?;
        fs::write(path, bytes).map_err(|e| artifact(e.to_string()))?;

        info!(path = %path.display(), "model artifact written");
        Ok(())
    }

    /// Load a previously trained artifact.
    ///
    /// Missing or undecodable artifacts are fatal; a service must not start
    /// without a usable model.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let artifact = |message: String| PipelineError::ModelArtifact {
            path: path.to_path_buf(),
            message,
        };

        let bytes = fs::read(path).map_err(|e| artifact(e.to_string()))?;
        let model: Self = bincode::deserialize(&bytes).map_err(|e| artifact(e.to_string()))?;

        if model.metadata.feature_dimensions != FEATURE_DIMENSIONS {
            return Err(artifact(format!(
                "trained for {} feature dimensions, this build expects {}",
                model.metadata.feature_dimensions, FEATURE_DIMENSIONS
            )));
        }

        info!(
            path = %path.display(),
            trained_at = %model.metadata.trained_at,
            accuracy = model.metadata.holdout_accuracy,
            "model artifact loaded"
        );
        Ok(model)
    }
}
