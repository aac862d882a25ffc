//! Classifier training
//!
//! Splits the labeled dataset with a seeded shuffle, fits the decision tree
//! on the training partition and reports holdout accuracy before persisting
//! the artifact.

use std::path::Path;

use chrono::Utc;
use linfa::dataset::Dataset;
use linfa::prelude::*;
use linfa_trees::DecisionTree;
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::dataset::{DatasetLoader, LabeledDataset};
use crate::error::PipelineError;
use crate::landmarks::FEATURE_DIMENSIONS;
use crate::model::{GradeClassifier, ModelMetadata};

/// Training configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Fraction of the dataset held out for accuracy reporting.
    pub holdout_ratio: f32,
    /// Seed for the reproducible shuffle/split.
    pub seed: u64,
    /// Maximum decision tree depth.
    pub max_depth: Option<usize>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            holdout_ratio: 0.2,
            seed: 42,
            max_depth: Some(10),
        }
    }
}

/// Summary of one training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub training_examples: usize,
    pub holdout_examples: usize,
    pub distinct_grades: usize,
    pub accuracy: f64,
}

/// Fit a classifier on `dataset`.
///
/// Fails rather than fitting a degenerate model when the dataset is empty
/// or represents fewer than two grades. The split is reproducible: identical
/// dataset and seed yield identical partitions and accuracy.
pub fn train(
    dataset: &LabeledDataset,
    config: &TrainingConfig,
) -> Result<(GradeClassifier, TrainingReport), PipelineError> {
    if dataset.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    let distinct_grades = dataset.distinct_grades();
    if distinct_grades < 2 {
        return Err(PipelineError::InsufficientGrades {
            found: distinct_grades,
        });
    }

    info!(
        examples = dataset.len(),
        grades = distinct_grades,
        seed = config.seed,
        "starting training run"
    );

    let targets: Array1<usize> = dataset.grades.iter().map(|g| g.index()).collect();
    let mut rng = StdRng::seed_from_u64(config.seed);

    let (train, holdout) = Dataset::new(dataset.records.clone(), targets)
        .shuffle(&mut rng)
        .split_with_ratio(1.0 - config.holdout_ratio);

    let tree = DecisionTree::params()
        .max_depth(config.max_depth)
        .fit(&train)
        .map_err(|e| PipelineError::Training(e.to_string()))?;

    let accuracy = holdout_accuracy(&tree, &holdout);
    info!(
        training_examples = train.nsamples(),
        holdout_examples = holdout.nsamples(),
        accuracy,
        "training run complete"
    );

    let metadata = ModelMetadata {
        id: Uuid::new_v4(),
        trained_at: Utc::now(),
        training_examples: train.nsamples(),
        holdout_accuracy: accuracy,
        feature_dimensions: FEATURE_DIMENSIONS,
    };

    let report = TrainingReport {
        training_examples: train.nsamples(),
        holdout_examples: holdout.nsamples(),
        distinct_grades,
        accuracy,
    };

    Ok((GradeClassifier::new(tree, metadata), report))
}

/// Full training run: load the dataset directory, fit, persist the artifact.
pub fn train_and_save(
    dataset_dir: &Path,
    model_path: &Path,
    config: &TrainingConfig,
) -> Result<TrainingReport, PipelineError> {
    let dataset = DatasetLoader::new(dataset_dir).load()?;
    let (classifier, report) = train(&dataset, config)?;
    classifier.save(model_path)?;
    Ok(report)
}

fn holdout_accuracy(
    tree: &DecisionTree<f64, usize>,
    holdout: &Dataset<f64, usize, ndarray::Ix1>,
) -> f64 {
    if holdout.nsamples() == 0 {
        warn!("holdout partition is empty, reporting zero accuracy");
        return 0.0;
    }

    let predicted = tree.predict(holdout.records());
    let correct = predicted
        .iter()
        .zip(holdout.targets().iter())
        .filter(|(p, t)| p == t)
        .count();

    correct as f64 / holdout.nsamples() as f64
}
