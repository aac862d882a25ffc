//! Per-grade dataset stores
//!
//! Each grade owns one append-only JSON-lines file under the dataset
//! directory, one feature vector per line in capture order. Appending is the
//! only mutation; correcting bad data means editing the store out of band.

use std::collections::HashSet;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::PipelineError;
use crate::landmarks::{PoseFeatures, FEATURE_DIMENSIONS};

/// Exercise form quality labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Good,
    Mediocre,
    Bad,
}

impl Grade {
    /// Every grade, in the fixed order used for classifier target encoding.
    pub const ALL: [Grade; 3] = [Grade::Good, Grade::Mediocre, Grade::Bad];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Good => "good",
            Grade::Mediocre => "mediocre",
            Grade::Bad => "bad",
        }
    }

    /// Integer target encoding for the classifier.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Grade> {
        Grade::ALL.get(index).copied()
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(Grade::Good),
            "mediocre" => Ok(Grade::Mediocre),
            "bad" => Ok(Grade::Bad),
            other => Err(PipelineError::UnknownGrade(other.to_string())),
        }
    }
}

fn store_path(root: &Path, grade: Grade) -> PathBuf {
    root.join(format!("{}.json", grade))
}

/// Appends labeled feature vectors to the per-grade stores.
///
/// The writer never reads back or deduplicates; each record is one
/// self-delimited line, so a crash mid-write cannot corrupt earlier records.
pub struct DatasetWriter {
    root: PathBuf,
}

impl DatasetWriter {
    /// Open a writer rooted at `dir`, creating the directory if missing.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let root = dir.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Path of the store backing `grade`.
    pub fn store_path(&self, grade: Grade) -> PathBuf {
        store_path(&self.root, grade)
    }

    /// Append one feature vector to the store for `grade`.
    pub fn append(&self, grade: Grade, features: &PoseFeatures) -> Result<(), PipelineError> {
        let mut line = serde_json::to_string(features)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.store_path(grade))?;
        file.write_all(line.as_bytes())?;

        Ok(())
    }
}

/// Feature matrix with index-aligned grade labels.
#[derive(Debug, Clone)]
pub struct LabeledDataset {
    /// One row per example, [`FEATURE_DIMENSIONS`] columns.
    pub records: Array2<f64>,
    /// Grade of each row, aligned index-for-index with `records`.
    pub grades: Vec<Grade>,
}

impl LabeledDataset {
    pub fn len(&self) -> usize {
        self.grades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }

    /// Number of distinct grades with at least one example.
    pub fn distinct_grades(&self) -> usize {
        self.grades.iter().collect::<HashSet<_>>().len()
    }
}

/// Reads every per-grade store back into one training dataset.
pub struct DatasetLoader {
    root: PathBuf,
}

impl DatasetLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { root: dir.into() }
    }

    /// Load all grade stores under the dataset directory.
    ///
    /// A missing store is a grade with zero examples, not an error. A record
    /// that cannot be decoded into exactly [`FEATURE_DIMENSIONS`] values is
    /// fatal for the run.
    pub fn load(&self) -> Result<LabeledDataset, PipelineError> {
        let mut values = Vec::new();
        let mut grades = Vec::new();

        for grade in Grade::ALL {
            let path = store_path(&self.root, grade);
            if !path.exists() {
                debug!(grade = %grade, "no store for grade, skipping");
                continue;
            }

            let reader = BufReader::new(File::open(&path)?);
            let mut records = 0usize;

            for (number, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }

                let malformed = |message: String| PipelineError::MalformedRecord {
                    path: path.clone(),
                    line: number + 1,
                    message,
                };

                let parsed: Vec<f64> =
                    serde_json::from_str(&line).map_err(|e| malformed(e.to_string()))?;
                let features =
                    PoseFeatures::from_flat(parsed).map_err(|e| malformed(e.to_string()))?;

                values.extend_from_slice(features.as_slice());
                grades.push(grade);
                records += 1;
            }

            debug!(grade = %grade, records, "loaded grade store");
        }

        let records = Array2::from_shape_vec((grades.len(), FEATURE_DIMENSIONS), values)
            .expect("every record contributes exactly FEATURE_DIMENSIONS values");

        info!(examples = grades.len(), "dataset loaded");
        Ok(LabeledDataset { records, grades })
    }
}
