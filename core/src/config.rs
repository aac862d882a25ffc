//! Pipeline configuration
//!
//! Well-known storage locations for the dataset stores and the model
//! artifact, loadable from a TOML file and overridable per invocation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PipelineError;

/// Storage locations shared by capture, training and serving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding the per-grade dataset stores.
    pub dataset_dir: PathBuf,
    /// Path of the trained model artifact.
    pub model_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from("dataset"),
            model_path: PathBuf::from("model.bin"),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let raw = fs::read_to_string(path)?;
        let config = toml::from_str(&raw).map_err(|e| PipelineError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        debug!(path = %path.display(), "pipeline config loaded");
        Ok(config)
    }

    /// Load `path` if it exists, falling back to defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, PipelineError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_point_at_well_known_paths() {
        let config = PipelineConfig::default();
        assert_eq!(config.dataset_dir, PathBuf::from("dataset"));
        assert_eq!(config.model_path, PathBuf::from("model.bin"));
    }

    #[test]
    fn toml_file_round_trips() -> Result<(), PipelineError> {
        let dir = TempDir::new()?;
        let path = dir.path().join("formgrade.toml");
        fs::write(&path, "dataset_dir = \"captures\"\nmodel_path = \"out/model.bin\"\n")?;

        let config = PipelineConfig::load(&path)?;
        assert_eq!(config.dataset_dir, PathBuf::from("captures"));
        assert_eq!(config.model_path, PathBuf::from("out/model.bin"));

        Ok(())
    }

    #[test]
    fn missing_file_falls_back_to_defaults() -> Result<(), PipelineError> {
        let dir = TempDir::new()?;
        let config = PipelineConfig::load_or_default(&dir.path().join("absent.toml"))?;
        assert_eq!(config.model_path, PathBuf::from("model.bin"));

        Ok(())
    }

    #[test]
    fn invalid_toml_is_reported() -> Result<(), PipelineError> {
        let dir = TempDir::new()?;
        let path = dir.path().join("formgrade.toml");
        fs::write(&path, "dataset_dir = [not toml")?;

        let err = PipelineConfig::load(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Config { .. }));

        Ok(())
    }
}
