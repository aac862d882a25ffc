//! Formgrade CLI
//!
//! Entry points for the three pipeline stages: capturing labeled feature
//! vectors from a detection log, training the classifier, and serving
//! predictions over HTTP.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use formgrade_api::{ApiConfig, ApiServer};
use formgrade_core::{
    run_capture, train_and_save, DatasetWriter, DetectionLog, Grade, GradeClassifier,
    PipelineConfig, RecordedDetector, TrainingConfig,
};

#[derive(Parser)]
#[command(
    name = "formgrade",
    version,
    about = "Pose-quality classification pipeline"
)]
struct Cli {
    /// Pipeline config file (TOML); defaults apply when absent
    #[arg(long, default_value = "formgrade.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Append labeled feature vectors from a detection log to the dataset
    Capture {
        /// JSON-lines detection log produced by the external pose detector
        detections: PathBuf,
        /// Grade label for this session: good, mediocre or bad
        grade: String,
        /// Dataset directory (defaults to the configured one)
        dataset_dir: Option<PathBuf>,
    },
    /// Train the classifier on the captured dataset
    Train {
        /// Dataset directory (defaults to the configured one)
        dataset_dir: Option<PathBuf>,
        /// Where to write the model artifact
        #[arg(long)]
        model_path: Option<PathBuf>,
    },
    /// Serve predictions from a trained model artifact
    Serve {
        /// Model artifact to load
        #[arg(long)]
        model_path: Option<PathBuf>,
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = PipelineConfig::load_or_default(&cli.config)?;

    match cli.command {
        Command::Capture {
            detections,
            grade,
            dataset_dir,
        } => {
            let grade: Grade = grade.parse()?;
            let dataset_dir = dataset_dir.unwrap_or(config.dataset_dir);

            let writer = DatasetWriter::create(&dataset_dir)?;
            let source = DetectionLog::open(&detections).with_context(|| {
                format!("failed to open detection log {}", detections.display())
            })?;

            let stats = run_capture(source, RecordedDetector, &writer, grade)?;
            info!(
                "Captured {} of {} frames into {}",
                stats.captured,
                stats.frames,
                dataset_dir.display()
            );
        }
        Command::Train {
            dataset_dir,
            model_path,
        } => {
            let dataset_dir = dataset_dir.unwrap_or(config.dataset_dir);
            let model_path = model_path.unwrap_or(config.model_path);

            let report = train_and_save(&dataset_dir, &model_path, &TrainingConfig::default())?;
            info!("Model accuracy: {:.2}", report.accuracy);
        }
        Command::Serve {
            model_path,
            host,
            port,
        } => {
            let model_path = model_path.unwrap_or(config.model_path);
            let classifier = GradeClassifier::load(&model_path).with_context(|| {
                format!(
                    "cannot start service without model artifact {}",
                    model_path.display()
                )
            })?;

            let mut api_config = ApiConfig::default();
            if let Some(host) = host {
                api_config.host = host;
            }
            if let Some(port) = port {
                api_config.port = port;
            }

            ApiServer::new(api_config, classifier).start().await?;
        }
    }

    Ok(())
}
