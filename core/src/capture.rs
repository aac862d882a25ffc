//! Capture pipeline
//!
//! Drives frames from a source through the landmark extractor into the
//! per-grade dataset stores. Frames without a detected pose are skipped
//! outright; nothing is interpolated or padded in their place.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::PathBuf;

use tracing::info;

use crate::dataset::{DatasetWriter, Grade};
use crate::error::PipelineError;
use crate::landmarks::{Keypoint, LandmarkExtractor, PoseDetector};

/// The opaque frame-iteration capability.
///
/// Implementations wrap whatever decodes the video stream; frames arrive in
/// order and `Ok(None)` terminates the capture loop.
pub trait FrameSource {
    type Frame;

    fn next_frame(&mut self) -> Result<Option<Self::Frame>, PipelineError>;
}

/// Counters for one capture session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    /// Frames read from the source.
    pub frames: usize,
    /// Feature vectors appended to the dataset.
    pub captured: usize,
    /// Frames with no detected pose.
    pub skipped: usize,
}

/// Run one capture session, appending every detected pose to the store for
/// `grade`.
pub fn run_capture<S, D>(
    mut source: S,
    detector: D,
    writer: &DatasetWriter,
    grade: Grade,
) -> Result<CaptureStats, PipelineError>
where
    S: FrameSource,
    D: PoseDetector<Frame = S::Frame>,
{
    let mut extractor = LandmarkExtractor::new(detector);
    let mut stats = CaptureStats::default();

    while let Some(frame) = source.next_frame()? {
        stats.frames += 1;

        match extractor.extract(&frame)? {
            Some(features) => {
                writer.append(grade, &features)?;
                stats.captured += 1;
            }
            None => stats.skipped += 1,
        }
    }

    info!(
        grade = %grade,
        frames = stats.frames,
        captured = stats.captured,
        skipped = stats.skipped,
        "capture session finished"
    );
    Ok(stats)
}

/// One frame's worth of externally produced detector output.
pub type DetectionRecord = Option<Vec<Keypoint>>;

/// Frame source replaying a JSON-lines detection log.
///
/// Each line holds the detector output for one video frame: `null` when no
/// pose was found, otherwise an array of 33 `[x, y, z]` keypoints. The video
/// decoder and pose detector that produce the log run outside this process.
pub struct DetectionLog {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line: usize,
}

impl DetectionLog {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let path = path.into();
        let file = File::open(&path)?;

        Ok(Self {
            lines: BufReader::new(file).lines(),
            path,
            line: 0,
        })
    }
}

impl FrameSource for DetectionLog {
    type Frame = DetectionRecord;

    fn next_frame(&mut self) -> Result<Option<DetectionRecord>, PipelineError> {
        for line in self.lines.by_ref() {
            let line = line?;
            self.line += 1;
            if line.trim().is_empty() {
                continue;
            }

            let record =
                serde_json::from_str(&line).map_err(|e| PipelineError::MalformedRecord {
                    path: self.path.clone(),
                    line: self.line,
                    message: e.to_string(),
                })?;
            return Ok(Some(record));
        }

        Ok(None)
    }
}

/// Detector that replays recorded detection output as-is.
#[derive(Debug, Default)]
pub struct RecordedDetector;

impl PoseDetector for RecordedDetector {
    type Frame = DetectionRecord;

    fn detect(&mut self, frame: &DetectionRecord) -> Result<Option<Vec<Keypoint>>, PipelineError> {
        Ok(frame.clone())
    }
}
