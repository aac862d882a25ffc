//! Landmark feature extraction
//!
//! Converts detector output into the fixed-length feature vectors the
//! classifier consumes. The keypoint order defined here is the single source
//! of truth shared by training-time capture and the prediction service; the
//! two sides must flatten identically or predictions are silently wrong.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Number of keypoints reported per detected pose.
pub const POSE_KEYPOINTS: usize = 33;

/// Flattened feature vector length (x, y, z per keypoint).
pub const FEATURE_DIMENSIONS: usize = POSE_KEYPOINTS * 3;

/// One anatomical landmark position, normalized to an image-relative
/// coordinate frame by the upstream detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 3]", from = "[f64; 3]")]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Keypoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for Keypoint {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Keypoint> for [f64; 3] {
    fn from(kp: Keypoint) -> Self {
        [kp.x, kp.y, kp.z]
    }
}

/// Anatomical keypoint indices in detector output order.
///
/// The discriminants define the flattening order of [`PoseFeatures`] and
/// the column semantics of the trained classifier; they must never be
/// reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum PoseLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl PoseLandmark {
    /// Keypoint index of this landmark in detector output.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Column of this landmark's x coordinate in a flattened feature vector.
    pub const fn feature_column(self) -> usize {
        self.index() * 3
    }
}

/// A validated, flattened pose feature vector of exactly
/// [`FEATURE_DIMENSIONS`] values.
///
/// The only constructors validate dimensionality, so holding a
/// `PoseFeatures` is proof the 99-length contract is met on both the
/// training and the inference path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoseFeatures(Vec<f64>);

impl PoseFeatures {
    /// Flatten detector keypoints into a feature vector.
    ///
    /// Keypoints must arrive in [`PoseLandmark`] order; any count other
    /// than [`POSE_KEYPOINTS`] is a contract violation, never truncated or
    /// padded.
    pub fn from_keypoints(keypoints: &[Keypoint]) -> Result<Self, PipelineError> {
        if keypoints.len() != POSE_KEYPOINTS {
            return Err(PipelineError::KeypointCount {
                got: keypoints.len(),
                expected: POSE_KEYPOINTS,
            });
        }

        let mut values = Vec::with_capacity(FEATURE_DIMENSIONS);
        for kp in keypoints {
            values.push(kp.x);
            values.push(kp.y);
            values.push(kp.z);
        }

        Ok(Self(values))
    }

    /// Accept an already-flattened vector, validating its length.
    pub fn from_flat(values: Vec<f64>) -> Result<Self, PipelineError> {
        if values.len() != FEATURE_DIMENSIONS {
            return Err(PipelineError::FeatureLength {
                got: values.len(),
                expected: FEATURE_DIMENSIONS,
            });
        }

        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

/// The opaque pose-detection capability.
///
/// Implementations wrap whatever backend produces keypoints for an image
/// frame. `Ok(None)` means no pose was found in the frame.
pub trait PoseDetector {
    type Frame;

    fn detect(&mut self, frame: &Self::Frame) -> Result<Option<Vec<Keypoint>>, PipelineError>;
}

/// Converts one frame of detector output into a feature vector.
pub struct LandmarkExtractor<D> {
    detector: D,
}

impl<D: PoseDetector> LandmarkExtractor<D> {
    pub fn new(detector: D) -> Self {
        Self { detector }
    }

    /// Extract the feature vector for one frame.
    ///
    /// Returns `Ok(None)` when the detector finds no pose; the frame is
    /// skipped rather than written as a placeholder.
    pub fn extract(&mut self, frame: &D::Frame) -> Result<Option<PoseFeatures>, PipelineError> {
        match self.detector.detect(frame)? {
            Some(keypoints) => PoseFeatures::from_keypoints(&keypoints).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_pose() -> Vec<Keypoint> {
        (0..POSE_KEYPOINTS)
            .map(|i| Keypoint::new(i as f64, i as f64 + 0.25, i as f64 + 0.5))
            .collect()
    }

    /// Detector stub driven by a fixed per-frame script.
    struct ScriptedDetector;

    impl PoseDetector for ScriptedDetector {
        type Frame = Option<Vec<Keypoint>>;

        fn detect(&mut self, frame: &Self::Frame) -> Result<Option<Vec<Keypoint>>, PipelineError> {
            Ok(frame.clone())
        }
    }

    #[test]
    fn flatten_preserves_keypoint_order() {
        let features = PoseFeatures::from_keypoints(&synthetic_pose()).unwrap();
        assert_eq!(features.as_slice().len(), FEATURE_DIMENSIONS);

        for i in 0..POSE_KEYPOINTS {
            assert_eq!(features.as_slice()[i * 3], i as f64);
            assert_eq!(features.as_slice()[i * 3 + 1], i as f64 + 0.25);
            assert_eq!(features.as_slice()[i * 3 + 2], i as f64 + 0.5);
        }
    }

    #[test]
    fn landmark_indices_match_detector_order() {
        assert_eq!(PoseLandmark::Nose.index(), 0);
        assert_eq!(PoseLandmark::LeftShoulder.index(), 11);
        assert_eq!(PoseLandmark::RightHip.index(), 24);
        assert_eq!(PoseLandmark::RightFootIndex.index(), 32);
        assert_eq!(PoseLandmark::LeftShoulder.feature_column(), 33);
    }

    #[test]
    fn wrong_keypoint_count_is_fatal() {
        let mut short = synthetic_pose();
        short.pop();

        let err = PoseFeatures::from_keypoints(&short).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::KeypointCount { got: 32, expected: 33 }
        ));
    }

    #[test]
    fn flat_vector_length_is_validated() {
        assert!(PoseFeatures::from_flat(vec![0.1; FEATURE_DIMENSIONS]).is_ok());

        let err = PoseFeatures::from_flat(vec![0.1; 98]).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::FeatureLength { got: 98, expected: 99 }
        ));
    }

    #[test]
    fn extractor_skips_frames_without_detection() {
        let mut extractor = LandmarkExtractor::new(ScriptedDetector);

        assert!(extractor.extract(&None).unwrap().is_none());
        assert!(extractor.extract(&Some(synthetic_pose())).unwrap().is_some());
    }

    #[test]
    fn extractor_surfaces_keypoint_count_violation() {
        let mut extractor = LandmarkExtractor::new(ScriptedDetector);
        let truncated = Some(synthetic_pose()[..30].to_vec());

        let err = extractor.extract(&truncated).unwrap_err();
        assert!(matches!(err, PipelineError::KeypointCount { got: 30, .. }));
    }

    #[test]
    fn keypoints_serialize_as_triples() {
        let kp = Keypoint::new(0.1, 0.2, 0.3);
        let json = serde_json::to_string(&kp).unwrap();
        assert_eq!(json, "[0.1,0.2,0.3]");

        let back: Keypoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kp);
    }
}
