//! The vision capability boundary: face detection with landmarks and
//! descriptor extraction over a decoded photo.

use crate::detector::{DetectorError, FaceDetector};
use crate::recognizer::{FaceRecognizer, RecognizerError};
use crate::types::Detection;
use image::RgbImage;
use std::path::Path;
use thiserror::Error;

/// SCRFD detector with five-point landmark head.
pub const DETECTOR_MODEL_FILE: &str = "det_10g.onnx";
/// ArcFace descriptor extractor.
pub const RECOGNIZER_MODEL_FILE: &str = "w600k_r50.onnx";

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("detector error: {0}")]
    Detector(#[from] DetectorError),
    #[error("recognizer error: {0}")]
    Recognizer(#[from] RecognizerError),
}

/// Detection, landmark extraction and descriptor extraction over a photo.
pub trait VisionBackend {
    /// The most confident face in `image`, if any.
    fn detect_single(&mut self, image: &RgbImage) -> Result<Option<Detection>, VisionError>;

    /// Every face in `image`, most confident first.
    fn detect_all(&mut self, image: &RgbImage) -> Result<Vec<Detection>, VisionError>;
}

/// SCRFD + ArcFace on ONNX Runtime.
pub struct OnnxBackend {
    detector: FaceDetector,
    recognizer: FaceRecognizer,
}

impl OnnxBackend {
    /// Load both models from `model_dir`. Fails fast on the first missing
    /// or unloadable model.
    pub fn load(model_dir: &Path) -> Result<Self, VisionError> {
        let detector = FaceDetector::load(&model_dir.join(DETECTOR_MODEL_FILE))?;
        let recognizer = FaceRecognizer::load(&model_dir.join(RECOGNIZER_MODEL_FILE))?;
        Ok(Self {
            detector,
            recognizer,
        })
    }
}

impl VisionBackend for OnnxBackend {
    fn detect_single(&mut self, image: &RgbImage) -> Result<Option<Detection>, VisionError> {
        let faces = self.detector.detect(image)?;
        let Some(face) = faces.into_iter().find(|f| f.landmarks.is_some()) else {
            return Ok(None);
        };
        let descriptor = self.recognizer.extract(image, &face)?;
        Ok(Some(Detection {
            bbox: face,
            descriptor,
        }))
    }

    fn detect_all(&mut self, image: &RgbImage) -> Result<Vec<Detection>, VisionError> {
        let faces = self.detector.detect(image)?;
        tracing::debug!(faces = faces.len(), "detected faces");

        let mut detections = Vec::with_capacity(faces.len());
        for face in faces {
            if face.landmarks.is_none() {
                tracing::debug!(confidence = face.confidence, "skipping face without landmarks");
                continue;
            }
            let descriptor = self.recognizer.extract(image, &face)?;
            detections.push(Detection {
                bbox: face,
                descriptor,
            });
        }
        Ok(detections)
    }
}
