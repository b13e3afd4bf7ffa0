use serde::{Deserialize, Serialize};
use std::fmt;

/// Bounding box for a detected face, with optional facial landmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub confidence: f32,
    /// Five-point facial landmarks: [left_eye, right_eye, nose, left_mouth, right_mouth].
    pub landmarks: Option<[(f32, f32); 5]>,
}

/// Face descriptor vector (512-dimensional for ArcFace, L2-normalized).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub values: Vec<f32>,
    /// Model version that produced this descriptor (e.g., "w600k_r50").
    pub model_version: Option<String>,
}

impl Descriptor {
    pub fn new(values: Vec<f32>) -> Self {
        Self {
            values,
            model_version: None,
        }
    }

    /// Euclidean distance between two descriptors. Lower = more similar.
    ///
    /// Descriptors of different length are compared over their common prefix.
    pub fn euclidean_distance(&self, other: &Descriptor) -> f32 {
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f32>()
            .sqrt()
    }
}

/// A reference descriptor paired with the identity it stands for.
#[derive(Debug, Clone)]
pub struct LabeledDescriptor {
    pub label: String,
    pub descriptor: Descriptor,
}

impl LabeledDescriptor {
    pub fn new(label: impl Into<String>, descriptor: Descriptor) -> Self {
        Self {
            label: label.into(),
            descriptor,
        }
    }
}

/// One face found in an image: where it is and what it looks like.
#[derive(Debug, Clone)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub descriptor: Descriptor,
}

/// Best reference for a probe descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Label of the closest reference, or `None` when it lies outside the
    /// acceptance threshold.
    pub label: Option<String>,
    /// Distance to the closest reference (non-negative).
    pub distance: f32,
}

impl MatchResult {
    pub const UNKNOWN: &'static str = "unknown";

    pub fn is_unknown(&self) -> bool {
        self.label.is_none()
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.label.as_deref().unwrap_or(Self::UNKNOWN);
        write!(f, "{label} ({:.2})", self.distance)
    }
}
