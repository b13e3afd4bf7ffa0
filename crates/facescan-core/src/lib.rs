//! facescan-core: Face detection, descriptor extraction and reference matching.
//!
//! Uses SCRFD for face detection (with its five-point landmark head) and
//! ArcFace for face descriptors, both running via ONNX Runtime for CPU
//! inference. Matching and tier classification are plain Rust.

pub mod alignment;
pub mod detector;
pub mod matcher;
pub mod recognizer;
pub mod tier;
pub mod types;
pub mod vision;

pub use detector::FaceDetector;
pub use matcher::{FaceMatcher, ACCEPTANCE_THRESHOLD};
pub use recognizer::FaceRecognizer;
pub use tier::Tier;
pub use types::{BoundingBox, Descriptor, Detection, LabeledDescriptor, MatchResult};
pub use vision::{OnnxBackend, VisionBackend, VisionError};
