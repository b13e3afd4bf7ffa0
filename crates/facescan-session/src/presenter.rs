//! Presentation boundary: status text, progress, busy state, alerts and the
//! results region.

use facescan_core::{BoundingBox, Tier};
use image::RgbaImage;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PresentError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("image: {0}")]
    Image(#[from] image::ImageError),
}

/// One drawn box: which reference it resembles and how closely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub label: String,
    pub distance: f32,
    pub tier: Tier,
    pub caption: String,
    pub bbox: BoundingBox,
}

/// An uploaded photo with at least one qualifying match, ready for display
/// next to its original.
#[derive(Debug, Clone)]
pub struct AnnotatedImage {
    /// Display name of the upload.
    pub name: String,
    /// Path of the original upload.
    pub source: PathBuf,
    /// Copy of the photo with boxes and captions drawn on it.
    pub annotated: RgbaImage,
    pub annotations: Vec<Annotation>,
}

/// Where a session reports what it is doing.
pub trait Presenter {
    /// Empty the results region at the start of a run.
    fn clear_results(&mut self);

    fn set_status(&mut self, text: &str);

    fn set_progress(&mut self, completed: usize, total: usize);

    /// Busy while a run is in flight; cleared on completion or fatal error.
    fn set_busy(&mut self, busy: bool);

    /// Immediate notification that does not replace the status line.
    fn alert(&mut self, message: &str);

    /// Add an original/annotated pair to the results region.
    fn show_match(&mut self, image: AnnotatedImage) -> Result<(), PresentError>;
}

/// Completed fraction as a percentage in [0, 100].
pub fn percent(completed: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    (completed.min(total) as f32 / total as f32) * 100.0
}
