//! Scripted vision backend and recording presenter for session tests.

use crate::presenter::{AnnotatedImage, PresentError, Presenter};
use facescan_core::detector::DetectorError;
use facescan_core::{BoundingBox, Descriptor, Detection, VisionBackend, VisionError};
use image::RgbImage;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Faces keyed by image dimensions, so each test photo is told apart by size.
#[derive(Default)]
pub struct FakeBackend {
    faces: HashMap<(u32, u32), Vec<Detection>>,
    failing: HashSet<(u32, u32)>,
    pub calls: usize,
}

impl FakeBackend {
    pub fn with_faces(mut self, size: (u32, u32), faces: Vec<Detection>) -> Self {
        self.faces.insert(size, faces);
        self
    }

    pub fn failing_on(mut self, size: (u32, u32)) -> Self {
        self.failing.insert(size);
        self
    }

    fn lookup(&mut self, image: &RgbImage) -> Result<Vec<Detection>, VisionError> {
        self.calls += 1;
        let size = image.dimensions();
        if self.failing.contains(&size) {
            return Err(VisionError::Detector(DetectorError::InferenceFailed("scripted failure".into())));
        }
        Ok(self.faces.get(&size).cloned().unwrap_or_default())
    }
}

impl VisionBackend for FakeBackend {
    fn detect_single(&mut self, image: &RgbImage) -> Result<Option<Detection>, VisionError> {
        Ok(self.lookup(image)?.into_iter().next())
    }

    fn detect_all(&mut self, image: &RgbImage) -> Result<Vec<Detection>, VisionError> {
        self.lookup(image)
    }
}

pub fn face_at(values: Vec<f32>, x: f32, y: f32, size: f32) -> Detection {
    Detection {
        bbox: BoundingBox {
            x,
            y,
            width: size,
            height: size,
            confidence: 0.9,
            landmarks: None,
        },
        descriptor: Descriptor::new(values),
    }
}

pub fn face(values: Vec<f32>) -> Detection {
    face_at(values, 2.0, 2.0, 4.0)
}

pub fn write_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(width, height, image::Rgb([90, 120, 150]))
        .save(&path)
        .unwrap();
    path
}

#[derive(Default)]
pub struct RecordingPresenter {
    pub cleared: usize,
    pub statuses: Vec<String>,
    pub progress: Vec<(usize, usize)>,
    pub busy: Vec<bool>,
    pub alerts: Vec<String>,
    pub shown: Vec<AnnotatedImage>,
}

impl RecordingPresenter {
    pub fn last_status(&self) -> &str {
        self.statuses.last().map(String::as_str).unwrap_or("")
    }
}

impl Presenter for RecordingPresenter {
    fn clear_results(&mut self) {
        self.cleared += 1;
        self.shown.clear();
    }

    fn set_status(&mut self, text: &str) {
        self.statuses.push(text.to_string());
    }

    fn set_progress(&mut self, completed: usize, total: usize) {
        self.progress.push((completed, total));
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy.push(busy);
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn show_match(&mut self, image: AnnotatedImage) -> Result<(), PresentError> {
        self.shown.push(image);
        Ok(())
    }
}
