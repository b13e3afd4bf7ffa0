//! Builds the labeled reference set that uploads are compared against.

use crate::error::SessionError;
use facescan_core::{LabeledDescriptor, VisionBackend};
use image::{DynamicImage, ImageDecoder, ImageReader, RgbImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const LABEL_PREFIX: &str = "Reference";

/// Label for the reference at 1-based `position`.
pub fn reference_label(position: usize) -> String {
    format!("{LABEL_PREFIX} {position}")
}

/// Read and decode an image file into RGB, upright.
pub(crate) async fn read_rgb(path: &Path) -> Result<RgbImage, String> {
    let bytes = tokio::fs::read(path).await.map_err(|e| e.to_string())?;
    decode_upright(&bytes).map_err(|e| e.to_string())
}

/// Decode with the EXIF orientation applied, so a portrait phone photo
/// comes out portrait.
fn decode_upright(bytes: &[u8]) -> image::ImageResult<RgbImage> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut decoded = DynamicImage::from_decoder(decoder)?;
    decoded.apply_orientation(orientation);
    Ok(decoded.to_rgb8())
}

/// Extract one descriptor per reference photo, in list order.
///
/// Photos without a detectable face, or that cannot be read, are skipped
/// with a log line. Only an empty result is an error.
pub async fn build_reference_set<B: VisionBackend>(
    backend: &mut B,
    locations: &[PathBuf],
) -> Result<Vec<LabeledDescriptor>, SessionError> {
    let mut references = Vec::with_capacity(locations.len());

    for (index, path) in locations.iter().enumerate() {
        let label = reference_label(index + 1);

        let image = match read_rgb(path).await {
            Ok(image) => image,
            Err(reason) => {
                tracing::error!(path = %path.display(), %reason, "failed to load reference image");
                continue;
            }
        };

        match backend.detect_single(&image) {
            Ok(Some(detection)) => {
                tracing::info!(%label, path = %path.display(), "reference face loaded");
                references.push(LabeledDescriptor::new(label, detection.descriptor));
            }
            Ok(None) => {
                tracing::warn!(path = %path.display(), "no face detected in reference image");
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to process reference image");
            }
        }
    }

    if references.is_empty() {
        return Err(SessionError::ReferenceSetEmpty);
    }

    Ok(references)
}
