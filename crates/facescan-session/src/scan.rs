//! The scan pipeline: every upload, one at a time, detect → match → annotate.

use crate::annotate::draw_annotation;
use crate::error::SessionError;
use crate::presenter::{percent, AnnotatedImage, Annotation, Presenter};
use crate::references::read_rgb;
use crate::session::{ScanSession, Upload};
use facescan_core::{FaceMatcher, Tier, VisionBackend, ACCEPTANCE_THRESHOLD};
use image::{DynamicImage, RgbImage};

/// Scan every upload in order, updating progress after each one.
///
/// Undecodable uploads raise an alert and are skipped; vision errors end
/// the scan.
pub async fn scan_uploads<B, P>(
    session: &mut ScanSession,
    backend: &mut B,
    presenter: &mut P,
) -> Result<(), SessionError>
where
    B: VisionBackend,
    P: Presenter,
{
    if session.uploads().is_empty() {
        return Err(SessionError::NoUploads);
    }
    if session.reference_set.is_empty() {
        return Err(SessionError::NoReferences);
    }

    let matcher = FaceMatcher::new(session.reference_set.clone(), ACCEPTANCE_THRESHOLD);
    let total = session.total();

    for index in 0..total {
        let upload = session.uploads()[index].clone();
        presenter.set_status(&format!(
            "Status: Scanning photo {} of {total}...",
            session.completed() + 1
        ));

        match load_upload(&upload).await {
            Ok(image) => {
                let labels_before = session.match_labels().len();
                if let Some(annotated) = scan_image(session, &matcher, backend, &upload, image)? {
                    tracing::info!(
                        upload = %upload.name,
                        matches = session.match_labels().len() - labels_before,
                        "potential match found"
                    );
                    session.record_matched_image();
                    presenter.show_match(annotated)?;
                }
            }
            Err(e) => {
                if let SessionError::ImageDecode { reason, .. } = &e {
                    tracing::warn!(upload = %upload.name, %reason, "skipping unreadable upload");
                }
                presenter.alert(&e.to_string());
                session.record_skipped();
            }
        }

        let completed = session.advance();
        tracing::debug!(completed, total, percent = percent(completed, total), "scan progress");
        presenter.set_progress(completed, total);
    }

    Ok(())
}

async fn load_upload(upload: &Upload) -> Result<RgbImage, SessionError> {
    read_rgb(upload.path())
        .await
        .map_err(|reason| SessionError::ImageDecode {
            name: upload.name.clone(),
            reason,
        })
}

/// Detect, match and annotate one photo. Returns the annotated surface only
/// when at least one face matched a reference.
fn scan_image<B: VisionBackend>(
    session: &mut ScanSession,
    matcher: &FaceMatcher,
    backend: &mut B,
    upload: &Upload,
    image: RgbImage,
) -> Result<Option<AnnotatedImage>, SessionError> {
    let detections = backend.detect_all(&image)?;
    tracing::debug!(upload = %upload.name, faces = detections.len(), "faces detected");

    let mut annotations = Vec::new();
    for detection in detections {
        let best = matcher.find_best_match(&detection.descriptor);
        let Some(label) = best.label else {
            continue;
        };

        session.record_match(label.clone());
        let tier = Tier::classify(best.distance);
        tracing::debug!(%label, distance = best.distance, ?tier, "face matched");

        annotations.push(Annotation {
            caption: tier.caption(&label),
            label,
            distance: best.distance,
            tier,
            bbox: detection.bbox,
        });
    }

    if annotations.is_empty() {
        return Ok(None);
    }

    let mut surface = DynamicImage::ImageRgb8(image).into_rgba8();
    for annotation in &annotations {
        draw_annotation(&mut surface, annotation);
    }

    Ok(Some(AnnotatedImage {
        name: upload.name.clone(),
        source: upload.path.clone(),
        annotated: surface,
        annotations,
    }))
}
