//! Session state and the end-to-end run: load models → load references →
//! scan every upload → report.

use crate::config::Config;
use crate::error::SessionError;
use crate::models::load_models;
use crate::presenter::Presenter;
use crate::references::build_reference_set;
use crate::scan::scan_uploads;
use facescan_core::{LabeledDescriptor, VisionBackend, VisionError};
use std::path::{Path, PathBuf};

/// A user-selected photo awaiting its scan.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub path: PathBuf,
    pub name: String,
}

impl Upload {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// State of one scan run. Created fresh per run.
#[derive(Debug, Default)]
pub struct ScanSession {
    pub reference_set: Vec<LabeledDescriptor>,
    uploads: Vec<Upload>,
    completed: usize,
    skipped: usize,
    matched_images: usize,
    match_labels: Vec<String>,
}

impl ScanSession {
    pub fn new(uploads: Vec<Upload>) -> Self {
        Self {
            uploads,
            ..Self::default()
        }
    }

    pub fn uploads(&self) -> &[Upload] {
        &self.uploads
    }

    pub fn total(&self) -> usize {
        self.uploads.len()
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn match_labels(&self) -> &[String] {
        &self.match_labels
    }

    pub(crate) fn record_match(&mut self, label: String) {
        self.match_labels.push(label);
    }

    pub(crate) fn record_matched_image(&mut self) {
        self.matched_images += 1;
    }

    pub(crate) fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Count one more upload as done. Never passes the number of uploads.
    pub(crate) fn advance(&mut self) -> usize {
        debug_assert!(self.completed < self.uploads.len(), "advanced past the last upload");
        self.completed = (self.completed + 1).min(self.uploads.len());
        self.completed
    }

    pub fn summary(&self) -> ScanSummary {
        ScanSummary {
            scanned: self.completed - self.skipped,
            skipped: self.skipped,
            matched_images: self.matched_images,
            match_labels: self.match_labels.clone(),
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSummary {
    pub scanned: usize,
    pub skipped: usize,
    pub matched_images: usize,
    /// One entry per matched face, in scan order.
    pub match_labels: Vec<String>,
}

/// Final status line for a finished scan.
pub fn final_status(match_count: usize, contact: &str) -> String {
    if match_count > 0 {
        format!(
            "Status: Scanning complete. {match_count} potential matches found, please review them manually and contact {contact} if you think you have found a match."
        )
    } else {
        "Status: Scanning complete. No matches found.".to_string()
    }
}

/// Run one complete session over `uploads`.
///
/// The presenter is busy for the whole run. A fatal error is shown as the
/// status line before it is returned.
pub async fn run_session<B, F, P>(
    config: &Config,
    uploads: Vec<Upload>,
    load: F,
    presenter: &mut P,
) -> Result<ScanSummary, SessionError>
where
    B: VisionBackend + Send + 'static,
    F: FnOnce() -> Result<B, VisionError> + Send + 'static,
    P: Presenter,
{
    let mut session = ScanSession::new(uploads);

    presenter.clear_results();
    presenter.set_busy(true);
    presenter.set_progress(0, session.total());

    let result = run_stages(config, &mut session, load, presenter).await;
    match &result {
        Ok(summary) => tracing::info!(
            scanned = summary.scanned,
            skipped = summary.skipped,
            matches = summary.match_labels.len(),
            "scan session complete"
        ),
        Err(e) => {
            tracing::error!(error = %e, "scan session aborted");
            presenter.set_status(&e.status_text());
        }
    }

    presenter.set_busy(false);
    result
}

async fn run_stages<B, F, P>(
    config: &Config,
    session: &mut ScanSession,
    load: F,
    presenter: &mut P,
) -> Result<ScanSummary, SessionError>
where
    B: VisionBackend + Send + 'static,
    F: FnOnce() -> Result<B, VisionError> + Send + 'static,
    P: Presenter,
{
    if session.uploads().is_empty() {
        return Err(SessionError::NoUploads);
    }

    presenter.set_status("Status: Loading face models...");
    let mut backend = load_models(load, config.model_load_timeout()).await?;

    presenter.set_status("Status: Loading reference images...");
    session.reference_set = build_reference_set(&mut backend, &config.reference_paths()).await?;
    presenter.set_status("Status: Reference images loaded. Ready to scan.");

    presenter.set_status("Status: Starting scan...");
    scan_uploads(session, &mut backend, presenter).await?;

    presenter.set_status(&final_status(session.match_labels().len(), &config.contact));
    Ok(session.summary())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{face_at, write_image, FakeBackend, RecordingPresenter};
    use facescan_core::Tier;

    fn config_for(dir: &Path) -> Config {
        Config {
            reference_dir: dir.to_path_buf(),
            reference_images: vec!["r1.png".into(), "r2.png".into(), "r3.png".into()],
            contact: "the coordinator".into(),
            ..Config::default()
        }
    }

    fn reference_backend() -> FakeBackend {
        FakeBackend::default()
            .with_faces((10, 10), vec![face_at(vec![1.0, 0.0, 0.0], 1.0, 1.0, 5.0)])
            .with_faces((11, 11), vec![face_at(vec![0.0, 1.0, 0.0], 1.0, 1.0, 5.0)])
            .with_faces((12, 12), vec![face_at(vec![0.0, 0.0, 1.0], 1.0, 1.0, 5.0)])
    }

    fn write_references(dir: &Path) {
        write_image(dir, "r1.png", 10, 10);
        write_image(dir, "r2.png", 11, 11);
        write_image(dir, "r3.png", 12, 12);
    }

    #[test]
    fn test_upload_name_from_path() {
        let upload = Upload::from_path("/photos/holiday/beach.jpg");
        assert_eq!(upload.name, "beach.jpg");
        assert_eq!(upload.path(), Path::new("/photos/holiday/beach.jpg"));
    }

    #[test]
    fn test_advance_never_exceeds_uploads() {
        let mut session = ScanSession::new(vec![Upload::from_path("a.jpg"), Upload::from_path("b.jpg")]);
        assert_eq!(session.advance(), 1);
        assert_eq!(session.advance(), 2);
        assert_eq!(session.completed(), session.total());
    }

    #[test]
    fn test_final_status_texts() {
        assert_eq!(final_status(0, "x"), "Status: Scanning complete. No matches found.");
        assert_eq!(
            final_status(1, "the coordinator"),
            "Status: Scanning complete. 1 potential matches found, please review them manually and contact the coordinator if you think you have found a match."
        );
    }

    #[tokio::test]
    async fn test_one_match_among_two_uploads() {
        let dir = tempfile::tempdir().unwrap();
        write_references(dir.path());
        let match_photo = write_image(dir.path(), "party.png", 40, 40);
        let empty_photo = write_image(dir.path(), "landscape.png", 41, 41);

        // 0.20 from Reference 1, far from the others
        let backend = reference_backend()
            .with_faces((40, 40), vec![face_at(vec![1.0, 0.2, 0.0], 10.0, 15.0, 12.0)]);
        let mut presenter = RecordingPresenter::default();

        let summary = run_session(
            &config_for(dir.path()),
            vec![Upload::from_path(match_photo), Upload::from_path(empty_photo)],
            move || Ok(backend),
            &mut presenter,
        )
        .await
        .unwrap();

        assert_eq!(summary.match_labels, vec!["Reference 1".to_string()]);
        assert_eq!(summary.matched_images, 1);
        assert_eq!(summary.scanned, 2);

        assert_eq!(presenter.shown.len(), 1);
        let shown = &presenter.shown[0];
        assert_eq!(shown.name, "party.png");
        assert_eq!(shown.annotations[0].tier, Tier::Strong);
        assert_eq!(shown.annotations[0].caption, "Looks like Reference 1");
        assert_eq!(shown.annotated.dimensions(), (40, 40));
        assert_eq!(shown.annotated.get_pixel(10, 20).0, [0, 128, 0, 255]);

        assert_eq!(presenter.progress, vec![(0, 2), (1, 2), (2, 2)]);
        assert_eq!(presenter.busy, vec![true, false]);
        assert_eq!(presenter.cleared, 1);
        assert!(presenter.statuses.contains(&"Status: Scanning photo 2 of 2...".to_string()));
        assert!(presenter
            .last_status()
            .starts_with("Status: Scanning complete. 1 potential matches found"));
    }

    #[tokio::test]
    async fn test_faceless_references_stop_before_scan() {
        let dir = tempfile::tempdir().unwrap();
        write_references(dir.path());
        let photo = write_image(dir.path(), "party.png", 40, 40);
        let mut presenter = RecordingPresenter::default();

        let result = run_session(
            &config_for(dir.path()),
            vec![Upload::from_path(photo)],
            || Ok(FakeBackend::default()),
            &mut presenter,
        )
        .await;

        assert!(matches!(result, Err(SessionError::ReferenceSetEmpty)));
        assert_eq!(presenter.last_status(), "Error: No valid reference images were processed.");
        assert!(!presenter.statuses.iter().any(|s| s.starts_with("Status: Scanning photo")));
        assert_eq!(presenter.progress, vec![(0, 1)]);
        assert_eq!(presenter.busy, vec![true, false]);
    }

    #[tokio::test]
    async fn test_no_uploads_fails_before_loading_models() {
        let dir = tempfile::tempdir().unwrap();
        let mut presenter = RecordingPresenter::default();

        let result = run_session(
            &config_for(dir.path()),
            Vec::new(),
            || -> Result<FakeBackend, VisionError> { panic!("models must not load without uploads") },
            &mut presenter,
        )
        .await;

        assert!(matches!(result, Err(SessionError::NoUploads)));
        assert_eq!(presenter.statuses, vec!["Error: no images found.".to_string()]);
        assert_eq!(presenter.busy, vec![true, false]);
    }

    #[tokio::test]
    async fn test_model_load_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let photo = write_image(dir.path(), "party.png", 40, 40);
        let mut presenter = RecordingPresenter::default();

        let result = run_session(
            &config_for(dir.path()),
            vec![Upload::from_path(photo)],
            || {
                Err::<FakeBackend, _>(VisionError::Detector(
                    facescan_core::detector::DetectorError::ModelNotFound("models/det_10g.onnx".into()),
                ))
            },
            &mut presenter,
        )
        .await;

        assert!(matches!(result, Err(SessionError::ModelLoad(_))));
        assert!(presenter.last_status().starts_with("Error: failed to load face models"));
        assert_eq!(presenter.busy, vec![true, false]);
    }
}
