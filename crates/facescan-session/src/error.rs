use crate::presenter::PresentError;
use facescan_core::VisionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to load face models: {0}")]
    ModelLoad(#[source] VisionError),
    #[error("timed out loading face models after {0}s")]
    ModelLoadTimeout(u64),
    #[error("model loading task failed: {0}")]
    ModelLoadTask(String),
    #[error("No valid reference images were processed.")]
    ReferenceSetEmpty,
    #[error("no images found.")]
    NoUploads,
    #[error("No reference images loaded.")]
    NoReferences,
    #[error("Error loading image: {name}")]
    ImageDecode { name: String, reason: String },
    #[error("face analysis failed: {0}")]
    Vision(#[from] VisionError),
    #[error("failed to present results: {0}")]
    Present(#[from] PresentError),
}

impl SessionError {
    /// Status line shown when this error ends a session.
    pub fn status_text(&self) -> String {
        format!("Error: {self}")
    }

    /// Errors that cost one photo rather than the whole session.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SessionError::ImageDecode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_status_texts() {
        assert_eq!(SessionError::NoUploads.status_text(), "Error: no images found.");
        assert_eq!(SessionError::NoReferences.status_text(), "Error: No reference images loaded.");
        assert_eq!(
            SessionError::ReferenceSetEmpty.status_text(),
            "Error: No valid reference images were processed."
        );
    }

    #[test]
    fn test_only_decode_errors_are_recoverable() {
        let decode = SessionError::ImageDecode {
            name: "a.jpg".into(),
            reason: "truncated".into(),
        };
        assert!(decode.is_recoverable());
        assert_eq!(decode.to_string(), "Error loading image: a.jpg");
        assert!(!SessionError::ReferenceSetEmpty.is_recoverable());
        assert!(!SessionError::ModelLoadTimeout(3).is_recoverable());
    }
}
