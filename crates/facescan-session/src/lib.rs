//! facescan-session: One upload → scan → report run.
//!
//! Loads the vision models, builds the labeled reference set, then scans the
//! uploaded photos one after another, annotating faces that resemble a
//! reference and reporting progress through a [`Presenter`].

pub mod annotate;
pub mod config;
pub mod error;
mod font;
pub mod models;
pub mod presenter;
pub mod references;
pub mod scan;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Config, ConfigError};
pub use error::SessionError;
pub use presenter::{AnnotatedImage, Annotation, PresentError, Presenter};
pub use session::{run_session, ScanSession, ScanSummary, Upload};
