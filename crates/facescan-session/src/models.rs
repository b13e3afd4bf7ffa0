//! Model loading, moved off the session task and bounded by a timeout.

use crate::error::SessionError;
use facescan_core::{OnnxBackend, VisionError};
use std::path::PathBuf;
use std::time::Duration;

/// Run a blocking model loader on the blocking pool and wait for it.
///
/// A loader that outlives `timeout` is abandoned; its thread finishes on its
/// own but the session reports [`SessionError::ModelLoadTimeout`].
pub async fn load_models<B, F>(load: F, timeout: Duration) -> Result<B, SessionError>
where
    F: FnOnce() -> Result<B, VisionError> + Send + 'static,
    B: Send + 'static,
{
    let task = tokio::task::spawn_blocking(load);

    match tokio::time::timeout(timeout, task).await {
        Err(_) => Err(SessionError::ModelLoadTimeout(timeout.as_secs())),
        Ok(Err(join_err)) => Err(SessionError::ModelLoadTask(join_err.to_string())),
        Ok(Ok(loaded)) => loaded.map_err(SessionError::ModelLoad),
    }
}

/// Loader for the ONNX backend in `model_dir`.
pub fn onnx_loader(model_dir: PathBuf) -> impl FnOnce() -> Result<OnnxBackend, VisionError> + Send + 'static {
    move || {
        tracing::info!(dir = %model_dir.display(), "loading face models");
        OnnxBackend::load(&model_dir)
    }
}
