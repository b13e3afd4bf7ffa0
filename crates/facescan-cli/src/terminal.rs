use crate::results::ResultsDir;
use facescan_session::{AnnotatedImage, PresentError, Presenter};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar on stderr; matches go to a results directory.
pub struct TerminalPresenter {
    bar: ProgressBar,
    results: ResultsDir,
    status: String,
}

impl TerminalPresenter {
    pub fn new(results: ResultsDir) -> anyhow::Result<Self> {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {percent:>3}% {pos}/{len}\n{wide_msg}")?
            .progress_chars("#>-");

        Ok(Self {
            bar: ProgressBar::new(0).with_style(style),
            results,
            status: String::new(),
        })
    }

    pub fn results(&self) -> &ResultsDir {
        &self.results
    }

    /// Last status line shown.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Stop the bar and write the results manifest.
    pub fn finish(&self) -> anyhow::Result<()> {
        self.bar.finish();
        self.results.finish()
    }
}

impl Presenter for TerminalPresenter {
    fn clear_results(&mut self) {
        if let Err(e) = self.results.clear() {
            tracing::warn!(dir = %self.results.path().display(), error = %e, "failed to clear previous results");
        }
    }

    fn set_status(&mut self, text: &str) {
        self.status = text.to_string();
        self.bar.set_message(self.status.clone());
    }

    fn set_progress(&mut self, completed: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(completed as u64);
    }

    fn set_busy(&mut self, busy: bool) {
        if busy {
            self.bar.enable_steady_tick(Duration::from_millis(120));
        } else {
            self.bar.disable_steady_tick();
        }
    }

    fn alert(&mut self, message: &str) {
        self.bar.suspend(|| eprintln!("{message}"));
    }

    fn show_match(&mut self, image: AnnotatedImage) -> Result<(), PresentError> {
        self.results.write_pair(&image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn test_status_and_matches_reach_results_dir() {
        let input = tempdir().unwrap();
        let source = input.path().join("lake.png");
        RgbImage::from_pixel(6, 6, Rgb([10, 20, 30])).save(&source).unwrap();

        let out = tempdir().unwrap();
        let mut presenter = TerminalPresenter::new(ResultsDir::create(out.path()).unwrap()).unwrap();

        presenter.clear_results();
        presenter.set_busy(true);
        presenter.set_status("Status: Scanning photo 1 of 1...");
        presenter
            .show_match(AnnotatedImage {
                name: "lake.png".to_string(),
                source,
                annotated: RgbaImage::new(6, 6),
                annotations: Vec::new(),
            })
            .unwrap();
        presenter.set_progress(1, 1);
        presenter.set_status("Status: Scanning complete. No matches found.");
        presenter.set_busy(false);
        presenter.finish().unwrap();

        assert_eq!(presenter.status(), "Status: Scanning complete. No matches found.");
        assert_eq!(presenter.results().pair_count(), 1);
        for name in ["001-lake-original.png", "001-lake-annotated.png", "matches.json", "index.html"] {
            assert!(out.path().join(name).is_file(), "missing {name}");
        }
    }
}
