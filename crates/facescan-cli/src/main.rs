use anyhow::Result;
use clap::Parser;
use facescan_session::models::onnx_loader;
use facescan_session::{run_session, Config};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod discover;
mod results;
mod terminal;

use results::ResultsDir;
use terminal::TerminalPresenter;

#[derive(Parser)]
#[command(name = "facescan", about = "Scan photos for faces resembling the reference set")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing det_10g.onnx and w600k_r50.onnx
    #[arg(long)]
    models: Option<PathBuf>,

    /// Directory containing the reference photos
    #[arg(long)]
    references: Option<PathBuf>,

    /// Directory annotated matches are written to
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Photos or directories of photos to scan
    paths: Vec<PathBuf>,
}

impl Cli {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(dir) = &self.models {
            config.model_dir = dir.clone();
        }
        if let Some(dir) = &self.references {
            config.reference_dir = dir.clone();
        }
        if let Some(dir) = &self.out {
            config.results_dir = dir.clone();
        }
        config
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.apply(Config::load(cli.config.as_deref())?);
    tracing::debug!(?config, "configuration loaded");

    let mut exclude = config.reference_paths();
    exclude.push(config.results_dir.clone());
    let uploads = discover::discover_uploads(&cli.paths, &exclude);
    let mut presenter = TerminalPresenter::new(ResultsDir::create(&config.results_dir)?)?;

    let outcome = run_session(&config, uploads, onnx_loader(config.model_dir.clone()), &mut presenter).await;
    presenter.finish()?;
    println!("{}", presenter.status());

    let summary = outcome?;
    if summary.matched_images > 0 {
        println!(
            "{} annotated photo(s) written to {}",
            presenter.results().pair_count(),
            presenter.results().path().display()
        );
    }
    if summary.skipped > 0 {
        println!("{} photo(s) could not be read and were skipped", summary.skipped);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from(["facescan", "--models", "/m", "-o", "/out", "a.jpg", "photos/"]);
        let config = cli.apply(Config::default());

        assert_eq!(config.model_dir, PathBuf::from("/m"));
        assert_eq!(config.results_dir, PathBuf::from("/out"));
        assert_eq!(config.reference_dir, PathBuf::from("."));
        assert_eq!(cli.paths, vec![PathBuf::from("a.jpg"), PathBuf::from("photos/")]);
    }

    #[test]
    fn test_no_paths_is_allowed() {
        let cli = Cli::parse_from(["facescan"]);
        assert!(cli.paths.is_empty());
    }
}
