use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Reference photos, in label order ("Reference 1" is the first).
pub const DEFAULT_REFERENCE_IMAGES: [&str; 3] = ["reference1.jpg", "reference2.jpg", "reference3.jpg"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Session configuration: TOML file, then `FACESCAN_*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory containing the ONNX model files.
    pub model_dir: PathBuf,
    /// Directory the reference photos are resolved against.
    pub reference_dir: PathBuf,
    /// Reference photo file names, in label order.
    pub reference_images: Vec<String>,
    /// Where annotated matches are written.
    pub results_dir: PathBuf,
    /// Who to contact about a suspected match.
    pub contact: String,
    /// Upper bound on model loading, in seconds.
    pub model_load_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            reference_dir: PathBuf::from("."),
            reference_images: DEFAULT_REFERENCE_IMAGES.iter().map(|s| s.to_string()).collect(),
            results_dir: PathBuf::from("results"),
            contact: "the search coordinator".to_string(),
            model_load_timeout_secs: 120,
        }
    }
}

impl Config {
    /// Load from an optional TOML file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `FACESCAN_*` overrides from `lookup`. Unparseable values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup("FACESCAN_MODEL_DIR") {
            self.model_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("FACESCAN_REFERENCE_DIR") {
            self.reference_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("FACESCAN_RESULTS_DIR") {
            self.results_dir = PathBuf::from(dir);
        }
        if let Some(contact) = lookup("FACESCAN_CONTACT") {
            self.contact = contact;
        }
        if let Some(secs) = parse_var(&lookup, "FACESCAN_MODEL_LOAD_TIMEOUT_SECS") {
            self.model_load_timeout_secs = secs;
        }
        self
    }

    /// Reference photo paths, in label order.
    pub fn reference_paths(&self) -> Vec<PathBuf> {
        self.reference_images
            .iter()
            .map(|name| self.reference_dir.join(name))
            .collect()
    }

    pub fn model_load_timeout(&self) -> Duration {
        Duration::from_secs(self.model_load_timeout_secs)
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}
