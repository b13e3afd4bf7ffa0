//! Results directory: original/annotated pairs plus a manifest and an HTML
//! page showing them side by side.

use facescan_session::{AnnotatedImage, Annotation, PresentError};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const MANIFEST: &str = "matches.json";
const INDEX: &str = "index.html";

#[derive(Debug, Serialize)]
struct ResultEntry {
    upload: String,
    source: PathBuf,
    original: String,
    annotated: String,
    annotations: Vec<Annotation>,
}

pub struct ResultsDir {
    dir: PathBuf,
    entries: Vec<ResultEntry>,
}

impl ResultsDir {
    pub fn create(dir: &Path) -> std::io::Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            entries: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn pair_count(&self) -> usize {
        self.entries.len()
    }

    /// Remove output from a previous run. Only files this writer produces
    /// are touched.
    pub fn clear(&mut self) -> std::io::Result<()> {
        self.entries.clear();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            if path.is_file() && is_generated(&name) {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    /// Copy the original and save the annotated surface as PNG.
    pub fn write_pair(&mut self, image: &AnnotatedImage) -> Result<(), PresentError> {
        let index = self.entries.len() + 1;
        let stem = image
            .source
            .file_stem()
            .map(|s| sanitize(&s.to_string_lossy()))
            .unwrap_or_else(|| "upload".to_string());
        let ext = image
            .source
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "img".to_string());

        let original = format!("{index:03}-{stem}-original.{ext}");
        let annotated = format!("{index:03}-{stem}-annotated.png");

        let original_path = self.dir.join(&original);
        fs::copy(&image.source, &original_path)?;
        if let Err(e) = image.annotated.save(self.dir.join(&annotated)) {
            // no manifest entry will point at a lone original
            if let Err(cleanup) = fs::remove_file(&original_path) {
                tracing::warn!(path = %original_path.display(), error = %cleanup, "failed to remove orphaned original");
            }
            return Err(e.into());
        }

        self.entries.push(ResultEntry {
            upload: image.name.clone(),
            source: image.source.clone(),
            original,
            annotated,
            annotations: image.annotations.clone(),
        });
        Ok(())
    }

    /// Write `matches.json` and `index.html` for the pairs written so far.
    pub fn finish(&self) -> anyhow::Result<()> {
        let manifest = serde_json::to_string_pretty(&self.entries)?;
        fs::write(self.dir.join(MANIFEST), manifest)?;
        fs::write(self.dir.join(INDEX), self.render_index())?;
        Ok(())
    }

    fn render_index(&self) -> String {
        let mut html = String::from(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>facescan results</title>\n\
             <style>.pair{display:flex;gap:8px;margin-bottom:16px}.pair img{max-width:48%}</style>\n\
             </head>\n<body>\n",
        );
        if self.entries.is_empty() {
            html.push_str("<p>No matches found.</p>\n");
        }
        for entry in &self.entries {
            let captions: Vec<String> = entry
                .annotations
                .iter()
                .map(|a| format!("{} ({:.2})", escape(&a.caption), a.distance))
                .collect();
            html.push_str(&format!(
                "<h3>{}</h3>\n<p>{}</p>\n<div class=\"pair\"><img src=\"{}\"><img src=\"{}\"></div>\n",
                escape(&entry.upload),
                captions.join(", "),
                escape(&entry.original),
                escape(&entry.annotated),
            ));
        }
        html.push_str("</body>\n</html>\n");
        html
    }
}

fn is_generated(name: &str) -> bool {
    let bytes = name.as_bytes();
    let numbered = bytes.len() > 4 && bytes[..3].iter().all(u8::is_ascii_digit) && bytes[3] == b'-';
    name == MANIFEST
        || name == INDEX
        || (numbered && (name.contains("-original.") || name.ends_with("-annotated.png")))
}

fn sanitize(stem: &str) -> String {
    stem.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
