use facescan_session::Upload;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "webp", "bmp", "gif", "tif", "tiff"];

fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Paths that must never be scanned: the results directory and the
/// reference photos. Compared canonically.
struct Excluded(Vec<PathBuf>);

impl Excluded {
    fn new(paths: &[PathBuf]) -> Self {
        Self(paths.iter().map(|p| canonical(p)).collect())
    }

    fn contains(&self, path: &Path) -> bool {
        let path = canonical(path);
        self.0.iter().any(|excluded| path.starts_with(excluded))
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Turn command-line paths into uploads.
///
/// Directories are walked recursively for image files (sorted); any other
/// path is taken as given so a bad file surfaces as a decode alert. Anything
/// at or under an `exclude` path is left out.
pub fn discover_uploads(paths: &[PathBuf], exclude: &[PathBuf]) -> Vec<Upload> {
    let excluded = Excluded::new(exclude);
    let mut uploads = Vec::new();

    for path in paths {
        if excluded.contains(path) {
            tracing::debug!(path = %path.display(), "not scanning excluded path");
            continue;
        }
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .follow_links(false)
                .into_iter()
                .filter_entry(|e| !excluded.contains(e.path()))
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && is_image(e.path()))
                .map(|e| e.into_path())
                .collect();
            found.sort();
            tracing::debug!(dir = %path.display(), images = found.len(), "discovered uploads");
            uploads.extend(found.into_iter().map(Upload::from_path));
        } else {
            uploads.push(Upload::from_path(path.clone()));
        }
    }

    uploads
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    #[test]
    fn test_discover_walks_directories() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("b.JPG")).unwrap();
        File::create(dir.path().join("a.png")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub/c.jpeg")).unwrap();

        let uploads = discover_uploads(&[dir.path().to_path_buf()], &[]);
        let names: Vec<&str> = uploads.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["a.png", "b.JPG", "c.jpeg"]);
    }

    #[test]
    fn test_explicit_files_kept_in_order() {
        let dir = tempdir().unwrap();
        let scan = dir.path().join("scan.pdf");
        File::create(&scan).unwrap();

        let uploads = discover_uploads(&[scan.clone(), dir.path().join("missing.jpg")], &[]);
        assert_eq!(uploads.len(), 2);
        assert_eq!(uploads[0].path, scan);
        assert_eq!(uploads[1].name, "missing.jpg");
    }

    #[test]
    fn test_nothing_given() {
        assert!(discover_uploads(&[], &[]).is_empty());
    }

    #[test]
    fn test_results_and_references_are_not_scanned() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("party.jpg")).unwrap();
        File::create(dir.path().join("reference1.jpg")).unwrap();
        fs::create_dir(dir.path().join("results")).unwrap();
        File::create(dir.path().join("results/001-party-original.jpg")).unwrap();
        File::create(dir.path().join("results/001-party-annotated.png")).unwrap();

        // relative spelling of the same directory must still match
        let results = dir.path().join("sub/../results");
        fs::create_dir(dir.path().join("sub")).unwrap();
        let exclude = vec![results, dir.path().join("reference1.jpg"), dir.path().join("reference2.jpg")];

        let uploads = discover_uploads(&[dir.path().to_path_buf()], &exclude);
        let names: Vec<&str> = uploads.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["party.jpg"]);

        let explicit = discover_uploads(&[dir.path().join("reference1.jpg")], &exclude);
        assert!(explicit.is_empty());
    }
}
