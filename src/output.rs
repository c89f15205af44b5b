//! Build directories – one fresh `<root>/<uuid>/` per build run.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{BuildError, Result};

/// File name of the rendered document inside a build directory.
pub const HTML_FILE: &str = "resume.html";
/// File name of the converted document inside a build directory.
pub const PDF_FILE: &str = "resume.pdf";

/// An output directory owned by a single build run.
#[derive(Debug, Clone)]
pub struct BuildDir {
    id: Uuid,
    path: PathBuf,
}

impl BuildDir {
    /// Create `<root>/<uuid>/` (and `root` itself if needed).
    pub fn create(root: &Path) -> Result<Self> {
        let id = Uuid::new_v4();
        let path = root.join(id.to_string());
        fs::create_dir_all(&path).map_err(|e| BuildError::io(&path, e))?;
        log::debug!("created build directory {}", path.display());
        Ok(Self { id, path })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn html_path(&self) -> PathBuf {
        self.path.join(HTML_FILE)
    }

    pub fn pdf_path(&self) -> PathBuf {
        self.path.join(PDF_FILE)
    }

    /// Write the rendered document and return where it went.
    pub fn write_html(&self, html: &str) -> Result<PathBuf> {
        let target = self.html_path();
        fs::write(&target, html).map_err(|e| BuildError::io(&target, e))?;
        log::info!("rendered HTML saved to {}", target.display());
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_nested_root() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("build");
        let dir = BuildDir::create(&root).unwrap();
        assert!(dir.path().is_dir());
        assert_eq!(dir.path().parent(), Some(root.as_path()));
        assert_eq!(
            dir.path().file_name().and_then(|n| n.to_str()),
            Some(dir.id().to_string().as_str())
        );
    }

    #[test]
    fn runs_get_distinct_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let a = BuildDir::create(tmp.path()).unwrap();
        let b = BuildDir::create(tmp.path()).unwrap();
        assert_ne!(a.id(), b.id());
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn html_is_written_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = BuildDir::create(tmp.path()).unwrap();
        let html = "<p><b>ü</b></p>\n";
        let path = dir.write_html(html).unwrap();
        assert_eq!(path, dir.path().join("resume.html"));
        assert_eq!(fs::read_to_string(&path).unwrap(), html);
        assert_eq!(dir.pdf_path(), dir.path().join("resume.pdf"));
        assert!(!dir.pdf_path().exists());
    }
}
