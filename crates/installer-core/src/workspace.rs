//! Scoped temporary workspace for downloads and extraction.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{InstallError, Result};

/// A disposable directory owning every file the installer downloads.
///
/// Dropping the workspace removes the directory. The pipeline holds it for
/// the whole run, so it is removed exactly once whether the run succeeds,
/// fails, or is cancelled.
#[derive(Debug)]
pub struct Workspace {
    temp_dir: tempfile::TempDir,
}

impl Workspace {
    /// Create a new workspace under the system temp directory.
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::Builder::new()
            .prefix("azion-install-")
            .tempdir()
            .map_err(|e| InstallError::context("Failed to create temporary workspace", e))?;

        debug!(path = %temp_dir.path().display(), "created workspace");
        Ok(Self { temp_dir })
    }

    /// Create a workspace inside `parent` (tests and custom temp roots).
    pub fn new_in(parent: &Path) -> Result<Self> {
        let temp_dir = tempfile::Builder::new()
            .prefix("azion-install-")
            .tempdir_in(parent)
            .map_err(|e| InstallError::context("Failed to create temporary workspace", e))?;
        Ok(Self { temp_dir })
    }

    /// Access the root path
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path for a downloaded file.
    pub fn file(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Fresh subdirectory for archive extraction.
    pub fn extract_dir(&self) -> Result<PathBuf> {
        let dir = self.temp_dir.path().join("extract");
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
