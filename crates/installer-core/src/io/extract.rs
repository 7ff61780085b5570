//! Zip extraction and executable lookup.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::config::ToolMode;
use crate::error::{InstallError, Result};
use crate::host::{Host, Invocation};

#[derive(Clone)]
pub enum Extractor {
    /// In-process zip support.
    Native,
    /// `unzip -q <archive> -d <dest>`
    Unzip(Arc<dyn Host>),
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Native => "Native",
            Self::Unzip(_) => "Unzip",
        })
    }
}

impl Extractor {
    /// In system mode `unzip` is mandatory.
    pub fn detect(mode: ToolMode, host: Arc<dyn Host>) -> Result<Self> {
        match mode {
            ToolMode::Native => Ok(Self::Native),
            ToolMode::System if host.has_command("unzip") => Ok(Self::Unzip(host)),
            ToolMode::System => Err(InstallError::MissingDependency(
                "unzip is required to install the binary archive".to_string(),
            )),
        }
    }

    /// Extract `archive` into `dest`, creating it if needed.
    pub fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        std::fs::create_dir_all(dest)?;
        debug!(archive = %archive.display(), dest = %dest.display(), "extracting");
        match self {
            Self::Native => {
                let file = File::open(archive)?;
                let mut zip = ZipArchive::new(file)?;
                zip.extract(dest)?;
                Ok(())
            }
            Self::Unzip(host) => host.run(
                &Invocation::new("unzip")
                    .args(["-q", "-o"])
                    .arg(archive)
                    .arg("-d")
                    .arg(dest),
            ),
        }
    }
}

/// First regular file called `name` under `root`, depth-first with entries
/// visited in name order.
pub fn find_file(root: &Path, name: &str) -> Result<Option<PathBuf>> {
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && entry.file_name() == name {
            return Ok(Some(entry.into_path()));
        }
    }
    Ok(None)
}
