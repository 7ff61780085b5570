//! Shell startup file editing so the install directory lands on `PATH`.

use std::ffi::OsStr;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{InstallError, Result};

/// Comment written above the export line.
pub const PROFILE_MARKER: &str = "# Added by the Azion CLI installer";

/// Interactive-shell files, each used when present.
const INTERACTIVE_FILES: [&str; 2] = [".bashrc", ".zshrc"];

/// Login-shell files; only the first one present is used.
const LOGIN_FILES: [&str; 2] = [".bash_profile", ".profile"];

/// Created when none of the above exist.
const FALLBACK_FILE: &str = ".bashrc";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathUpdate {
    /// Files that received an export line, in the order they were edited.
    pub updated: Vec<PathBuf>,
    /// The directory was not on the current `PATH`, so a new shell is needed.
    pub needs_reload: bool,
}

/// Whether `dir` is an exact segment of `path_env`.
pub fn path_contains(path_env: &OsStr, dir: &Path) -> bool {
    std::env::split_paths(path_env).any(|p| p == dir)
}

/// Startup files to edit under `home`, in priority order.
pub fn candidate_files(home: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = INTERACTIVE_FILES
        .iter()
        .map(|name| home.join(name))
        .filter(|p| p.is_file())
        .collect();

    if let Some(login) = LOGIN_FILES
        .iter()
        .map(|name| home.join(name))
        .find(|p| p.is_file())
    {
        files.push(login);
    }

    if files.is_empty() {
        files.push(home.join(FALLBACK_FILE));
    }
    files
}

/// The lines appended to a startup file.
pub fn export_snippet(dir: &Path) -> String {
    format!(
        "\n{PROFILE_MARKER}\nexport PATH=\"{}:$PATH\"\n",
        dir.display()
    )
}

/// Make `install_dir` reachable from future shells.
///
/// A file that already mentions the directory is left alone, so running
/// this repeatedly never duplicates the export.
pub fn configure_path(install_dir: &Path, path_env: &OsStr, home: &Path) -> Result<PathUpdate> {
    if path_contains(path_env, install_dir) {
        debug!(dir = %install_dir.display(), "install directory already on PATH");
        return Ok(PathUpdate::default());
    }

    let needle = install_dir.display().to_string();
    let mut updated = Vec::new();

    for file in candidate_files(home) {
        let existing = match std::fs::read_to_string(&file) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(profile_error(&file, e)),
        };

        if existing.contains(&needle) {
            debug!(file = %file.display(), "already configured");
            continue;
        }

        let mut handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file)
            .map_err(|e| profile_error(&file, e))?;
        handle
            .write_all(export_snippet(install_dir).as_bytes())
            .map_err(|e| profile_error(&file, e))?;

        info!(file = %file.display(), "added install directory to PATH");
        updated.push(file);
    }

    Ok(PathUpdate {
        updated,
        needs_reload: true,
    })
}

fn profile_error(file: &Path, err: std::io::Error) -> InstallError {
    InstallError::context(
        "Failed to update shell profile",
        format!("{}: {err}", file.display()),
    )
}
