//! Error taxonomy for the install pipeline.
//!
//! Every variant is fatal. The only degraded path (no digest tool in
//! non-strict system mode) never produces an error at all.

use installer_schema::{PlatformError, Sha256Hash};
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Exit status for any fatal error.
pub const EXIT_FAILURE: u8 = 1;

/// Exit status when the run was interrupted.
pub const EXIT_INTERRUPTED: u8 = 130;

#[derive(Error, Debug)]
pub enum InstallError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("{0}")]
    MissingDependency(String),

    #[error("failed to resolve the latest release: {0}")]
    VersionResolution(String),

    #[error("download failed for {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("checksum not found for {asset} in {manifest}")]
    ChecksumRecordMissing { asset: String, manifest: PathBuf },

    #[error("checksum mismatch for {asset}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        asset: String,
        expected: Sha256Hash,
        actual: Sha256Hash,
    },

    #[error("binary '{name}' not found in {archive}")]
    BinaryNotFound { name: String, archive: PathBuf },

    #[error("command `{command}` failed with {status}")]
    Subprocess { command: String, status: ExitStatus },

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{context}: {message}")]
    Context {
        context: &'static str,
        message: String,
    },

    #[error("interrupted")]
    Interrupted,
}

impl InstallError {
    /// Create an error with context for better debugging.
    pub fn context(ctx: &'static str, msg: impl std::fmt::Display) -> Self {
        Self::Context {
            context: ctx,
            message: msg.to_string(),
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Interrupted => EXIT_INTERRUPTED,
            _ => EXIT_FAILURE,
        }
    }
}

impl From<walkdir::Error> for InstallError {
    fn from(err: walkdir::Error) -> Self {
        Self::context("Failed to walk extracted archive", err)
    }
}

pub type Result<T, E = InstallError> = std::result::Result<T, E>;
