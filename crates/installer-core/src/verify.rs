//! Checksum manifest lookup and artifact verification.

use std::path::Path;

use installer_schema::Sha256Hash;
use tracing::{debug, warn};

use crate::error::{InstallError, Result};
use crate::io::digest::Digester;

/// Result of a verification that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Verified(Sha256Hash),
    /// No digest tool was available and strict mode was off.
    Skipped,
}

/// Find the digest recorded for `asset` in `digest  filename` lines.
///
/// The file name must match exactly; a leading `*` (binary mode marker) is
/// tolerated.
pub fn expected_digest(manifest: &str, asset: &str) -> Option<Sha256Hash> {
    manifest.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        let digest = parts.next()?;
        let filename = parts.next()?.trim_start_matches('*');
        (filename == asset).then(|| Sha256Hash::from(digest))
    })
}

/// Compare the artifact against its manifest record.
pub fn verify_artifact(
    archive: &Path,
    manifest_path: &Path,
    asset: &str,
    digester: &Digester,
    strict: bool,
) -> Result<Verification> {
    let manifest = std::fs::read_to_string(manifest_path)?;
    let expected = expected_digest(&manifest, asset).ok_or_else(|| {
        InstallError::ChecksumRecordMissing {
            asset: asset.to_string(),
            manifest: manifest_path.to_path_buf(),
        }
    })?;

    let Some(actual) = digester.digest(archive)? else {
        if strict {
            return Err(InstallError::MissingDependency(
                "sha256sum or shasum is required when strict checksum verification is enabled"
                    .to_string(),
            ));
        }
        warn!(asset, "no SHA-256 tool available, skipping checksum verification");
        return Ok(Verification::Skipped);
    };

    if !actual.matches(&expected) {
        return Err(InstallError::ChecksumMismatch {
            asset: asset.to_string(),
            expected,
            actual,
        });
    }

    debug!(asset, digest = %actual, "checksum verified");
    Ok(Verification::Verified(actual))
}
