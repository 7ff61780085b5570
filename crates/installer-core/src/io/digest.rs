//! SHA-256 digest computation.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use installer_schema::Sha256Hash;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::config::ToolMode;
use crate::error::{InstallError, Result};
use crate::host::{Host, Invocation};

/// How the actual digest of a downloaded file is computed.
#[derive(Clone)]
pub enum Digester {
    /// In-process SHA-256.
    Native,
    /// `sha256sum <file>`
    Sha256sum(Arc<dyn Host>),
    /// `shasum -a 256 <file>`
    Shasum(Arc<dyn Host>),
    /// No tool found; verification will be skipped (or refused in strict mode).
    Unavailable,
}

impl std::fmt::Debug for Digester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Native => "Native",
            Self::Sha256sum(_) => "Sha256sum",
            Self::Shasum(_) => "Shasum",
            Self::Unavailable => "Unavailable",
        })
    }
}

impl Digester {
    pub fn detect(mode: ToolMode, host: Arc<dyn Host>) -> Self {
        match mode {
            ToolMode::Native => Self::Native,
            ToolMode::System if host.has_command("sha256sum") => Self::Sha256sum(host),
            ToolMode::System if host.has_command("shasum") => Self::Shasum(host),
            ToolMode::System => {
                info!("no sha256sum or shasum on PATH");
                Self::Unavailable
            }
        }
    }

    /// Digest of `path`, or `None` when no tool is available.
    pub fn digest(&self, path: &Path) -> Result<Option<Sha256Hash>> {
        match self {
            Self::Native => sha256_file(path).map(Some),
            Self::Sha256sum(host) => {
                let out = host.output(&Invocation::new("sha256sum").arg(path))?;
                first_field(&out).map(Some)
            }
            Self::Shasum(host) => {
                let out = host.output(&Invocation::new("shasum").args(["-a", "256"]).arg(path))?;
                first_field(&out).map(Some)
            }
            Self::Unavailable => Ok(None),
        }
    }
}

/// Stream a file through SHA-256.
pub fn sha256_file(path: &Path) -> Result<Sha256Hash> {
    let mut hasher = Sha256::new();
    let mut file = File::open(path)?;
    let mut buffer = [0u8; 8192];
    loop {
        let count = file.read(&mut buffer)?;
        if count == 0 {
            break;
        }
        hasher.update(&buffer[..count]);
    }
    Ok(Sha256Hash::new(hex::encode(hasher.finalize())))
}

fn first_field(output: &str) -> Result<Sha256Hash> {
    output
        .split_whitespace()
        .next()
        .map(Sha256Hash::from)
        .ok_or_else(|| InstallError::context("Digest tool produced no output", output.trim()))
}
