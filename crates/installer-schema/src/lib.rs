//! Shared value types for the Azion CLI installer.
//!
//! Everything here is a closed, immutable description of the host or of a
//! release artifact. Detection and I/O live in `installer-core`.

pub mod arch;
pub mod hash;
pub mod os;
pub mod package_manager;

// Re-exports
pub use arch::*;
pub use hash::*;
pub use os::*;
pub use package_manager::*;

use thiserror::Error;

/// Reasons the host cannot be served by any published release.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// Windows-family host. Carries the raw identifier.
    #[error(
        "this installer does not support Windows ({0}). Download the Windows build from {hint}",
        hint = WINDOWS_DOWNLOAD_HINT
    )]
    Windows(String),

    /// Operating system outside the supported set.
    #[error("unsupported operating system: {0}")]
    UnsupportedOs(String),

    /// Architecture outside the supported set.
    #[error("unsupported architecture: {0}")]
    UnsupportedArch(String),
}

/// Immutable description of the host: operating system plus architecture.
///
/// # Example
///
/// ```
/// use installer_schema::{Arch, Os, Platform};
///
/// let platform = Platform::from_uname("Linux", "x86_64").unwrap();
/// assert_eq!(platform, Platform::new(Os::Linux, Arch::Amd64));
/// assert_eq!(platform.to_string(), "linux_amd64");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Platform {
    /// Operating system family
    pub os: Os,
    /// CPU architecture
    pub arch: Arch,
}

impl Platform {
    /// Build a platform from already-classified parts.
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Classify raw `uname -s` and `uname -m` output.
    ///
    /// The operating system is checked first, so a Windows host is reported
    /// as such even if its machine string is also unknown.
    ///
    /// # Errors
    ///
    /// Returns the first [`PlatformError`] encountered.
    pub fn from_uname(sysname: &str, machine: &str) -> Result<Self, PlatformError> {
        let os = Os::detect_from(sysname)?;
        let arch = Arch::normalize(machine)?;
        Ok(Self { os, arch })
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.os, self.arch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_error_wins_over_arch_error() {
        let err = Platform::from_uname("Windows_NT", "weird").unwrap_err();
        assert!(matches!(err, PlatformError::Windows(_)));
    }

    #[test]
    fn display_joins_tokens() {
        let platform = Platform::new(Os::Darwin, Arch::Arm64);
        assert_eq!(platform.to_string(), "darwin_arm64");
    }
}
