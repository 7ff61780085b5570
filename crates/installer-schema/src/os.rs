//! Operating system classification.

use crate::PlatformError;

/// Where Windows users are sent instead of this installer.
pub const WINDOWS_DOWNLOAD_HINT: &str = "https://github.com/aziontech/azion/releases";

/// Operating system family supported by the release host.
///
/// # Example
///
/// ```
/// use installer_schema::Os;
///
/// assert_eq!(Os::detect_from("Linux").unwrap(), Os::Linux);
/// assert_eq!(Os::detect_from("Darwin").unwrap().as_str(), "darwin");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    /// Linux distributions
    Linux,
    /// macOS
    Darwin,
    /// FreeBSD
    FreeBsd,
}

impl Os {
    /// Classify a system identification string (`uname -s`).
    ///
    /// Matching is case-insensitive and by prefix, so kernel strings with
    /// trailing release information still resolve.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Windows`] for Windows-family identifiers and
    /// [`PlatformError::UnsupportedOs`] for anything else unrecognized.
    pub fn detect_from(raw: &str) -> Result<Self, PlatformError> {
        let lowered = raw.trim().to_lowercase();
        let name = lowered.as_str();

        if name.starts_with("linux") {
            Ok(Self::Linux)
        } else if name.starts_with("darwin") || name == "macos" {
            Ok(Self::Darwin)
        } else if name.starts_with("freebsd") {
            Ok(Self::FreeBsd)
        } else if ["mingw", "msys", "cygwin", "windows"]
            .iter()
            .any(|prefix| name.starts_with(prefix))
        {
            Err(PlatformError::Windows(raw.trim().to_string()))
        } else {
            Err(PlatformError::UnsupportedOs(raw.trim().to_string()))
        }
    }

    /// Operating system this binary was compiled for, as a raw identifier.
    ///
    /// Used when `uname -s` cannot be run.
    pub fn compiled_name() -> &'static str {
        std::env::consts::OS
    }

    /// Token used in release asset names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Darwin => "darwin",
            Self::FreeBsd => "freebsd",
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Os {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::detect_from(s)
    }
}
