//! CPU architecture classification.

use crate::PlatformError;

/// CPU architecture of the host, using the release host's asset naming.
///
/// Raw machine strings (`uname -m`) are normalized through [`Arch::normalize`],
/// which accepts both the kernel spelling and the release token, so
/// normalizing a token a second time yields the same value.
///
/// # Example
///
/// ```
/// use installer_schema::Arch;
///
/// let arch = Arch::normalize("x86_64").unwrap();
/// assert_eq!(arch.as_str(), "amd64");
/// assert_eq!(Arch::normalize(arch.as_str()).unwrap(), arch);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// 64-bit x86 (`x86_64`, `amd64`)
    Amd64,
    /// 64-bit ARM (`aarch64`, `arm64`)
    Arm64,
    /// 32-bit ARMv7 (`armv7l`, `armv7`)
    Armv7,
    /// 32-bit x86 (`i386`, `i586`, `i686`)
    #[serde(rename = "386")]
    X86,
    /// 64-bit POWER, either endianness (`ppc64`, `ppc64le`)
    Ppc64,
}

impl Arch {
    /// Map a machine identification string to an architecture.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::UnsupportedArch`] for any string outside the
    /// recognized set.
    pub fn normalize(raw: &str) -> Result<Self, PlatformError> {
        match raw.trim().to_lowercase().as_str() {
            "x86_64" | "amd64" => Ok(Self::Amd64),
            "aarch64" | "arm64" => Ok(Self::Arm64),
            "armv7l" | "armv7" => Ok(Self::Armv7),
            "i686" | "i386" | "i586" | "386" => Ok(Self::X86),
            "ppc64" | "ppc64le" => Ok(Self::Ppc64),
            _ => Err(PlatformError::UnsupportedArch(raw.trim().to_string())),
        }
    }

    /// Architecture this binary was compiled for, as a raw machine string.
    ///
    /// Used when `uname -m` cannot be run.
    pub fn compiled_machine() -> &'static str {
        std::env::consts::ARCH
    }

    /// Token used in release asset names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
            Self::Armv7 => "armv7",
            Self::X86 => "386",
            Self::Ppc64 => "ppc64",
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Arch {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}
