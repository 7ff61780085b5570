//! Package manager selection and artifact formats.

/// System package manager the installer can hand an artifact to.
///
/// Selection is a priority-ordered check performed by the core crate; this
/// type only carries what each manager needs: the tools that prove it is
/// present and the artifact format it consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    /// Homebrew on macOS. Installs by formula name, no artifact download.
    Homebrew,
    /// Debian family (`apt-get` + `dpkg`)
    Apt,
    /// Modern Red Hat family (`dnf`)
    Dnf,
    /// Legacy Red Hat family (`yum`)
    Yum,
    /// Alpine (`apk`)
    Apk,
}

impl PackageManager {
    /// Linux managers in detection order.
    pub const LINUX_PRIORITY: [Self; 4] = [Self::Apt, Self::Dnf, Self::Yum, Self::Apk];

    /// Executables that must all be on `PATH` for this manager to be selected.
    pub fn required_tools(&self) -> &'static [&'static str] {
        match self {
            Self::Homebrew => &["brew"],
            Self::Apt => &["apt-get", "dpkg"],
            Self::Dnf => &["dnf"],
            Self::Yum => &["yum"],
            Self::Apk => &["apk"],
        }
    }

    /// Artifact format this manager installs, or `None` for Homebrew.
    pub fn package_format(&self) -> Option<PackageFormat> {
        match self {
            Self::Homebrew => None,
            Self::Apt => Some(PackageFormat::Deb),
            Self::Dnf | Self::Yum => Some(PackageFormat::Rpm),
            Self::Apk => Some(PackageFormat::Apk),
        }
    }

    /// Short lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Homebrew => "homebrew",
            Self::Apt => "apt",
            Self::Dnf => "dnf",
            Self::Yum => "yum",
            Self::Apk => "apk",
        }
    }
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Artifact format published on the release host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageFormat {
    /// Debian package
    Deb,
    /// RPM package
    Rpm,
    /// Alpine package
    Apk,
    /// Zip archive holding the bare binary
    Zip,
}

impl PackageFormat {
    /// File extension used in asset names.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Deb => "deb",
            Self::Rpm => "rpm",
            Self::Apk => "apk",
            Self::Zip => "zip",
        }
    }
}

impl std::fmt::Display for PackageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}
