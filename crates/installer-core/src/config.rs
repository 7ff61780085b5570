//! Immutable run configuration.
//!
//! Built once by the CLI from flags and environment variables, then passed
//! by reference to every phase. Nothing in the pipeline mutates it.

use std::path::PathBuf;

/// Latest-release metadata endpoint.
pub const DEFAULT_RELEASES_API: &str =
    "https://api.github.com/repos/aziontech/azion/releases/latest";

/// Base URL that release assets are served under, one directory per version.
pub const DEFAULT_DOWNLOAD_BASE: &str = "https://github.com/aziontech/azion/releases/download";

/// Homebrew formula name.
pub const HOMEBREW_FORMULA: &str = "azion";

/// Which implementation backs HTTP, hashing and archive extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolMode {
    /// Built-in HTTP client, SHA-256 and zip support.
    #[default]
    Native,
    /// External `curl`/`wget`, `sha256sum`/`shasum` and `unzip`.
    System,
}

/// Whether system package managers may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallMethod {
    /// Prefer a detected package manager, fall back to the binary archive.
    #[default]
    Auto,
    /// Always install the binary archive into the install directory.
    Binary,
}

#[derive(Debug, Clone)]
pub struct InstallerConfig {
    /// Pinned release version, used verbatim.
    pub version_pin: Option<String>,
    /// Manual-install target directory.
    pub install_dir: PathBuf,
    /// User home, where shell startup files live.
    pub home: PathBuf,
    pub tools: ToolMode,
    pub method: InstallMethod,
    /// Fail instead of skipping verification when no digest tool exists.
    pub strict_checksum: bool,
    pub releases_api: String,
    pub download_base: String,
}

impl InstallerConfig {
    /// Configuration with the public endpoints and `<home>/.azion/bin`.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            version_pin: None,
            install_dir: crate::paths::default_install_dir(&home),
            home,
            tools: ToolMode::default(),
            method: InstallMethod::default(),
            strict_checksum: false,
            releases_api: DEFAULT_RELEASES_API.to_string(),
            download_base: DEFAULT_DOWNLOAD_BASE.to_string(),
        }
    }

    pub fn with_version_pin(mut self, pin: Option<String>) -> Self {
        // An empty variable counts as unset.
        self.version_pin = pin.filter(|v| !v.trim().is_empty());
        self
    }

    pub fn with_install_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.install_dir = dir;
        }
        self
    }

    pub fn with_tools(mut self, tools: ToolMode) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_method(mut self, method: InstallMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_strict_checksum(mut self, strict: bool) -> Self {
        self.strict_checksum = strict;
        self
    }

    pub fn with_endpoints(mut self, releases_api: String, download_base: String) -> Self {
        self.releases_api = releases_api;
        self.download_base = download_base.trim_end_matches('/').to_string();
        self
    }
}
