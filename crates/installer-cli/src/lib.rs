//! azion-install - install the Azion CLI
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Detects the platform, picks a package manager (or falls back to the
//! release zip), verifies the download and puts `azion` on `PATH`.
//!
//! Every option is a flag and an environment variable, so the same binary
//! works interactively and when piped from a bootstrap script.

pub mod ui;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use installer_core::config::{DEFAULT_DOWNLOAD_BASE, DEFAULT_RELEASES_API};
use installer_core::{InstallError, InstallMethod, InstallerConfig, ToolMode};

#[derive(Parser, Debug)]
#[command(name = "azion-install")]
#[command(author, version, about = "Install the Azion CLI")]
pub struct Cli {
    /// Release to install, e.g. 4.16.0 [default: latest]
    #[arg(long, env = "AZION_VERSION", value_name = "VERSION")]
    pub release: Option<String>,

    /// Where the binary goes when no package manager is used [default: ~/.azion/bin]
    #[arg(long, env = "AZION_INSTALL_DIR", value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    /// Built-in networking/hashing/unzip, or the system's curl, sha256sum and unzip
    #[arg(long, env = "AZION_TOOLS", value_enum, default_value_t = Tools::Native)]
    pub tools: Tools,

    /// Fail when the download cannot be checksummed instead of skipping the check
    #[arg(long, env = "AZION_STRICT_CHECKSUM")]
    pub strict_checksum: bool,

    /// Use a package manager when available, or always install the binary
    #[arg(long, env = "AZION_INSTALL_METHOD", value_enum, default_value_t = Method::Auto)]
    pub method: Method,

    #[arg(long, env = "AZION_RELEASES_API", default_value = DEFAULT_RELEASES_API, hide = true)]
    pub releases_api: String,

    #[arg(long, env = "AZION_DOWNLOAD_URL", default_value = DEFAULT_DOWNLOAD_BASE, hide = true)]
    pub download_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Tools {
    Native,
    System,
}

impl From<Tools> for ToolMode {
    fn from(tools: Tools) -> Self {
        match tools {
            Tools::Native => ToolMode::Native,
            Tools::System => ToolMode::System,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Method {
    Auto,
    Binary,
}

impl From<Method> for InstallMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Auto => InstallMethod::Auto,
            Method::Binary => InstallMethod::Binary,
        }
    }
}

impl Cli {
    /// Resolve against the current user's home directory.
    pub fn into_config(self) -> Result<InstallerConfig, InstallError> {
        let home = dirs::home_dir().ok_or_else(|| {
            InstallError::MissingDependency("could not determine the home directory".to_string())
        })?;
        Ok(self.into_config_in(home))
    }

    pub fn into_config_in(self, home: PathBuf) -> InstallerConfig {
        InstallerConfig::new(home)
            .with_version_pin(self.release)
            .with_install_dir(self.install_dir)
            .with_tools(self.tools.into())
            .with_method(self.method.into())
            .with_strict_checksum(self.strict_checksum)
            .with_endpoints(self.releases_api, self.download_url)
    }
}

/// Console lines for a fatal error: the error, then each cause that adds
/// something the line above did not already say.
pub fn error_lines(err: &anyhow::Error) -> Vec<String> {
    let mut lines = vec![err.to_string()];
    let mut previous = lines[0].clone();
    for cause in err.chain().skip(1) {
        let text = cause.to_string();
        if !previous.contains(&text) {
            lines.push(format!("  caused by: {text}"));
        }
        previous = text;
    }
    lines
}
