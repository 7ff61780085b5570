//! The install workflow, phase by phase.
//!
//! Detect → resolve → fetch → verify → install → configure PATH → report.
//! The resolve/fetch/verify chain is skipped for Homebrew. Every phase
//! returns a `Result`; the first error ends the run and the workspace is
//! dropped on the way out.

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use installer_schema::{PackageFormat, Platform};
use tracing::info;

use crate::artifact::{ArtifactRef, Downloaded};
use crate::config::InstallerConfig;
use crate::detect::{detect_package_manager, detect_platform};
use crate::error::Result;
use crate::host::Host;
use crate::io::digest::Digester;
use crate::io::extract::Extractor;
use crate::io::http::HttpClient;
use crate::outcome::{self, InstallOutcome, Report};
use crate::profile::configure_path;
use crate::release::resolve_version;
use crate::reporter::Reporter;
use crate::strategy::{self, InstallStrategy};
use crate::verify::{Verification, verify_artifact};
use crate::workspace::Workspace;

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub platform: Platform,
    pub strategy: InstallStrategy,
    /// `None` for Homebrew, which installs whatever its formula ships.
    pub version: Option<String>,
    pub outcome: InstallOutcome,
    pub report: Report,
}

pub struct Installer {
    config: InstallerConfig,
    host: Arc<dyn Host>,
    reporter: Arc<dyn Reporter>,
    path_env: OsString,
    workspace_root: Option<PathBuf>,
}

impl std::fmt::Debug for Installer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Installer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Installer {
    pub fn new(config: InstallerConfig, host: Arc<dyn Host>, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            config,
            host,
            reporter,
            path_env: std::env::var_os("PATH").unwrap_or_default(),
            workspace_root: None,
        }
    }

    /// Use `path_env` instead of the process `PATH`.
    pub fn with_path_env(mut self, path_env: impl Into<OsString>) -> Self {
        self.path_env = path_env.into();
        self
    }

    /// Create temporary workspaces under `root` instead of the system temp dir.
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let platform = detect_platform(&*self.host)?;
        self.reporter
            .info(&format!("Detected platform: {}/{}", platform.os, platform.arch));

        let http = HttpClient::detect(self.config.tools, self.host.clone())?;
        let manager = detect_package_manager(platform.os, self.config.method, &*self.host);
        let strategy = InstallStrategy::select(manager);
        info!(?strategy, "selected install strategy");

        let (version, outcome) = match strategy {
            InstallStrategy::Formula => {
                if let Some(pin) = &self.config.version_pin {
                    self.reporter.warning(&format!(
                        "Homebrew installs its current formula; AZION_VERSION={pin} is ignored"
                    ));
                }
                strategy::install_formula(&*self.host, &*self.reporter)?;
                (None, InstallOutcome::default())
            }
            InstallStrategy::NativePackage { manager, format } => {
                let version = self.resolve(&http).await?;
                let workspace = self.workspace()?;
                let downloaded = self
                    .download_verified(&http, &workspace, &version, platform, format)
                    .await?;
                strategy::install_package(manager, &downloaded.archive, &*self.host, &*self.reporter)?;
                (Some(version), InstallOutcome::default())
            }
            InstallStrategy::ManualBinary => {
                let extractor = Extractor::detect(self.config.tools, self.host.clone())?;
                let version = self.resolve(&http).await?;
                let workspace = self.workspace()?;
                let downloaded = self
                    .download_verified(&http, &workspace, &version, platform, PackageFormat::Zip)
                    .await?;
                let location = strategy::install_binary(
                    &downloaded.archive,
                    &workspace,
                    &self.config.install_dir,
                    &extractor,
                )?;
                self.reporter
                    .info(&format!("Installed binary to {}", location.display()));
                (Some(version), self.update_path(location))
            }
        };

        let report = outcome::report(
            &outcome,
            &self.config.install_dir,
            &self.path_env,
            &*self.host,
            &*self.reporter,
        );

        Ok(RunSummary {
            platform,
            strategy,
            version,
            outcome,
            report,
        })
    }

    fn workspace(&self) -> Result<Workspace> {
        match &self.workspace_root {
            Some(root) => Workspace::new_in(root),
            None => Workspace::new(),
        }
    }

    async fn resolve(&self, http: &HttpClient) -> Result<String> {
        if self.config.version_pin.is_none() {
            self.reporter.info("Resolving latest release...");
        }
        let version = resolve_version(
            self.config.version_pin.as_deref(),
            http,
            &self.config.releases_api,
        )
        .await?;
        self.reporter.info(&format!("Installing Azion CLI {version}"));
        Ok(version)
    }

    async fn download_verified(
        &self,
        http: &HttpClient,
        workspace: &Workspace,
        version: &str,
        platform: Platform,
        format: PackageFormat,
    ) -> Result<Downloaded> {
        let artifact = ArtifactRef::new(&self.config.download_base, version, platform, format);
        self.reporter
            .info(&format!("Downloading {}", artifact.asset_name));
        let downloaded = artifact.fetch(http, workspace).await?;

        let digester = Digester::detect(self.config.tools, self.host.clone());
        match verify_artifact(
            &downloaded.archive,
            &downloaded.manifest,
            &artifact.asset_name,
            &digester,
            self.config.strict_checksum,
        )? {
            Verification::Verified(_) => self.reporter.info("Checksum verified"),
            Verification::Skipped => self
                .reporter
                .warning("No SHA-256 tool found (sha256sum or shasum); skipping checksum verification"),
        }
        Ok(downloaded)
    }

    /// PATH editing is best-effort: the binary is already in place.
    fn update_path(&self, location: PathBuf) -> InstallOutcome {
        let install_dir = &self.config.install_dir;
        match configure_path(install_dir, &self.path_env, &self.config.home) {
            Ok(update) => {
                for file in &update.updated {
                    self.reporter
                        .info(&format!("Added {} to PATH in {}", install_dir.display(), file.display()));
                }
                InstallOutcome {
                    install_location: Some(location),
                    needs_path_update: update.needs_reload,
                    updated_shell_configs: update.updated,
                }
            }
            Err(e) => {
                self.reporter.warning(&format!("{e}"));
                self.reporter.warning(&format!(
                    "Add this to your shell profile: export PATH=\"{}:$PATH\"",
                    install_dir.display()
                ));
                InstallOutcome {
                    install_location: Some(location),
                    needs_path_update: true,
                    updated_shell_configs: Vec::new(),
                }
            }
        }
    }
}
