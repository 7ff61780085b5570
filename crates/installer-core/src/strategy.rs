//! The three install mechanisms.
//!
//! Exactly one runs per invocation, picked from the package manager
//! selection by [`InstallStrategy::select`].

use std::path::{Path, PathBuf};

use installer_schema::{PackageFormat, PackageManager};
use tracing::info;

use crate::config::HOMEBREW_FORMULA;
use crate::error::{InstallError, Result};
use crate::host::{Host, Invocation};
use crate::io::extract::{Extractor, find_file};
use crate::paths::BINARY_NAME;
use crate::reporter::Reporter;
use crate::workspace::Workspace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStrategy {
    /// Hand the downloaded package to the system package manager.
    NativePackage {
        manager: PackageManager,
        format: PackageFormat,
    },
    /// `brew install` by formula name. Never downloads anything.
    Formula,
    /// Extract the zip and copy the binary into the install directory.
    ManualBinary,
}

impl InstallStrategy {
    /// Managers without a package format of their own install by formula.
    pub fn select(manager: Option<PackageManager>) -> Self {
        let Some(manager) = manager else {
            return Self::ManualBinary;
        };
        match manager.package_format() {
            Some(format) => Self::NativePackage { manager, format },
            None => Self::Formula,
        }
    }
}

/// Package manager command for a local package file, without privilege
/// escalation.
pub fn package_invocation(manager: PackageManager, package: &Path) -> Invocation {
    match manager {
        PackageManager::Apt => Invocation::new("dpkg").arg("-i").arg(package),
        PackageManager::Dnf => Invocation::new("dnf").args(["install", "-y"]).arg(package),
        PackageManager::Yum => Invocation::new("yum")
            .args(["localinstall", "-y"])
            .arg(package),
        PackageManager::Apk => Invocation::new("apk")
            .args(["add", "--allow-untrusted"])
            .arg(package),
        PackageManager::Homebrew => Invocation::new("brew")
            .arg("install")
            .arg(HOMEBREW_FORMULA),
    }
}

/// Install a downloaded package with elevated privileges.
///
/// Commands go through `sudo` when it is on `PATH`. Without it the command
/// runs as the current user, which is what a root shell in a container wants.
pub fn install_package(
    manager: PackageManager,
    package: &Path,
    host: &dyn Host,
    reporter: &dyn Reporter,
) -> Result<()> {
    let base = package_invocation(manager, package);
    let invocation = if host.has_command("sudo") {
        Invocation::new("sudo").arg(&base.program).args(&base.args)
    } else {
        reporter.info("sudo not found; running the package manager directly");
        base
    };

    reporter.info(&format!("Installing with {manager}: {invocation}"));
    info!(command = %invocation, "installing package");
    host.run(&invocation)
}

/// `brew install azion`
pub fn install_formula(host: &dyn Host, reporter: &dyn Reporter) -> Result<()> {
    let invocation = package_invocation(PackageManager::Homebrew, Path::new(""));
    reporter.info(&format!("Installing with Homebrew: {invocation}"));
    info!(command = %invocation, "installing formula");
    host.run(&invocation)
}

/// Extract `archive` inside the workspace and copy the binary into
/// `install_dir`. Returns the installed path.
pub fn install_binary(
    archive: &Path,
    workspace: &Workspace,
    install_dir: &Path,
    extractor: &Extractor,
) -> Result<PathBuf> {
    let extract_dir = workspace.extract_dir()?;
    extractor.extract(archive, &extract_dir)?;

    let binary = find_file(&extract_dir, BINARY_NAME)?.ok_or_else(|| {
        InstallError::BinaryNotFound {
            name: BINARY_NAME.to_string(),
            archive: archive.to_path_buf(),
        }
    })?;

    std::fs::create_dir_all(install_dir).map_err(|e| {
        InstallError::context(
            "Failed to create install directory",
            format!("{}: {e}", install_dir.display()),
        )
    })?;

    let target = install_dir.join(BINARY_NAME);
    std::fs::copy(&binary, &target).map_err(|e| {
        InstallError::context(
            "Failed to copy binary",
            format!("{} -> {}: {e}", binary.display(), target.display()),
        )
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&target, std::fs::Permissions::from_mode(0o755))?;
    }

    info!(path = %target.display(), "installed binary");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::FakeHost;
    use crate::reporter::NullReporter;
    use std::io::Write;

    #[test]
    fn selection_is_exhaustive() {
        assert_eq!(InstallStrategy::select(None), InstallStrategy::ManualBinary);
        assert_eq!(
            InstallStrategy::select(Some(PackageManager::Homebrew)),
            InstallStrategy::Formula
        );
        assert_eq!(
            InstallStrategy::select(Some(PackageManager::Yum)),
            InstallStrategy::NativePackage {
                manager: PackageManager::Yum,
                format: PackageFormat::Rpm,
            }
        );
        assert_eq!(
            InstallStrategy::select(Some(PackageManager::Apk)),
            InstallStrategy::NativePackage {
                manager: PackageManager::Apk,
                format: PackageFormat::Apk,
            }
        );
    }

    #[test]
    fn package_commands_follow_family_conventions() {
        let pkg = Path::new("/tmp/ws/azion.pkg");
        let cases = [
            (PackageManager::Apt, "dpkg -i /tmp/ws/azion.pkg"),
            (PackageManager::Dnf, "dnf install -y /tmp/ws/azion.pkg"),
            (PackageManager::Yum, "yum localinstall -y /tmp/ws/azion.pkg"),
            (PackageManager::Apk, "apk add --allow-untrusted /tmp/ws/azion.pkg"),
        ];
        for (pm, expected) in cases {
            assert_eq!(package_invocation(pm, pkg).to_string(), expected);
        }
    }

    #[test]
    fn package_install_uses_sudo_when_available() {
        let host = FakeHost::new().with_commands(&["sudo"]);
        install_package(
            PackageManager::Apt,
            Path::new("/tmp/ws/azion_4.16.0_linux_amd64.deb"),
            &host,
            &NullReporter,
        )
        .unwrap();
        assert_eq!(
            host.calls(),
            vec!["sudo dpkg -i /tmp/ws/azion_4.16.0_linux_amd64.deb"]
        );
    }

    #[test]
    fn package_install_without_sudo_runs_directly() {
        let host = FakeHost::new();
        install_package(PackageManager::Apk, Path::new("/x.apk"), &host, &NullReporter).unwrap();
        assert_eq!(host.calls(), vec!["apk add --allow-untrusted /x.apk"]);
    }

    #[test]
    fn package_manager_failure_propagates() {
        let host = FakeHost::new().with_commands(&["sudo"]).failing("sudo");
        let result = install_package(PackageManager::Dnf, Path::new("/x.rpm"), &host, &NullReporter);
        assert!(result.is_err());
    }

    #[test]
    fn formula_installs_by_name() {
        let host = FakeHost::new();
        install_formula(&host, &NullReporter).unwrap();
        assert_eq!(host.calls(), vec!["brew install azion"]);
    }

    #[test]
    fn binary_is_copied_and_made_executable() {
        let scratch = tempfile::tempdir().unwrap();
        let archive = scratch.path().join("azion.zip");
        {
            let mut zip = zip::ZipWriter::new(std::fs::File::create(&archive).unwrap());
            zip.start_file("dist/azion", zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"#!/bin/sh\necho azion\n").unwrap();
            zip.finish().unwrap();
        }

        let workspace = Workspace::new_in(scratch.path()).unwrap();
        let install_dir = scratch.path().join("home/.azion/bin");
        let target = install_binary(&archive, &workspace, &install_dir, &Extractor::Native).unwrap();

        assert_eq!(target, install_dir.join("azion"));
        assert_eq!(std::fs::read(&target).unwrap(), b"#!/bin/sh\necho azion\n");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&target).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[test]
    fn archive_without_binary_is_fatal() {
        let scratch = tempfile::tempdir().unwrap();
        let archive = scratch.path().join("azion.zip");
        {
            let mut zip = zip::ZipWriter::new(std::fs::File::create(&archive).unwrap());
            zip.start_file("README.md", zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"nothing here").unwrap();
            zip.finish().unwrap();
        }

        let workspace = Workspace::new_in(scratch.path()).unwrap();
        let err = install_binary(&archive, &workspace, &scratch.path().join("bin"), &Extractor::Native)
            .unwrap_err();
        assert!(matches!(err, InstallError::BinaryNotFound { .. }));
    }
}
