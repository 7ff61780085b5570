//! Install outcome and the final, best-effort report.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::host::{Host, Invocation};
use crate::paths::BINARY_NAME;
use crate::reporter::Reporter;

/// What the install and path phases did. Read only by [`report`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallOutcome {
    /// Where the binary was placed, for the manual install path.
    pub install_location: Option<PathBuf>,
    pub needs_path_update: bool,
    pub updated_shell_configs: Vec<PathBuf>,
}

/// Findings of the final check, for callers that want more than console text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub location: Option<PathBuf>,
    pub version: Option<String>,
}

/// `install_dir` followed by every segment of `path_env`.
pub fn search_path(install_dir: &Path, path_env: &OsStr) -> OsString {
    let paths = std::iter::once(install_dir.to_path_buf()).chain(std::env::split_paths(path_env));
    std::env::join_paths(paths).unwrap_or_else(|_| path_env.to_os_string())
}

/// Locate the installed binary and print its version and location.
///
/// Never fails: anything that goes wrong here is downgraded to a warning
/// because the install itself already succeeded.
pub fn report(
    outcome: &InstallOutcome,
    install_dir: &Path,
    path_env: &OsStr,
    host: &dyn Host,
    reporter: &dyn Reporter,
) -> Report {
    let search = search_path(install_dir, path_env);
    let cwd = std::env::current_dir().unwrap_or_else(|_| install_dir.to_path_buf());
    let location = which::which_in(BINARY_NAME, Some(&search), cwd).ok();

    let version = match &location {
        Some(path) => {
            let version = host
                .output(&Invocation::new(path).arg("--version"))
                .map(|out| out.lines().next().unwrap_or_default().trim().to_string())
                .ok()
                .filter(|v| !v.is_empty());

            reporter.success("Azion CLI installed successfully");
            match &version {
                Some(v) => reporter.info(&format!("Version: {v}")),
                None => reporter.warning("Could not read the installed version"),
            }
            reporter.info(&format!("Location: {}", path.display()));
            version
        }
        None => {
            warn!("installed binary is not discoverable");
            reporter.warning(&format!(
                "Installation finished, but '{BINARY_NAME}' was not found on PATH"
            ));
            None
        }
    };

    if outcome.needs_path_update {
        match outcome.updated_shell_configs.first() {
            Some(first) => reporter.info(&format!(
                "Restart your shell or run: source {}",
                first.display()
            )),
            None => reporter.info(&format!(
                "Restart your shell so {} is on your PATH",
                install_dir.display()
            )),
        }
    }

    debug!(?location, ?version, "report complete");
    Report { location, version }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::FakeHost;
    use crate::reporter::{RecordingReporter, Severity};

    fn fake_binary(dir: &Path) -> PathBuf {
        std::fs::create_dir_all(dir).unwrap();
        let path = dir.join(BINARY_NAME);
        std::fs::write(&path, b"#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        path
    }

    #[test]
    fn install_dir_is_searched_first() {
        let search = search_path(Path::new("/opt/azion/bin"), OsStr::new("/usr/bin:/bin"));
        let first = std::env::split_paths(&search).next().unwrap();
        assert_eq!(first, PathBuf::from("/opt/azion/bin"));
    }

    #[cfg(unix)]
    #[test]
    fn reports_version_and_location_even_with_stale_path() {
        let scratch = tempfile::tempdir().unwrap();
        let install_dir = scratch.path().join("bin");
        let binary = fake_binary(&install_dir);

        let host = FakeHost::new().with_output("azion", "azion version 4.16.0\n");
        let reporter = RecordingReporter::new();
        let outcome = InstallOutcome {
            install_location: Some(binary.clone()),
            needs_path_update: true,
            updated_shell_configs: vec![scratch.path().join(".bashrc")],
        };

        let found = report(&outcome, &install_dir, OsStr::new("/nonexistent"), &host, &reporter);

        assert_eq!(found.location, Some(binary));
        assert_eq!(found.version.as_deref(), Some("azion version 4.16.0"));
        let info = reporter.messages(Severity::Info);
        assert!(info.iter().any(|m| m == "Version: azion version 4.16.0"));
        assert!(info.iter().any(|m| m.starts_with("Restart your shell or run: source")));
    }

    #[test]
    fn missing_binary_is_only_a_warning() {
        let scratch = tempfile::tempdir().unwrap();
        let host = FakeHost::new();
        let reporter = RecordingReporter::new();

        let found = report(
            &InstallOutcome::default(),
            &scratch.path().join("bin"),
            OsStr::new(""),
            &host,
            &reporter,
        );

        assert_eq!(found.location, None);
        assert_eq!(reporter.messages(Severity::Warning).len(), 1);
        assert!(reporter.messages(Severity::Info).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn broken_version_command_is_tolerated() {
        let scratch = tempfile::tempdir().unwrap();
        let install_dir = scratch.path().join("bin");
        fake_binary(&install_dir);

        let host = FakeHost::new().failing("azion");
        let reporter = RecordingReporter::new();
        let found = report(&InstallOutcome::default(), &install_dir, OsStr::new(""), &host, &reporter);

        assert!(found.location.is_some());
        assert_eq!(found.version, None);
        assert_eq!(
            reporter.messages(Severity::Warning),
            vec!["Could not read the installed version"]
        );
    }
}
