//! End-to-end runs of the `azion-install` binary against a mock release host.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use mockito::{Server, ServerGuard};
use sha2::{Digest, Sha256};
use tempfile::TempDir;

const VERSION: &str = "4.16.0";

/// A throwaway home directory plus a mock release host.
struct TestContext {
    home: TempDir,
    server: ServerGuard,
}

impl TestContext {
    fn new() -> Self {
        Self {
            home: TempDir::new().expect("failed to create temp dir"),
            server: Server::new(),
        }
    }

    fn install_dir(&self) -> PathBuf {
        self.home.path().join(".azion").join("bin")
    }

    fn installer_cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_azion-install"));
        cmd.env("HOME", self.home.path())
            .env("NO_COLOR", "1")
            .env("AZION_INSTALL_METHOD", "binary")
            .env("AZION_RELEASES_API", format!("{}/latest", self.server.url()))
            .env("AZION_DOWNLOAD_URL", self.server.url())
            .env_remove("AZION_VERSION")
            .env_remove("AZION_INSTALL_DIR")
            .env_remove("AZION_TOOLS")
            .env_remove("AZION_STRICT_CHECKSUM");
        cmd
    }

    /// Serve a release whose zip holds a shell-script `azion`.
    fn serve_release(&mut self) {
        let archive = zip_with_script(&format!(
            "#!/bin/sh\necho \"azion version {VERSION}\"\n"
        ));
        let digest = hex::encode(Sha256::digest(&archive));

        // The asset name depends on the machine running the test, so list
        // every supported platform in the manifest.
        let mut manifest = String::new();
        for os in ["linux", "darwin", "freebsd"] {
            for arch in ["amd64", "arm64", "armv7", "386", "ppc64"] {
                manifest.push_str(&format!("{digest}  azion_{VERSION}_{os}_{arch}.zip\n"));
            }
        }

        self.server
            .mock(
                "GET",
                mockito::Matcher::Regex(format!(r"^/{VERSION}/azion_{VERSION}_\w+_\w+\.zip$")),
            )
            .with_status(200)
            .with_body(archive)
            .create();
        self.server
            .mock("GET", format!("/{VERSION}/azion_v{VERSION}_checksum").as_str())
            .with_status(200)
            .with_body(manifest)
            .create();
    }
}

fn zip_with_script(script: &str) -> Vec<u8> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut cursor);
        zip.start_file(
            "azion",
            zip::write::SimpleFileOptions::default().unix_permissions(0o755),
        )
        .unwrap();
        zip.write_all(script.as_bytes()).unwrap();
        zip.finish().unwrap();
    }
    cursor.into_inner()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn export_lines(profile: &Path) -> usize {
    std::fs::read_to_string(profile)
        .unwrap_or_default()
        .matches("export PATH=")
        .count()
}

#[test]
fn test_help_lists_environment_variables() {
    let ctx = TestContext::new();
    let output = ctx.installer_cmd().arg("--help").output().unwrap();

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Usage:"));
    assert!(text.contains("AZION_VERSION"));
    assert!(text.contains("AZION_INSTALL_DIR"));
    assert!(!text.contains("AZION_DOWNLOAD_URL"));
}

#[test]
fn test_version_command() {
    let ctx = TestContext::new();
    let output = ctx.installer_cmd().arg("--version").output().unwrap();
    assert!(output.status.success());
}

#[test]
fn test_release_api_failure_exits_with_one() {
    let mut ctx = TestContext::new();
    let latest = ctx
        .server
        .mock("GET", "/latest")
        .with_status(500)
        .create();

    let output = ctx.installer_cmd().output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("error:"), "{err}");
    assert!(!ctx.install_dir().join("azion").exists());
    latest.assert();
}

#[test]
fn test_invalid_tool_mode_is_a_usage_error() {
    let ctx = TestContext::new();
    let output = ctx
        .installer_cmd()
        .env("AZION_TOOLS", "busybox")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("busybox"));
}

#[cfg(unix)]
#[test]
fn test_binary_install_end_to_end() {
    let mut ctx = TestContext::new();
    ctx.serve_release();
    let latest = ctx.server.mock("GET", "/latest").expect(0).create();

    let output = ctx
        .installer_cmd()
        .env("AZION_VERSION", VERSION)
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains(&format!("info: Installing Azion CLI {VERSION}")), "{out}");
    latest.assert();
    assert!(out.contains("info: Checksum verified"), "{out}");
    assert!(out.contains(&format!("info: Version: azion version {VERSION}")), "{out}");
    assert!(out.contains("Restart your shell or run: source"), "{out}");

    let binary = ctx.install_dir().join("azion");
    assert!(binary.is_file());
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&binary).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    let bashrc = ctx.home.path().join(".bashrc");
    let text = std::fs::read_to_string(&bashrc).unwrap();
    assert!(text.contains("# Added by the Azion CLI installer"));
    assert!(text.contains(&format!("export PATH=\"{}:$PATH\"", ctx.install_dir().display())));
}

#[cfg(unix)]
#[test]
fn test_reinstall_does_not_duplicate_path_entry() {
    let mut ctx = TestContext::new();
    ctx.serve_release();
    std::fs::write(ctx.home.path().join(".zshrc"), "# zsh\n").unwrap();

    for _ in 0..2 {
        let output = ctx
            .installer_cmd()
            .env("AZION_VERSION", VERSION)
            .output()
            .unwrap();
        assert!(output.status.success(), "{}", stderr(&output));
    }

    assert_eq!(export_lines(&ctx.home.path().join(".zshrc")), 1);
    assert!(!ctx.home.path().join(".bashrc").exists());
}

#[cfg(unix)]
#[test]
fn test_custom_install_dir_is_honored() {
    let mut ctx = TestContext::new();
    ctx.serve_release();
    let custom = ctx.home.path().join("tools").join("bin");

    let output = ctx
        .installer_cmd()
        .args(["--release", VERSION, "--install-dir"])
        .arg(&custom)
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(custom.join("azion").is_file());
    assert!(!ctx.install_dir().exists());
}
