//! Access to the host: tool discovery, `uname`, and subprocesses.
//!
//! Every external command the installer runs goes through [`Host`], so the
//! pipeline can be driven end-to-end in tests without touching real package
//! managers.

use std::ffi::{OsStr, OsString};
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

use crate::error::{InstallError, Result};

/// A program plus arguments, kept printable for error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

pub trait Host: Send + Sync {
    /// Whether `name` resolves to an executable on `PATH`.
    fn has_command(&self, name: &str) -> bool;

    /// Output of `uname <flag>`, trimmed, or `None` if it cannot be run.
    fn uname(&self, flag: &str) -> Option<String>;

    /// Run with inherited stdio and wait. A non-zero exit is an error.
    fn run(&self, invocation: &Invocation) -> Result<()>;

    /// Run with captured stdout and wait. A non-zero exit is an error.
    fn output(&self, invocation: &Invocation) -> Result<String>;
}

/// The real machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl Host for SystemHost {
    fn has_command(&self, name: &str) -> bool {
        which::which(name).is_ok()
    }

    fn uname(&self, flag: &str) -> Option<String> {
        let output = Command::new("uname").arg(flag).output().ok()?;
        if !output.status.success() {
            return None;
        }
        let text = String::from_utf8(output.stdout).ok()?;
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    fn run(&self, invocation: &Invocation) -> Result<()> {
        debug!(command = %invocation, "running");
        let status = invocation
            .command()
            .status()
            .map_err(|e| InstallError::context("Failed to start command", format!("{invocation}: {e}")))?;

        check_status(invocation, status)
    }

    fn output(&self, invocation: &Invocation) -> Result<String> {
        debug!(command = %invocation, "capturing");
        let output = invocation
            .command()
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| InstallError::context("Failed to start command", format!("{invocation}: {e}")))?;

        check_status(invocation, output.status)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Signal number of SIGINT on every supported platform.
#[cfg(unix)]
const SIGINT: i32 = 2;

/// Map a finished child to a result.
///
/// Ctrl-C reaches the foreground child as well as the installer. A child
/// that died from SIGINT, or exited with the shell's 130 for it, is
/// reported as an interruption rather than a command failure.
fn check_status(invocation: &Invocation, status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    if interrupted(status) {
        return Err(InstallError::Interrupted);
    }
    Err(InstallError::Subprocess {
        command: invocation.to_string(),
        status,
    })
}

#[cfg(unix)]
fn interrupted(status: ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.signal() == Some(SIGINT) || status.code() == Some(i32::from(crate::error::EXIT_INTERRUPTED))
}

#[cfg(not(unix))]
fn interrupted(status: ExitStatus) -> bool {
    status.code() == Some(i32::from(crate::error::EXIT_INTERRUPTED))
}
