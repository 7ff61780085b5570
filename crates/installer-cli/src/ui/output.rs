//! Prefixed console lines for the install run.
//!
//! Progress goes to stdout; warnings and errors go to stderr so a piped
//! install still surfaces problems. Colour is only used on a terminal.

use std::io::{IsTerminal, Write};

use crossterm::style::Stylize;
use installer_core::Reporter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn prefix(self) -> &'static str {
        match self {
            Self::Info | Self::Success => "info:",
            Self::Warning => "warn:",
            Self::Error => "error:",
        }
    }
}

/// Render one line, styled when `color` is set.
fn render(level: Level, msg: &str, color: bool) -> String {
    let prefix = level.prefix();
    if !color {
        return format!("{prefix} {msg}");
    }
    let styled = match level {
        Level::Info => prefix.cyan().bold(),
        Level::Success => prefix.green().bold(),
        Level::Warning => prefix.yellow().bold(),
        Level::Error => prefix.red().bold(),
    };
    match level {
        Level::Success => format!("{styled} {}", msg.green()),
        _ => format!("{styled} {msg}"),
    }
}

/// Whether the environment allows colour, given the stream is a terminal.
fn color_allowed(no_color: Option<&str>, term: Option<&str>) -> bool {
    no_color.is_none_or(str::is_empty) && term != Some("dumb")
}

#[derive(Debug, Clone, Copy)]
pub struct Output {
    stdout_color: bool,
    stderr_color: bool,
}

impl Output {
    pub fn new() -> Self {
        let no_color = std::env::var("NO_COLOR").ok();
        let term = std::env::var("TERM").ok();
        let allowed = color_allowed(no_color.as_deref(), term.as_deref());
        Self {
            stdout_color: allowed && std::io::stdout().is_terminal(),
            stderr_color: allowed && std::io::stderr().is_terminal(),
        }
    }

    /// Uncoloured output, regardless of the terminal.
    pub fn plain() -> Self {
        Self {
            stdout_color: false,
            stderr_color: false,
        }
    }

    fn emit(&self, level: Level, msg: &str) {
        // Output is best-effort; a closed pipe must not abort the install.
        match level {
            Level::Info | Level::Success => {
                let _ = writeln!(std::io::stdout(), "{}", render(level, msg, self.stdout_color));
            }
            Level::Warning | Level::Error => {
                let _ = writeln!(std::io::stderr(), "{}", render(level, msg, self.stderr_color));
            }
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for Output {
    fn info(&self, msg: &str) {
        self.emit(Level::Info, msg);
    }

    fn success(&self, msg: &str) {
        self.emit(Level::Success, msg);
    }

    fn warning(&self, msg: &str) {
        self.emit(Level::Warning, msg);
    }

    fn error(&self, msg: &str) {
        self.emit(Level::Error, msg);
    }
}
