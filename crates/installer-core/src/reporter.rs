//! Reporter trait for dependency injection
//!
//! Pipeline phases report user-facing progress through this trait so the
//! core logic is not coupled to a terminal. Diagnostics go to `tracing`.

pub trait Reporter: Send + Sync {
    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a success message.
    fn success(&self, msg: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);

    /// Log an error message.
    fn error(&self, msg: &str);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn info(&self, msg: &str) {
        (**self).info(msg)
    }
    fn success(&self, msg: &str) {
        (**self).success(msg)
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg)
    }
    fn error(&self, msg: &str) {
        (**self).error(msg)
    }
}

/// A no-op reporter for silent operations (e.g., testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn info(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warning(&self, _: &str) {}
    fn error(&self, _: &str) {}
}

/// Captures messages by severity so tests can assert on output.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
    lines: std::sync::Mutex<Vec<(Severity, String)>>,
}

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[cfg(test)]
impl RecordingReporter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Messages recorded at the given severity, in order.
    pub(crate) fn messages(&self, severity: Severity) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| {
                lines
                    .iter()
                    .filter(|(s, _)| *s == severity)
                    .map(|(_, m)| m.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn push(&self, severity: Severity, msg: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((severity, msg.to_string()));
        }
    }
}

#[cfg(test)]
impl Reporter for RecordingReporter {
    fn info(&self, msg: &str) {
        self.push(Severity::Info, msg);
    }
    fn success(&self, msg: &str) {
        self.push(Severity::Success, msg);
    }
    fn warning(&self, msg: &str) {
        self.push(Severity::Warning, msg);
    }
    fn error(&self, msg: &str) {
        self.push(Severity::Error, msg);
    }
}
