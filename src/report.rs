//! Progress and diagnostics reporting for the upload pipeline.
//!
//! The pipeline stages never talk to a global logger directly; they are
//! handed a [`Reporter`] so they stay testable without capturing process
//! output. The binary injects [`TracingReporter`]; tests use
//! [`RecordingReporter`] to assert on emitted warnings.

use std::sync::Mutex;

/// Severity of a reported line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

/// Reporting collaborator injected into each pipeline stage.
pub trait Reporter: Send + Sync {
    fn report(&self, severity: Severity, message: &str);

    fn debug(&self, message: &str) {
        self.report(Severity::Debug, message);
    }

    fn info(&self, message: &str) {
        self.report(Severity::Info, message);
    }

    fn warn(&self, message: &str) {
        self.report(Severity::Warn, message);
    }

    fn error(&self, message: &str) {
        self.report(Severity::Error, message);
    }
}

/// Forwards everything to the `tracing` subscriber installed by the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => tracing::debug!("{message}"),
            Severity::Info => tracing::info!("{message}"),
            Severity::Warn => tracing::warn!("{message}"),
            Severity::Error => tracing::error!("{message}"),
        }
    }
}

/// Captures reported lines in memory. Used by tests to assert on warnings
/// without installing a subscriber.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    entries: Mutex<Vec<(Severity, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.entries.lock().expect("reporter lock poisoned").clone()
    }

    /// All messages recorded at the given severity.
    pub fn messages_at(&self, severity: Severity) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m)
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, severity: Severity, message: &str) {
        self.entries
            .lock()
            .expect("reporter lock poisoned")
            .push((severity, message.to_string()));
    }
}
