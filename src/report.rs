//! Reporting capability handed to components that emit user-visible notices.
//!
//! Pure derivations (argument compilation, manifests, script rendering) never
//! report anything. Components that can partially fail (batch validation,
//! package generation) take a `&dyn Reporter` instead of writing to a global
//! logger, so tests can capture exactly what would have been shown.

use std::sync::Mutex;

/// Sink for progress and diagnostic messages.
pub trait Reporter: Send + Sync {
    /// Neutral progress information.
    fn info(&self, message: &str);
    /// A step completed successfully.
    fn success(&self, message: &str);
    /// Something was skipped or degraded but the operation continues.
    fn warn(&self, message: &str);
    /// An operation failed.
    fn error(&self, message: &str);
}

/// Forwards every message to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn info(&self, message: &str) {
        log::info!("{message}");
    }

    fn success(&self, message: &str) {
        log::info!("{message}");
    }

    fn warn(&self, message: &str) {
        log::warn!("{message}");
    }

    fn error(&self, message: &str) {
        log::error!("{message}");
    }
}

/// Severity of a recorded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
}

/// Keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    messages: Mutex<Vec<(Level, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages recorded so far, in order.
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Messages recorded at the given level.
    pub fn at(&self, level: Level) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn push(&self, level: Level, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((level, message.to_string()));
        }
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn success(&self, message: &str) {
        self.push(Level::Success, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}
