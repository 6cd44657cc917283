//! Per-call diagnostic channel.
//!
//! Every [`Transform`](crate::Transform) and
//! [`EffectHandler`](crate::EffectHandler) call receives a `&mut Diagnostics`.
//! Effects write human-readable messages into it; the owner reads back the
//! most recent error when a call fails. Each pipeline owns its own channel,
//! so independent pipelines never share diagnostic state.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational note.
    Info,
    /// Recoverable oddity (e.g. a clamped argument).
    Warning,
    /// Reason for a failure.
    Error,
}

/// A single diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Message severity.
    pub severity: Severity,
    /// Human-readable text.
    pub message: String,
}

/// Ordered collection of diagnostics recorded since the last drain.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message.
    pub fn push(&mut self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        #[cfg(feature = "tracing")]
        tracing::trace!(?severity, %message, "diagnostic");
        self.entries.push(Diagnostic { severity, message });
    }

    /// Record an error message.
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message);
    }

    /// Record a warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message);
    }

    /// Record an informational note.
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Severity::Info, message);
    }

    /// The most recently recorded error message, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|d| d.severity == Severity::Error)
            .map(|d| d.message.as_str())
    }

    /// Iterate over recorded diagnostics, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Remove and return all recorded diagnostics.
    pub fn drain(&mut self) -> impl Iterator<Item = Diagnostic> + '_ {
        self.entries.drain(..)
    }

    /// Forget all recorded diagnostics.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
