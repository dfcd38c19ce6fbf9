//! Load diagnostics

use crate::severity::{Mode, Severity, adapt};
use std::fmt;

/// A single diagnostic recorded during a load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Human readable message naming the offending ids
    pub message: String,
    /// Severity after mode adaptation
    pub severity: Severity,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Accumulates diagnostics for one load.
///
/// Every added issue passes through [`adapt`] with the result's mode, so
/// callers always pass the unadapted severity.
#[derive(Debug, Clone, Default)]
pub struct LoadResult {
    mode: Mode,
    issues: Vec<Issue>,
}

impl LoadResult {
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            issues: Vec::new(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Record a diagnostic
    pub fn add_error(&mut self, message: impl Into<String>, severity: Severity) {
        let severity = adapt(self.mode, severity);
        let message = message.into();
        tracing::trace!(%severity, %message, "load issue");
        self.issues.push(Issue { message, severity });
    }

    /// Shorthand for a warning
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.add_error(message, Severity::Warning);
    }

    /// Successful iff no error or critical issue was recorded
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.issues.iter().any(|i| i.severity.is_failure())
    }

    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Critical)
    }

    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.with_severity(Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.with_severity(Severity::Error)
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }
}
