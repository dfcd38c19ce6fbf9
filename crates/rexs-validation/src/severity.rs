//! Severity levels and the strict/relaxed policy

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a load diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Data kept, informational
    Warning,
    /// Data for the element dropped, siblings still processed
    Error,
    /// Whole load aborted
    Critical,
}

impl Severity {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }

    /// Whether an issue of this severity makes a load unsuccessful
    #[must_use]
    pub fn is_failure(self) -> bool {
        self >= Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "WARNING" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            "CRITICAL" => Ok(Severity::Critical),
            _ => Err(Error::UnknownSeverity(s.to_string())),
        }
    }
}

/// Policy for how strictly errors are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Errors make the load unsuccessful
    #[default]
    Strict,
    /// Errors are downgraded to warnings
    Relaxed,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Strict => f.write_str("strict"),
            Mode::Relaxed => f.write_str("relaxed"),
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "strict" => Ok(Mode::Strict),
            "relaxed" => Ok(Mode::Relaxed),
            other => Err(Error::UnknownMode(other.to_string())),
        }
    }
}

/// Apply `mode` to a severity.
///
/// Relaxed mode downgrades errors to warnings. Critical issues are never
/// downgraded.
#[must_use]
pub fn adapt(mode: Mode, severity: Severity) -> Severity {
    match (mode, severity) {
        (Mode::Relaxed, Severity::Error) => Severity::Warning,
        (_, severity) => severity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_keeps_severity() {
        for severity in [Severity::Warning, Severity::Error, Severity::Critical] {
            assert_eq!(adapt(Mode::Strict, severity), severity);
        }
    }

    #[test]
    fn test_relaxed_downgrades_errors_only() {
        assert_eq!(adapt(Mode::Relaxed, Severity::Error), Severity::Warning);
        assert_eq!(adapt(Mode::Relaxed, Severity::Warning), Severity::Warning);
        assert_eq!(adapt(Mode::Relaxed, Severity::Critical), Severity::Critical);
    }

    #[test]
    fn test_severity_failure() {
        assert!(!Severity::Warning.is_failure());
        assert!(Severity::Error.is_failure());
        assert!(Severity::Critical.is_failure());
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("strict".parse::<Mode>().unwrap(), Mode::Strict);
        assert_eq!("relaxed".parse::<Mode>().unwrap(), Mode::Relaxed);
        assert_eq!(
            "lenient".parse::<Mode>().unwrap_err(),
            Error::UnknownMode("lenient".to_string())
        );
        assert_eq!(Mode::default(), Mode::Strict);
    }

    #[test]
    fn test_parse_severity() {
        assert_eq!("warning".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("CRITICAL".parse::<Severity>().unwrap(), Severity::Critical);
        assert!("fatal".parse::<Severity>().is_err());
    }
}
