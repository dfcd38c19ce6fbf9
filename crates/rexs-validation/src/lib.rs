#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # rexs-validation
//!
//! Diagnostics and validity checking for REXS model loading.
//!
//! Loading never stops at the first problem. Every issue is recorded in a
//! [`LoadResult`] with a [`Severity`], and the loader's [`Mode`] decides
//! whether errors block success or merely annotate it.
//!
//! ## Example Usage
//!
//! ```rust
//! use rexs_validation::{LoadResult, Mode, Severity};
//!
//! let mut result = LoadResult::new(Mode::Relaxed);
//! result.add_error("attribute id=foo is not part of component gear_unit id=1", Severity::Error);
//!
//! // relaxed mode turned the error into a warning
//! assert!(result.is_success());
//! assert!(result.has_issues());
//! ```

pub mod checker;
pub mod result;
pub mod severity;
pub mod structural;

pub use checker::ValidityChecker;
pub use result::{Issue, LoadResult};
pub use severity::{Mode, Severity, adapt};
pub use structural::StructuralValidator;

use thiserror::Error;

/// Errors that can occur when configuring validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown mode '{0}', expected 'strict' or 'relaxed'")]
    UnknownMode(String),

    #[error("Unknown severity '{0}'")]
    UnknownSeverity(String),
}

pub type Result<T> = std::result::Result<T, Error>;
