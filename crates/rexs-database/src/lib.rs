//! # rexs-database
//!
//! Database model, catalog loader, and registry for REXS.
//!
//! A database model is the catalog of component types and attribute
//! definitions (value type, unit, range, enum values) for one REXS version
//! and language. Catalogs are loaded once at startup into a
//! [`ModelRegistry`] and are read-only afterwards.

pub mod loader;
pub mod model;
pub mod registry;
pub mod types;

pub use loader::{CatalogLoader, DirectoryResourceLoader, ResourceLoader};
pub use model::{
    Attribute, Component, DatabaseModel, DatabaseModelBuilder, EnumValue, EnumValues, Interval,
    IntervalEndpoint, IntervalType, Unit,
};
pub use registry::ModelRegistry;
pub use types::{RexsVersion, ValueType};

use thiserror::Error;

/// Errors that can occur when working with database models
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database model not found: {0}")]
    NotFound(String),

    #[error("Invalid catalog format: {0}")]
    InvalidFormat(String),

    #[error("Inconsistent catalog {catalog}: {message}")]
    Inconsistent { catalog: String, message: String },

    #[error("Invalid REXS version '{0}'")]
    InvalidVersion(String),

    #[error("Unknown value type '{0}'")]
    UnknownValueType(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a not-found error for a version/language pair.
    pub fn not_found(version: &RexsVersion, language: &str) -> Self {
        Self::NotFound(format!("version={version} language={language}"))
    }

    /// Build a consistency error with the offending catalog named.
    pub fn inconsistent(catalog: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Inconsistent {
            catalog: catalog.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
