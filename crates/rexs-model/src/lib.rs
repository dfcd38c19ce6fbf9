#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # rexs-model
//!
//! Runtime representation of a loaded REXS model.
//!
//! This crate provides the closed [`Value`] union every attribute decodes
//! into, the coded-value codec for base64 packed numeric arrays, and the
//! component / relation / load spectrum graph a loader assembles.

/// Runtime attributes and their definitions.
pub mod attribute;
/// Base64 packing of int32/float32/float64 arrays and matrices.
pub mod coded;
/// Runtime components.
pub mod component;
/// Load cases and accumulation.
pub mod load_spectrum;
/// Model header and the assembled model.
pub mod model;
/// Relations between components.
pub mod relation;
/// The typed value union.
pub mod value;

pub use attribute::{Attribute, AttributeDefinition};
pub use coded::CodedValueType;
pub use component::Component;
pub use load_spectrum::{Accumulation, LoadCase, LoadComponent, LoadSpectrum};
pub use model::{Model, ModelInfo};
pub use relation::{Relation, RelationReference, RelationRole, RelationType};
pub use value::{Matrix, Value, ValueData};

pub use rexs_database::{RexsVersion, ValueType};

use thiserror::Error;

/// Errors that can occur when working with the runtime model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("Unit mismatch for attribute {attribute}: expected '{expected}', found '{found}'")]
    UnitMismatch {
        attribute: String,
        expected: String,
        found: String,
    },

    #[error("Coding error: {0}")]
    Coding(String),

    #[error("Unknown {kind} '{name}'")]
    UnknownName { kind: &'static str, name: String },
}

impl Error {
    /// Build a type-mismatch error from the requested and stored shapes.
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Build a unit-mismatch error for an attribute.
    pub fn unit_mismatch(
        attribute: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::UnitMismatch {
            attribute: attribute.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Build a coding error.
    pub fn coding(message: impl Into<String>) -> Self {
        Self::Coding(message.into())
    }
}

/// Crate-local result type for model operations.
pub type Result<T> = std::result::Result<T, Error>;
