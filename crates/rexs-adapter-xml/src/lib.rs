#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # rexs-adapter-xml
//!
//! Loading and writing REXS models in the XML wire format.
//!
//! Documents are read into a small element tree with `quick-xml`, checked by
//! [`XmlStructureValidator`] and then assembled by `rexs-loader`. The
//! serializer writes the same layout back, packing coded values with the
//! base64 codec from `rexs-model`.

pub mod dom;
pub mod loader;
pub mod node;
pub mod schema;
pub mod serializer;

pub use dom::Element;
pub use loader::XmlModelLoader;
pub use node::{XmlNode, decode_unknown};
pub use schema::XmlStructureValidator;
pub use serializer::XmlSerializer;

use thiserror::Error;

/// Errors raised while reading an XML document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("XML parse error at position {position}: {message}")]
    Parse { position: u64, message: String },

    #[error("XML document error: {0}")]
    Document(String),
}

impl Error {
    pub fn parse(position: impl TryInto<u64>, message: impl Into<String>) -> Self {
        Self::Parse {
            position: position.try_into().unwrap_or(u64::MAX),
            message: message.into(),
        }
    }

    pub fn document(message: impl Into<String>) -> Self {
        Self::Document(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
