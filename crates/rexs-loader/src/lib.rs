#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # rexs-loader
//!
//! Everything a REXS model loader needs that does not depend on the wire
//! format.
//!
//! A format adapter parses its document, runs its structural checker and then
//! hands a [`RawModel`] to [`assemble`]. The assembler resolves the database
//! model, decodes attributes through the adapter's [`NodeView`], resolves
//! references and relations, and records every problem in a
//! [`LoadResult`](rexs_validation::LoadResult).

pub mod assembler;
pub mod config;
pub mod decoder;
pub mod document;
pub mod format;
pub mod helper;
pub mod mapping;
pub mod serializer;

pub use assembler::assemble;
pub use config::LoaderConfig;
pub use decoder::{CodedPayload, NodeView, decode};
pub use document::{
    AttributeSource, RawComponent, RawInfo, RawLoadCase, RawLoadComponent, RawLoadSpectrum,
    RawModel, RawReference, RawRelation,
};
pub use format::Format;
pub use helper::ModelHelper;
pub use mapping::ComponentMapping;
pub use serializer::{FileSink, LoadOutcome, ModelLoader, ModelSerializer, Sink, StringSink};

use std::path::PathBuf;
use thiserror::Error;

/// Fatal loader errors.
///
/// Everything recoverable is reported as a diagnostic instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rexs_database::Error),

    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
}

impl Error {
    /// Attach the offending path to an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
