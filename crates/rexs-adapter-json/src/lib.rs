#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # rexs-adapter-json
//!
//! Loading and writing REXS models in the JSON wire format.
//!
//! Documents are parsed into a `serde_json::Value`, checked by
//! [`JsonStructureValidator`] and assembled by `rexs-loader`. Attribute values
//! live in a field named after their value type, coded arrays and matrices in
//! a `<type>_coded` object.
//!
//! ```json
//! { "id": "numbers_of_teeth", "unit": "none",
//!   "integer_array_coded": { "code": "int32", "value": "EQAAADUAAAA=" } }
//! ```

pub mod loader;
pub mod node;
pub mod schema;
pub mod serializer;

pub use loader::JsonModelLoader;
pub use node::JsonNode;
pub use schema::JsonStructureValidator;
pub use serializer::JsonSerializer;

use thiserror::Error;

/// Errors raised while reading a JSON document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("JSON parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Parse a JSON document.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed JSON.
pub fn parse(bytes: &[u8]) -> Result<serde_json::Value> {
    Ok(serde_json::from_slice(bytes)?)
}
