//! Loader and serializer interfaces shared by the format adapters

use crate::{Error, Result};
use rexs_model::{Model, RelationReference};
use rexs_validation::{LoadResult, Mode};
use std::fs;
use std::path::{Path, PathBuf};

/// The model, when one could be built, and every diagnostic of the load
pub type LoadOutcome = (Option<Model>, LoadResult);

/// Loads REXS documents of one wire format
pub trait ModelLoader {
    /// Load a document from memory.
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal conditions such as a missing database
    /// model. Parse and structural failures are critical diagnostics.
    fn load_from_bytes(&self, bytes: &[u8], mode: Mode) -> Result<LoadOutcome>;

    /// Load a document from a file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, or for the fatal
    /// conditions of [`ModelLoader::load_from_bytes`].
    fn load_from_file(&self, path: &Path, mode: Mode) -> Result<LoadOutcome> {
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "read model file");
        self.load_from_bytes(&bytes, mode)
    }
}

/// Writes a model in one wire format
pub trait ModelSerializer {
    /// # Errors
    ///
    /// Returns an error when a value cannot be encoded or the sink fails.
    fn serialize(&self, model: &Model, sink: &mut dyn Sink) -> Result<()>;
}

/// Destination of serialized output
pub trait Sink {
    /// # Errors
    ///
    /// Returns an error when the output cannot be stored.
    fn write(&mut self, content: &str) -> Result<()>;
}

/// Collects output in memory
#[derive(Debug, Clone, Default)]
pub struct StringSink {
    buffer: String,
}

impl StringSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl Sink for StringSink {
    fn write(&mut self, content: &str) -> Result<()> {
        self.buffer.push_str(content);
        Ok(())
    }
}

/// Writes output to a file, replacing its content
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn write(&mut self, content: &str) -> Result<()> {
        fs::write(&self.path, content).map_err(|e| Error::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), bytes = content.len(), "wrote model file");
        Ok(())
    }
}

/// Ids for relations, continuing after the highest component id
pub fn relation_ids(model: &Model) -> impl Iterator<Item = u64> {
    let first = model
        .components()
        .iter()
        .map(rexs_model::Component::internal_id)
        .max()
        .unwrap_or(0)
        + 1;
    first..
}

/// Hint written for a reference: its own, or the referenced component's type
#[must_use]
pub fn reference_hint(model: &Model, reference: &RelationReference) -> String {
    reference
        .hint()
        .map(str::to_string)
        .or_else(|| {
            model
                .find_component(reference.component())
                .map(|c| c.component_type().to_string())
        })
        .unwrap_or_default()
}
