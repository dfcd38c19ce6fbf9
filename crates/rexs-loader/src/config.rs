//! Loader configuration

use crate::{Error, Result};
use rexs_database::ModelRegistry;
use rexs_validation::Mode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the database lives and how strictly documents are checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Directory holding `rexs_v<major>.<minor>_<lang>.xml` catalogs
    pub database_path: PathBuf,
    #[serde(default)]
    pub mode: Mode,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("database"),
            mode: Mode::default(),
        }
    }
}

impl LoaderConfig {
    pub fn new(database_path: impl Into<PathBuf>, mode: Mode) -> Self {
        Self {
            database_path: database_path.into(),
            mode,
        }
    }

    /// Parse a YAML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed YAML or invalid field values.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read and
    /// [`Error::Config`] when it does not parse.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_yaml(&content)
    }

    /// Load every catalog from the configured database directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] when the directory or a catalog cannot be
    /// loaded.
    pub fn registry(&self) -> Result<ModelRegistry> {
        Ok(ModelRegistry::from_directory(&self.database_path)?)
    }
}
