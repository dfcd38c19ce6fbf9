//! Registry of database models keyed by version and language

use crate::loader::{CatalogLoader, DirectoryResourceLoader, ResourceLoader};
use crate::model::DatabaseModel;
use crate::types::RexsVersion;
use crate::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Registry holding every loaded database model.
///
/// Lookups match the exact `(version, language)` pair; there is no fallback
/// to a neighbouring version or another language.
#[derive(Debug, Default, Clone)]
pub struct ModelRegistry {
    models: HashMap<(RexsVersion, String), Arc<DatabaseModel>>,
}

impl ModelRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from every catalog a resource loader provides.
    ///
    /// # Errors
    ///
    /// Returns an error when any catalog fails to load.
    pub fn from_loader(resources: &dyn ResourceLoader) -> Result<Self> {
        let mut registry = Self::new();
        for model in CatalogLoader::new().load_all(resources)? {
            registry.register(model);
        }
        Ok(registry)
    }

    /// Build a registry from every catalog file in a directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory is missing or a catalog fails to load.
    pub fn from_directory(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_loader(&DirectoryResourceLoader::new(path.as_ref()))
    }

    /// Register a model, replacing any model with the same version and language
    pub fn register(&mut self, model: DatabaseModel) {
        let key = (model.version(), model.language().to_string());
        self.models.insert(key, Arc::new(model));
    }

    /// Get the model for an exact version and language.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the pair was never registered.
    pub fn get_model(&self, version: RexsVersion, language: &str) -> Result<&Arc<DatabaseModel>> {
        let model = self
            .models
            .get(&(version, language.to_string()))
            .ok_or_else(|| Error::not_found(&version, language))?;
        debug!("Registry hit for database model {} {}", version, language);
        Ok(model)
    }

    /// Check if a model exists
    #[must_use]
    pub fn contains(&self, version: RexsVersion, language: &str) -> bool {
        self.models.contains_key(&(version, language.to_string()))
    }

    /// All registered `(version, language)` pairs, sorted
    #[must_use]
    pub fn versions(&self) -> Vec<(RexsVersion, String)> {
        let mut keys: Vec<_> = self.models.keys().cloned().collect();
        keys.sort();
        keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DatabaseModelBuilder;

    fn model(major: u32, minor: u32, language: &str) -> DatabaseModel {
        DatabaseModelBuilder::new(RexsVersion::new(major, minor), language)
            .build()
            .unwrap()
    }

    #[test]
    fn test_exact_lookup() {
        let mut registry = ModelRegistry::new();
        registry.register(model(1, 4, "en"));
        registry.register(model(1, 4, "de"));

        let found = registry.get_model(RexsVersion::new(1, 4), "de").unwrap();
        assert_eq!(found.language(), "de");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_no_nearest_version_fallback() {
        let mut registry = ModelRegistry::new();
        registry.register(model(1, 4, "en"));

        let err = registry.get_model(RexsVersion::new(1, 3), "en").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(registry.get_model(RexsVersion::new(1, 4), "fr").is_err());
        assert!(!registry.contains(RexsVersion::new(1, 5), "en"));
    }

    #[test]
    fn test_versions_are_sorted() {
        let mut registry = ModelRegistry::new();
        registry.register(model(1, 4, "en"));
        registry.register(model(1, 3, "en"));

        let versions = registry.versions();
        assert_eq!(versions[0].0, RexsVersion::new(1, 3));
        assert_eq!(versions[1].0, RexsVersion::new(1, 4));
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ModelRegistry>();
    }
}
