//! Model header and the assembled model

use crate::component::Component;
use crate::load_spectrum::LoadSpectrum;
use crate::relation::Relation;
use rexs_database::RexsVersion;

/// Header information of a REXS document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub application_id: String,
    pub application_version: String,
    pub date: String,
    pub version: RexsVersion,
    pub language: Option<String>,
}

impl ModelInfo {
    pub fn new(
        application_id: impl Into<String>,
        application_version: impl Into<String>,
        date: impl Into<String>,
        version: RexsVersion,
        language: Option<String>,
    ) -> Self {
        Self {
            application_id: application_id.into(),
            application_version: application_version.into(),
            date: date.into(),
            version,
            language,
        }
    }
}

/// A loaded REXS model.
///
/// Relations and load components refer to components by internal id.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    info: ModelInfo,
    components: Vec<Component>,
    relations: Vec<Relation>,
    spectrum: LoadSpectrum,
}

impl Model {
    #[must_use]
    pub fn new(
        info: ModelInfo,
        components: Vec<Component>,
        relations: Vec<Relation>,
        spectrum: LoadSpectrum,
    ) -> Self {
        Self {
            info,
            components,
            relations,
            spectrum,
        }
    }

    #[must_use]
    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    #[must_use]
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    #[must_use]
    pub fn spectrum(&self) -> &LoadSpectrum {
        &self.spectrum
    }

    /// Find a component by internal id
    #[must_use]
    pub fn find_component(&self, internal_id: u64) -> Option<&Component> {
        self.components
            .iter()
            .find(|c| c.internal_id() == internal_id)
    }

    /// Components that take part in no relation
    pub fn unused_components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(|c| {
            !self
                .relations
                .iter()
                .any(|r| r.references_component(c.internal_id()))
        })
    }
}
