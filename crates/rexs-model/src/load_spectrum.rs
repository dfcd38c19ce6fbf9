//! Load spectrum: load cases and accumulation

use crate::attribute::Attribute;

/// Load-specific attributes of one base component
#[derive(Debug, Clone, PartialEq)]
pub struct LoadComponent {
    component: u64,
    attributes: Vec<Attribute>,
}

impl LoadComponent {
    /// `component` is the internal id of the base component
    #[must_use]
    pub fn new(component: u64, attributes: Vec<Attribute>) -> Self {
        Self {
            component,
            attributes,
        }
    }

    /// Internal id of the base component
    #[must_use]
    pub fn component(&self) -> u64 {
        self.component
    }

    /// Load attributes only, never the base component's own attributes
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    #[must_use]
    pub fn find_attribute(&self, attribute_id: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.attribute_id() == attribute_id)
    }
}

/// One operating condition
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadCase {
    components: Vec<LoadComponent>,
}

impl LoadCase {
    #[must_use]
    pub fn new(components: Vec<LoadComponent>) -> Self {
        Self { components }
    }

    #[must_use]
    pub fn components(&self) -> &[LoadComponent] {
        &self.components
    }

    /// Load component for a base component, if the case defines one
    #[must_use]
    pub fn find_component(&self, component: u64) -> Option<&LoadComponent> {
        self.components.iter().find(|c| c.component == component)
    }
}

/// Accumulated loads, shaped like a single load case
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Accumulation {
    components: Vec<LoadComponent>,
}

impl Accumulation {
    #[must_use]
    pub fn new(components: Vec<LoadComponent>) -> Self {
        Self { components }
    }

    #[must_use]
    pub fn components(&self) -> &[LoadComponent] {
        &self.components
    }
}

/// All load cases of a model plus the optional accumulation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadSpectrum {
    load_cases: Vec<LoadCase>,
    accumulation: Option<Accumulation>,
}

impl LoadSpectrum {
    #[must_use]
    pub fn new(load_cases: Vec<LoadCase>, accumulation: Option<Accumulation>) -> Self {
        Self {
            load_cases,
            accumulation,
        }
    }

    #[must_use]
    pub fn load_cases(&self) -> &[LoadCase] {
        &self.load_cases
    }

    #[must_use]
    pub fn accumulation(&self) -> Option<&Accumulation> {
        self.accumulation.as_ref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.load_cases.is_empty() && self.accumulation.is_none()
    }
}
