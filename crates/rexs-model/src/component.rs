//! Runtime components

use crate::attribute::Attribute;
use crate::value::Value;

/// A component of a loaded model.
///
/// The internal id is assigned during loading and is unrelated to the id the
/// source document used.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    internal_id: u64,
    component_type: String,
    name: String,
    attributes: Vec<Attribute>,
}

impl Component {
    pub fn new(
        internal_id: u64,
        component_type: impl Into<String>,
        name: impl Into<String>,
        attributes: Vec<Attribute>,
    ) -> Self {
        Self {
            internal_id,
            component_type: component_type.into(),
            name: name.into(),
            attributes,
        }
    }

    #[must_use]
    pub fn internal_id(&self) -> u64 {
        self.internal_id
    }

    #[must_use]
    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Find an attribute by id
    #[must_use]
    pub fn find_attribute(&self, attribute_id: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.attribute_id() == attribute_id)
    }

    #[must_use]
    pub fn has_attribute(&self, attribute_id: &str) -> bool {
        self.find_attribute(attribute_id).is_some()
    }

    /// Value of an attribute, if the component carries it
    #[must_use]
    pub fn attribute_value(&self, attribute_id: &str) -> Option<&Value> {
        self.find_attribute(attribute_id).map(Attribute::value)
    }
}
