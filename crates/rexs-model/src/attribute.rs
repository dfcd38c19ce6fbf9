//! Runtime attributes

use crate::value::Value;
use crate::{Error, Result};
use rexs_database::ValueType;
use std::sync::Arc;

/// Where an attribute's id, unit and type come from
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeDefinition {
    /// Backed by a database attribute definition
    Checked(Arc<rexs_database::Attribute>),
    /// Not known to the database for this component
    Custom {
        id: String,
        unit: String,
        value_type: ValueType,
    },
}

/// A decoded attribute value attached to a component
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    definition: AttributeDefinition,
    value: Value,
}

impl Attribute {
    /// Create a database-backed attribute.
    ///
    /// `unit` is the unit the document declares; `None` takes the database unit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnitMismatch`] when the declared unit differs from the
    /// database unit, and [`Error::TypeMismatch`] when the value shape does not
    /// fit the database value type.
    pub fn new(
        definition: Arc<rexs_database::Attribute>,
        unit: Option<&str>,
        value: Value,
    ) -> Result<Self> {
        if let Some(unit) = unit {
            if !definition.unit().matches(unit) {
                return Err(Error::unit_mismatch(
                    definition.attribute_id(),
                    &definition.unit().name,
                    unit,
                ));
            }
        }
        if !value.fits(definition.value_type()) {
            return Err(Error::type_mismatch(
                definition.value_type().name(),
                value.kind(),
            ));
        }
        Ok(Self {
            definition: AttributeDefinition::Checked(definition),
            value,
        })
    }

    /// Create a custom attribute without database backing
    pub fn custom(
        id: impl Into<String>,
        unit: impl Into<String>,
        value_type: ValueType,
        value: Value,
    ) -> Self {
        Self {
            definition: AttributeDefinition::Custom {
                id: id.into(),
                unit: unit.into(),
                value_type,
            },
            value,
        }
    }

    #[must_use]
    pub fn attribute_id(&self) -> &str {
        match &self.definition {
            AttributeDefinition::Checked(attribute) => attribute.attribute_id(),
            AttributeDefinition::Custom { id, .. } => id,
        }
    }

    #[must_use]
    pub fn unit(&self) -> &str {
        match &self.definition {
            AttributeDefinition::Checked(attribute) => &attribute.unit().name,
            AttributeDefinition::Custom { unit, .. } => unit,
        }
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match &self.definition {
            AttributeDefinition::Checked(attribute) => attribute.value_type(),
            AttributeDefinition::Custom { value_type, .. } => *value_type,
        }
    }

    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self.definition, AttributeDefinition::Custom { .. })
    }

    /// The database definition, `None` for custom attributes
    #[must_use]
    pub fn database_attribute(&self) -> Option<&Arc<rexs_database::Attribute>> {
        match &self.definition {
            AttributeDefinition::Checked(attribute) => Some(attribute),
            AttributeDefinition::Custom { .. } => None,
        }
    }

    #[must_use]
    pub fn definition(&self) -> &AttributeDefinition {
        &self.definition
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[must_use]
    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Point a reference attribute at another component id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] when the attribute does not hold a
    /// component reference.
    pub fn retarget_reference(&mut self, component: i64) -> Result<()> {
        self.value.as_reference()?;
        self.value = Value::reference(component).with_coding(self.value.coded());
        Ok(())
    }
}
