//! Database model definitions

use crate::types::{RexsVersion, ValueType};
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// A unit of measure, compared by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub id: u64,
    pub name: String,
}

impl Unit {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Check whether a document-declared unit names this unit.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.name == name
    }
}

/// Whether an interval endpoint is included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalType {
    Open,
    Closed,
}

/// One bound of a numeric interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalEndpoint {
    pub value: f64,
    pub kind: IntervalType,
}

impl IntervalEndpoint {
    #[must_use]
    pub fn open(value: f64) -> Self {
        Self {
            value,
            kind: IntervalType::Open,
        }
    }

    #[must_use]
    pub fn closed(value: f64) -> Self {
        Self {
            value,
            kind: IntervalType::Closed,
        }
    }
}

/// A numeric range an attribute value has to lie in.
///
/// Either bound may be unset, in which case that side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Interval {
    pub min: Option<IntervalEndpoint>,
    pub max: Option<IntervalEndpoint>,
}

impl Interval {
    #[must_use]
    pub fn new(min: Option<IntervalEndpoint>, max: Option<IntervalEndpoint>) -> Self {
        Self { min, max }
    }

    /// Check a single number against both bounds.
    #[must_use]
    pub fn check(&self, value: f64) -> bool {
        let above_min = self.min.is_none_or(|min| match min.kind {
            IntervalType::Open => value > min.value,
            IntervalType::Closed => value >= min.value,
        });
        let below_max = self.max.is_none_or(|max| match max.kind {
            IntervalType::Open => value < max.value,
            IntervalType::Closed => value <= max.value,
        });
        above_min && below_max
    }

    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// A single allowed enum value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub value: String,
    pub name: String,
}

/// The closed set of values an enum attribute accepts
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumValues {
    values: Vec<EnumValue>,
}

impl EnumValues {
    #[must_use]
    pub fn new(values: Vec<EnumValue>) -> Self {
        Self { values }
    }

    /// Check if a value is a member of the set
    #[must_use]
    pub fn check(&self, value: &str) -> bool {
        self.values.iter().any(|v| v.value == value)
    }

    #[must_use]
    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Definition of an attribute in the database
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    attribute_id: String,
    name: String,
    value_type: ValueType,
    unit: Unit,
    symbol: Option<String>,
    interval: Option<Interval>,
    enums: Option<EnumValues>,
}

impl Attribute {
    /// Create an attribute definition.
    ///
    /// # Errors
    ///
    /// Returns an error when an enum or enum array attribute has no enum values.
    pub fn new(
        attribute_id: impl Into<String>,
        name: impl Into<String>,
        value_type: ValueType,
        unit: Unit,
        symbol: Option<String>,
        interval: Option<Interval>,
        enums: Option<EnumValues>,
    ) -> Result<Self> {
        let attribute_id = attribute_id.into();
        if value_type.requires_enum_values() && enums.is_none() {
            return Err(Error::InvalidFormat(format!(
                "attribute id={attribute_id} of type {value_type} has no enum values"
            )));
        }
        Ok(Self {
            attribute_id,
            name: name.into(),
            value_type,
            unit,
            symbol,
            interval,
            enums,
        })
    }

    #[must_use]
    pub fn attribute_id(&self) -> &str {
        &self.attribute_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    #[must_use]
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    #[must_use]
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    #[must_use]
    pub fn interval(&self) -> Option<&Interval> {
        self.interval.as_ref()
    }

    #[must_use]
    pub fn enum_values(&self) -> Option<&EnumValues> {
        self.enums.as_ref()
    }
}

/// Definition of a component type in the database
#[derive(Debug, Clone)]
pub struct Component {
    component_id: String,
    name: String,
    attributes: Vec<Arc<Attribute>>,
}

impl Component {
    pub fn new(
        component_id: impl Into<String>,
        name: impl Into<String>,
        attributes: Vec<Arc<Attribute>>,
    ) -> Self {
        Self {
            component_id: component_id.into(),
            name: name.into(),
            attributes,
        }
    }

    #[must_use]
    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn attributes(&self) -> &[Arc<Attribute>] {
        &self.attributes
    }

    /// Find an attribute this component declares
    #[must_use]
    pub fn find_attribute(&self, attribute_id: &str) -> Option<&Arc<Attribute>> {
        self.attributes
            .iter()
            .find(|a| a.attribute_id() == attribute_id)
    }

    #[must_use]
    pub fn has_attribute(&self, attribute_id: &str) -> bool {
        self.find_attribute(attribute_id).is_some()
    }
}

/// The catalog for one REXS version and language
#[derive(Debug, Clone)]
pub struct DatabaseModel {
    version: RexsVersion,
    language: String,
    date: String,
    released: bool,
    units: HashMap<u64, Unit>,
    value_types: HashMap<u64, ValueType>,
    attributes: HashMap<String, Arc<Attribute>>,
    components: HashMap<String, Component>,
}

impl DatabaseModel {
    #[must_use]
    pub fn version(&self) -> RexsVersion {
        self.version
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }

    #[must_use]
    pub fn find_component(&self, component_id: &str) -> Option<&Component> {
        self.components.get(component_id)
    }

    #[must_use]
    pub fn find_attribute(&self, attribute_id: &str) -> Option<&Arc<Attribute>> {
        self.attributes.get(attribute_id)
    }

    #[must_use]
    pub fn find_unit(&self, id: u64) -> Option<&Unit> {
        self.units.get(&id)
    }

    #[must_use]
    pub fn find_value_type(&self, id: u64) -> Option<ValueType> {
        self.value_types.get(&id).copied()
    }

    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Iterate all component definitions in no particular order
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }
}

/// Builder used to assemble a [`DatabaseModel`] before it is shared
#[derive(Debug)]
pub struct DatabaseModelBuilder {
    model: DatabaseModel,
    mappings: Vec<(String, String)>,
}

impl DatabaseModelBuilder {
    pub fn new(version: RexsVersion, language: impl Into<String>) -> Self {
        Self {
            model: DatabaseModel {
                version,
                language: language.into(),
                date: String::new(),
                released: false,
                units: HashMap::new(),
                value_types: HashMap::new(),
                attributes: HashMap::new(),
                components: HashMap::new(),
            },
            mappings: Vec::new(),
        }
    }

    #[must_use]
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.model.date = date.into();
        self
    }

    #[must_use]
    pub fn released(mut self, released: bool) -> Self {
        self.model.released = released;
        self
    }

    #[must_use]
    pub fn unit(mut self, unit: Unit) -> Self {
        self.model.units.insert(unit.id, unit);
        self
    }

    #[must_use]
    pub fn value_type(mut self, id: u64, value_type: ValueType) -> Self {
        self.model.value_types.insert(id, value_type);
        self
    }

    #[must_use]
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.model
            .attributes
            .insert(attribute.attribute_id.clone(), Arc::new(attribute));
        self
    }

    /// Declare a component type; its attributes are attached in [`Self::build`].
    #[must_use]
    pub fn component(mut self, component_id: impl Into<String>, name: impl Into<String>) -> Self {
        let component = Component::new(component_id, name, Vec::new());
        self.model
            .components
            .insert(component.component_id.clone(), component);
        self
    }

    /// Declare that a component type carries an attribute.
    #[must_use]
    pub fn mapping(mut self, component_id: impl Into<String>, attribute_id: impl Into<String>) -> Self {
        self.mappings.push((component_id.into(), attribute_id.into()));
        self
    }

    /// Resolve component/attribute mappings and finish the model.
    ///
    /// # Errors
    ///
    /// Returns an error when a mapping names an unknown component or attribute.
    pub fn build(mut self) -> Result<DatabaseModel> {
        let catalog = format!("{} {}", self.model.version, self.model.language);
        for (component_id, attribute_id) in self.mappings {
            let attribute = self
                .model
                .attributes
                .get(&attribute_id)
                .cloned()
                .ok_or_else(|| {
                    Error::inconsistent(
                        &catalog,
                        format!("component {component_id} maps unknown attribute {attribute_id}"),
                    )
                })?;
            let component = self
                .model
                .components
                .get_mut(&component_id)
                .ok_or_else(|| {
                    Error::inconsistent(
                        &catalog,
                        format!("mapping for attribute {attribute_id} names unknown component {component_id}"),
                    )
                })?;
            if !component.has_attribute(&attribute_id) {
                component.attributes.push(attribute);
            }
        }
        Ok(self.model)
    }
}
