//! XML model loader

use crate::dom::{self, Element};
use crate::node::{XmlNode, decode_unknown};
use crate::schema::XmlStructureValidator;
use rexs_database::{ModelRegistry, ValueType};
use rexs_loader::{
    AttributeSource, LoadOutcome, ModelLoader, RawComponent, RawInfo, RawLoadCase,
    RawLoadComponent, RawLoadSpectrum, RawModel, RawReference, RawRelation, Result, assemble,
};
use rexs_model::Value;
use rexs_validation::{LoadResult, Mode, Severity, StructuralValidator};
use tracing::debug;

const DEFAULT_LANGUAGE: &str = "en";

/// Loads `.rexs` XML documents against a model registry
#[derive(Debug, Clone, Copy)]
pub struct XmlModelLoader<'r> {
    registry: &'r ModelRegistry,
    validator: XmlStructureValidator,
}

impl<'r> XmlModelLoader<'r> {
    #[must_use]
    pub fn new(registry: &'r ModelRegistry) -> Self {
        Self {
            registry,
            validator: XmlStructureValidator::new(),
        }
    }
}

impl ModelLoader for XmlModelLoader<'_> {
    fn load_from_bytes(&self, bytes: &[u8], mode: Mode) -> Result<LoadOutcome> {
        let mut result = LoadResult::new(mode);

        let root = match dom::parse(bytes) {
            Ok(root) => root,
            Err(e) => {
                result.add_error(format!("cannot parse xml document: {e}"), Severity::Critical);
                return Ok((None, result));
            }
        };

        let mut errors = Vec::new();
        if !self.validator.validate(&root, &mut errors) {
            for error in errors {
                result.add_error(error, Severity::Critical);
            }
            return Ok((None, result));
        }
        debug!("xml document is structurally valid");

        let raw = read_model(&root);
        let language = raw
            .info
            .language
            .clone()
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        assemble(&raw, self.registry, &language, result)
    }
}

/// A borrowed `<attribute>` element
#[derive(Debug, Clone, Copy)]
pub struct XmlAttribute<'a>(&'a Element);

impl<'a> AttributeSource for XmlAttribute<'a> {
    type Node = XmlNode<'a>;

    fn id(&self) -> &str {
        self.0.attribute("id").unwrap_or_default()
    }

    fn unit(&self) -> Option<&str> {
        self.0.attribute("unit")
    }

    fn value_node(&self, _value_type: ValueType) -> Option<XmlNode<'a>> {
        Some(XmlNode(self.0))
    }

    fn decode_custom(&self) -> Option<(ValueType, Value)> {
        Some(decode_unknown(self.0))
    }
}

fn attr(element: &Element, name: &str) -> String {
    element.attribute(name).unwrap_or_default().to_string()
}

fn read_model(root: &Element) -> RawModel<XmlAttribute<'_>> {
    let info = RawInfo {
        application_id: attr(root, "applicationId"),
        application_version: attr(root, "applicationVersion"),
        date: attr(root, "date"),
        version: attr(root, "version"),
        language: root.attribute("applicationLanguage").map(str::to_string),
    };

    let components = root
        .children_named("components")
        .flat_map(|c| c.children_named("component"))
        .map(|component| RawComponent {
            id: attr(component, "id"),
            component_type: attr(component, "type"),
            name: attr(component, "name"),
            attributes: attributes(component),
        })
        .collect();

    let relations = root
        .children_named("relations")
        .flat_map(|r| r.children_named("relation"))
        .map(|relation| RawRelation {
            id: relation.attribute("id").map(str::to_string),
            relation_type: attr(relation, "type"),
            order: relation.attribute("order").and_then(|o| o.trim().parse().ok()),
            references: relation
                .children_named("ref")
                .map(|reference| RawReference {
                    id: attr(reference, "id"),
                    role: attr(reference, "role"),
                    hint: reference.attribute("hint").map(str::to_string),
                })
                .collect(),
        })
        .collect();

    let load_spectrum = root.child("load_spectrum").map(|spectrum| RawLoadSpectrum {
        id: spectrum.attribute("id").map(str::to_string),
        load_cases: spectrum
            .children_named("load_case")
            .map(|case| RawLoadCase {
                id: attr(case, "id"),
                components: load_components(case),
            })
            .collect(),
        accumulation: spectrum.child("accumulation").map(load_components),
    });

    RawModel {
        info,
        components,
        relations,
        load_spectrum,
    }
}

fn attributes(component: &Element) -> Vec<XmlAttribute<'_>> {
    component
        .children_named("attribute")
        .map(XmlAttribute)
        .collect()
}

fn load_components(parent: &Element) -> Vec<RawLoadComponent<XmlAttribute<'_>>> {
    parent
        .children_named("component")
        .map(|component| RawLoadComponent {
            id: attr(component, "id"),
            attributes: attributes(component),
        })
        .collect()
}
