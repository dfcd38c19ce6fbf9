//! JSON model loader

use crate::node::{JsonNode, decode_unknown, value_field};
use crate::schema::JsonStructureValidator;
use rexs_database::{ModelRegistry, ValueType};
use rexs_loader::{
    AttributeSource, LoadOutcome, ModelLoader, RawComponent, RawInfo, RawLoadCase,
    RawLoadComponent, RawLoadSpectrum, RawModel, RawReference, RawRelation, Result, assemble,
};
use rexs_model::Value;
use rexs_validation::{LoadResult, Mode, Severity, StructuralValidator};
use serde_json::{Map, Value as Json};
use tracing::debug;

/// JSON documents are always looked up in the English database
const LOOKUP_LANGUAGE: &str = "en";

/// Loads `.rexsj` JSON documents against a model registry
#[derive(Debug, Clone, Copy)]
pub struct JsonModelLoader<'r> {
    registry: &'r ModelRegistry,
    validator: JsonStructureValidator,
}

impl<'r> JsonModelLoader<'r> {
    #[must_use]
    pub fn new(registry: &'r ModelRegistry) -> Self {
        Self {
            registry,
            validator: JsonStructureValidator::new(),
        }
    }
}

impl ModelLoader for JsonModelLoader<'_> {
    fn load_from_bytes(&self, bytes: &[u8], mode: Mode) -> Result<LoadOutcome> {
        let mut result = LoadResult::new(mode);

        let document = match crate::parse(bytes) {
            Ok(document) => document,
            Err(e) => {
                result.add_error(format!("cannot parse json document: {e}"), Severity::Critical);
                return Ok((None, result));
            }
        };

        let mut errors = Vec::new();
        if !self.validator.validate(&document, &mut errors) {
            for error in errors {
                result.add_error(error, Severity::Critical);
            }
            return Ok((None, result));
        }
        debug!("json document is structurally valid");

        let Some(model) = document.get("model").and_then(Json::as_object) else {
            result.add_error("document has no model object", Severity::Critical);
            return Ok((None, result));
        };
        let raw = read_model(model);
        assemble(&raw, self.registry, LOOKUP_LANGUAGE, result)
    }
}

/// A borrowed attribute object
#[derive(Debug, Clone, Copy)]
pub struct JsonAttribute<'a>(&'a Map<String, Json>);

impl<'a> AttributeSource for JsonAttribute<'a> {
    type Node = JsonNode<'a>;

    fn id(&self) -> &str {
        self.0.get("id").and_then(Json::as_str).unwrap_or_default()
    }

    fn unit(&self) -> Option<&str> {
        self.0.get("unit").and_then(Json::as_str)
    }

    fn value_node(&self, value_type: ValueType) -> Option<JsonNode<'a>> {
        value_field(self.0, value_type)
    }

    fn decode_custom(&self) -> Option<(ValueType, Value)> {
        decode_unknown(self.0)
    }
}

/// Ids may be written as numbers or strings
fn id(object: &Map<String, Json>) -> String {
    match object.get("id") {
        Some(Json::String(s)) => s.clone(),
        Some(Json::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn text(object: &Map<String, Json>, key: &str) -> String {
    object
        .get(key)
        .and_then(Json::as_str)
        .unwrap_or_default()
        .to_string()
}

fn objects<'a>(object: &'a Map<String, Json>, key: &str) -> impl Iterator<Item = &'a Map<String, Json>> {
    object
        .get(key)
        .and_then(Json::as_array)
        .into_iter()
        .flatten()
        .filter_map(Json::as_object)
}

fn read_model(model: &Map<String, Json>) -> RawModel<JsonAttribute<'_>> {
    let info = RawInfo {
        application_id: text(model, "applicationId"),
        application_version: text(model, "applicationVersion"),
        date: text(model, "date"),
        version: text(model, "version"),
        language: model
            .get("applicationLanguage")
            .and_then(Json::as_str)
            .map(str::to_string),
    };

    let components = objects(model, "components")
        .map(|component| RawComponent {
            id: id(component),
            component_type: text(component, "type"),
            name: text(component, "name"),
            attributes: attributes(component),
        })
        .collect();

    let relations = objects(model, "relations")
        .map(|relation| RawRelation {
            id: relation.get("id").map(|_| id(relation)),
            relation_type: text(relation, "type"),
            order: relation
                .get("order")
                .and_then(Json::as_u64)
                .and_then(|o| u32::try_from(o).ok()),
            references: objects(relation, "refs")
                .map(|reference| RawReference {
                    id: id(reference),
                    role: text(reference, "role"),
                    hint: reference
                        .get("hint")
                        .and_then(Json::as_str)
                        .map(str::to_string),
                })
                .collect(),
        })
        .collect();

    let load_spectrum = model
        .get("load_spectrum")
        .and_then(Json::as_object)
        .map(|spectrum| RawLoadSpectrum {
            id: spectrum.get("id").map(|_| id(spectrum)),
            load_cases: objects(spectrum, "load_cases")
                .map(|case| RawLoadCase {
                    id: id(case),
                    components: load_components(case),
                })
                .collect(),
            accumulation: spectrum
                .get("accumulation")
                .and_then(Json::as_object)
                .map(load_components),
        });

    RawModel {
        info,
        components,
        relations,
        load_spectrum,
    }
}

fn attributes(component: &Map<String, Json>) -> Vec<JsonAttribute<'_>> {
    objects(component, "attributes").map(JsonAttribute).collect()
}

fn load_components(parent: &Map<String, Json>) -> Vec<RawLoadComponent<JsonAttribute<'_>>> {
    objects(parent, "components")
        .map(|component| RawLoadComponent {
            id: id(component),
            attributes: attributes(component),
        })
        .collect()
}
