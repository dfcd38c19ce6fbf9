//! Structural checks for REXS JSON documents

use rexs_validation::StructuralValidator;
use serde_json::{Map, Value};

/// Checks required keys and JSON types of a `{"model": ..}` document.
///
/// Attribute value fields are not checked here; a missing or malformed value
/// is reported while the loader decodes it.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStructureValidator;

impl JsonStructureValidator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl StructuralValidator<Value> for JsonStructureValidator {
    fn validate(&self, document: &Value, errors: &mut Vec<String>) -> bool {
        let before = errors.len();
        Checker {
            errors: &mut *errors,
        }
        .document(document);
        errors.len() == before
    }
}

#[derive(Clone, Copy)]
enum Kind {
    String,
    Id,
    Unsigned,
    Object,
    Array,
}

impl Kind {
    fn name(self) -> &'static str {
        match self {
            Kind::String => "a string",
            Kind::Id => "a number or string",
            Kind::Unsigned => "a non-negative integer",
            Kind::Object => "an object",
            Kind::Array => "an array",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            Kind::String => value.is_string(),
            Kind::Id => value.is_string() || value.is_u64() || value.is_i64(),
            Kind::Unsigned => value.as_u64().is_some_and(|n| u32::try_from(n).is_ok()),
            Kind::Object => value.is_object(),
            Kind::Array => value.is_array(),
        }
    }
}

struct Checker<'e> {
    errors: &'e mut Vec<String>,
}

impl Checker<'_> {
    fn document(&mut self, document: &Value) {
        let Some(root) = document.as_object() else {
            self.errors.push("document must be a JSON object".to_string());
            return;
        };
        let Some(model) = self.field(root, "", "model", Kind::Object, true) else {
            return;
        };
        let Some(model) = model.as_object() else {
            return;
        };
        for key in ["applicationId", "applicationVersion", "date", "version"] {
            self.field(model, "model", key, Kind::String, true);
        }
        self.field(model, "model", "applicationLanguage", Kind::String, false);

        if let Some(relations) = self.list(model, "model", "relations", true) {
            for (index, relation) in relations.iter().enumerate() {
                self.relation(relation, &format!("model.relations[{index}]"));
            }
        }
        if let Some(components) = self.list(model, "model", "components", true) {
            for (index, component) in components.iter().enumerate() {
                let path = format!("model.components[{index}]");
                if let Some(component) = self.object(component, &path) {
                    self.field(component, &path, "id", Kind::Id, true);
                    self.field(component, &path, "type", Kind::String, true);
                    self.field(component, &path, "name", Kind::String, false);
                    self.attributes(component, &path);
                }
            }
        }
        if let Some(spectrum) = self.field(model, "model", "load_spectrum", Kind::Object, false) {
            self.load_spectrum(spectrum, "model.load_spectrum");
        }
    }

    fn relation(&mut self, relation: &Value, path: &str) {
        let Some(relation) = self.object(relation, path) else {
            return;
        };
        self.field(relation, path, "id", Kind::Id, false);
        self.field(relation, path, "type", Kind::String, true);
        self.field(relation, path, "order", Kind::Unsigned, false);
        if let Some(refs) = self.list(relation, path, "refs", true) {
            for (index, reference) in refs.iter().enumerate() {
                let path = format!("{path}.refs[{index}]");
                if let Some(reference) = self.object(reference, &path) {
                    self.field(reference, &path, "id", Kind::Id, true);
                    self.field(reference, &path, "role", Kind::String, true);
                    self.field(reference, &path, "hint", Kind::String, false);
                }
            }
        }
    }

    fn load_spectrum(&mut self, spectrum: &Value, path: &str) {
        let Some(spectrum) = spectrum.as_object() else {
            return;
        };
        self.field(spectrum, path, "id", Kind::Id, false);
        if let Some(cases) = self.list(spectrum, path, "load_cases", false) {
            for (index, case) in cases.iter().enumerate() {
                let path = format!("{path}.load_cases[{index}]");
                if let Some(case) = self.object(case, &path) {
                    self.field(case, &path, "id", Kind::Id, true);
                    self.load_components(case, &path);
                }
            }
        }
        if let Some(accumulation) = self
            .field(spectrum, path, "accumulation", Kind::Object, false)
            .and_then(Value::as_object)
        {
            self.load_components(accumulation, &format!("{path}.accumulation"));
        }
    }

    fn load_components(&mut self, parent: &Map<String, Value>, path: &str) {
        if let Some(components) = self.list(parent, path, "components", true) {
            for (index, component) in components.iter().enumerate() {
                let path = format!("{path}.components[{index}]");
                if let Some(component) = self.object(component, &path) {
                    self.field(component, &path, "id", Kind::Id, true);
                    self.attributes(component, &path);
                }
            }
        }
    }

    fn attributes(&mut self, component: &Map<String, Value>, path: &str) {
        if let Some(attributes) = self.list(component, path, "attributes", false) {
            for (index, attribute) in attributes.iter().enumerate() {
                let path = format!("{path}.attributes[{index}]");
                if let Some(attribute) = self.object(attribute, &path) {
                    self.field(attribute, &path, "id", Kind::String, true);
                    self.field(attribute, &path, "unit", Kind::String, false);
                }
            }
        }
    }

    fn object<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v Map<String, Value>> {
        let object = value.as_object();
        if object.is_none() {
            self.errors.push(format!("'{path}' must be an object"));
        }
        object
    }

    fn list<'v>(
        &mut self,
        parent: &'v Map<String, Value>,
        path: &str,
        key: &str,
        required: bool,
    ) -> Option<&'v Vec<Value>> {
        self.field(parent, path, key, Kind::Array, required)?.as_array()
    }

    /// Look up `key`, reporting a missing required key or a wrong JSON type
    fn field<'v>(
        &mut self,
        parent: &'v Map<String, Value>,
        path: &str,
        key: &str,
        kind: Kind,
        required: bool,
    ) -> Option<&'v Value> {
        let location = if path.is_empty() {
            key.to_string()
        } else {
            format!("{path}.{key}")
        };
        match parent.get(key) {
            None if required => {
                self.errors
                    .push(format!("'{location}' is required but missing"));
                None
            }
            None => None,
            Some(value) if kind.accepts(value) => Some(value),
            Some(_) => {
                self.errors
                    .push(format!("'{location}' must be {}", kind.name()));
                None
            }
        }
    }
}
