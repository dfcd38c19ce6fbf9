//! JSON model serializer

use crate::node::CODED_SUFFIX;
use rexs_loader::serializer::{reference_hint, relation_ids};
use rexs_loader::{Error, ModelSerializer, Result, Sink};
use rexs_model::coded;
use rexs_model::{Attribute, LoadComponent, Model, Value, ValueData};
use serde::Serialize;
use serde_json::{Map, Value as Json, json};

/// Writes models as pretty printed `.rexsj` JSON.
///
/// Attributes holding an empty value are not written.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl JsonSerializer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Serialize into a string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] when a coded value cannot be packed.
    pub fn to_json_string(&self, model: &Model) -> Result<String> {
        let document = Document {
            model: document_model(model)?,
        };
        let mut output = serde_json::to_string_pretty(&document)
            .map_err(|e| Error::serialization(e.to_string()))?;
        output.push('\n');
        Ok(output)
    }
}

impl ModelSerializer for JsonSerializer {
    fn serialize(&self, model: &Model, sink: &mut dyn Sink) -> Result<()> {
        sink.write(&self.to_json_string(model)?)
    }
}

#[derive(Serialize)]
struct Document<'a> {
    model: DocumentModel<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentModel<'a> {
    application_id: &'a str,
    application_version: &'a str,
    date: &'a str,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    application_language: Option<&'a str>,
    relations: Vec<DocumentRelation>,
    components: Vec<DocumentComponent<'a>>,
    #[serde(rename = "load_spectrum", skip_serializing_if = "Option::is_none")]
    load_spectrum: Option<DocumentSpectrum<'a>>,
}

#[derive(Serialize)]
struct DocumentRelation {
    id: u64,
    #[serde(rename = "type")]
    relation_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    order: Option<u32>,
    refs: Vec<DocumentReference>,
}

#[derive(Serialize)]
struct DocumentReference {
    id: u64,
    role: &'static str,
    hint: String,
}

#[derive(Serialize)]
struct DocumentComponent<'a> {
    id: u64,
    name: &'a str,
    #[serde(rename = "type")]
    component_type: &'a str,
    attributes: Vec<DocumentAttribute<'a>>,
}

#[derive(Serialize)]
struct DocumentAttribute<'a> {
    id: &'a str,
    unit: &'a str,
    #[serde(flatten)]
    value: Map<String, Json>,
}

#[derive(Serialize)]
struct DocumentSpectrum<'a> {
    id: u64,
    load_cases: Vec<DocumentLoadCase<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    accumulation: Option<DocumentAccumulation<'a>>,
}

#[derive(Serialize)]
struct DocumentLoadCase<'a> {
    id: usize,
    components: Vec<DocumentLoadComponent<'a>>,
}

#[derive(Serialize)]
struct DocumentAccumulation<'a> {
    components: Vec<DocumentLoadComponent<'a>>,
}

#[derive(Serialize)]
struct DocumentLoadComponent<'a> {
    id: u64,
    attributes: Vec<DocumentAttribute<'a>>,
}

fn document_model(model: &Model) -> Result<DocumentModel<'_>> {
    let info = model.info();

    let relations = model
        .relations()
        .iter()
        .zip(relation_ids(model))
        .map(|(relation, id)| DocumentRelation {
            id,
            relation_type: relation.relation_type().name(),
            order: relation.order(),
            refs: relation
                .references()
                .iter()
                .map(|reference| DocumentReference {
                    id: reference.component(),
                    role: reference.role().name(),
                    hint: reference_hint(model, reference),
                })
                .collect(),
        })
        .collect();

    let components = model
        .components()
        .iter()
        .map(|component| {
            Ok::<_, Error>(DocumentComponent {
                id: component.internal_id(),
                name: component.name(),
                component_type: component.component_type(),
                attributes: attributes(component.attributes())?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let spectrum = model.spectrum();
    let load_spectrum = if spectrum.is_empty() {
        None
    } else {
        let load_cases = spectrum
            .load_cases()
            .iter()
            .enumerate()
            .map(|(index, case)| {
                Ok::<_, Error>(DocumentLoadCase {
                    id: index + 1,
                    components: load_components(case.components())?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let accumulation = spectrum
            .accumulation()
            .map(|accumulation| {
                Ok::<_, Error>(DocumentAccumulation {
                    components: load_components(accumulation.components())?,
                })
            })
            .transpose()?;
        Some(DocumentSpectrum {
            id: 1,
            load_cases,
            accumulation,
        })
    };

    Ok(DocumentModel {
        application_id: &info.application_id,
        application_version: &info.application_version,
        date: &info.date,
        version: info.version.to_string(),
        application_language: info.language.as_deref(),
        relations,
        components,
        load_spectrum,
    })
}

fn load_components(components: &[LoadComponent]) -> Result<Vec<DocumentLoadComponent<'_>>> {
    components
        .iter()
        .map(|component| {
            Ok::<_, Error>(DocumentLoadComponent {
                id: component.component(),
                attributes: attributes(component.attributes())?,
            })
        })
        .collect()
}

/// Attributes without a value are skipped
fn attributes(attributes: &[Attribute]) -> Result<Vec<DocumentAttribute<'_>>> {
    attributes
        .iter()
        .filter(|attribute| !attribute.value().is_empty())
        .map(|attribute| {
            Ok::<_, Error>(DocumentAttribute {
                id: attribute.attribute_id(),
                unit: attribute.unit(),
                value: value_field(attribute)?,
            })
        })
        .collect()
}

/// The value field of an attribute object
fn value_field(attribute: &Attribute) -> Result<Map<String, Json>> {
    let mut field = Map::new();
    let value = attribute.value();
    let Some(data) = value.data() else {
        return Ok(field);
    };
    let name = attribute.value_type().name();
    if let Some(payload) = coded_payload(value, data)? {
        field.insert(format!("{name}{CODED_SUFFIX}"), payload);
    } else {
        field.insert(name.to_string(), plain(data));
    }
    Ok(field)
}

fn coded_payload(value: &Value, data: &ValueData) -> Result<Option<Json>> {
    let coding = value.coded();
    let Some(code) = coding.name() else {
        return Ok(None);
    };
    let packed = match data {
        ValueData::IntegerArray(values) => coded::encode_integers(values, coding)
            .map(|payload| json!({"code": code, "value": payload})),
        ValueData::FloatingPointArray(values) => coded::encode_floats(values, coding)
            .map(|payload| json!({"code": code, "value": payload})),
        ValueData::FloatingPointMatrix(matrix) => {
            coded::encode_matrix(matrix, coding).map(|payload| {
                json!({
                    "code": code,
                    "value": payload,
                    "rows": matrix.row_count(),
                    "columns": matrix.column_count(),
                })
            })
        }
        _ => return Ok(None),
    };
    packed
        .map(Some)
        .map_err(|e| Error::serialization(e.to_string()))
}

fn plain(data: &ValueData) -> Json {
    match data {
        ValueData::Boolean(v) => json!(v),
        ValueData::Integer(v) | ValueData::ReferenceComponent(v) => json!(v),
        ValueData::FloatingPoint(v) => json!(v),
        ValueData::String(v) => json!(v),
        ValueData::BooleanArray(v) => json!(v),
        ValueData::IntegerArray(v) => json!(v),
        ValueData::FloatingPointArray(v) => json!(v),
        ValueData::StringArray(v) => json!(v),
        ValueData::FloatingPointMatrix(m) => json!(m.rows()),
        ValueData::StringMatrix(m) => json!(m.rows()),
        ValueData::ArrayOfIntegerArrays(v) => json!(v),
    }
}
