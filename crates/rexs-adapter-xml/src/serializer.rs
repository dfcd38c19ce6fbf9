//! XML model serializer

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rexs_loader::serializer::{reference_hint, relation_ids};
use rexs_loader::{Error, ModelSerializer, Result, Sink};
use rexs_model::coded::{self, CodedValueType};
use rexs_model::{Attribute, LoadComponent, Matrix, Model, Value, ValueData};
use std::fmt::Display;

/// Writes models as indented `.rexs` XML.
///
/// Attributes holding an empty value are not written.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlSerializer;

impl XmlSerializer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Serialize into a string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] when a coded value cannot be packed.
    pub fn to_xml_string(&self, model: &Model) -> Result<String> {
        let mut writer = XmlWriter {
            inner: Writer::new_with_indent(Vec::new(), b' ', 2),
        };
        writer.model(model)?;
        let mut output = String::from_utf8(writer.inner.into_inner())
            .map_err(|e| Error::serialization(e.to_string()))?;
        output.push('\n');
        Ok(output)
    }
}

impl ModelSerializer for XmlSerializer {
    fn serialize(&self, model: &Model, sink: &mut dyn Sink) -> Result<()> {
        sink.write(&self.to_xml_string(model)?)
    }
}

struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.inner
            .write_event(event)
            .map_err(|e| Error::serialization(e.to_string()))
    }

    fn start(&mut self, element: BytesStart<'_>) -> Result<()> {
        self.event(Event::Start(element))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn text_element(&mut self, element: BytesStart<'_>, text: &str) -> Result<()> {
        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
        self.start(element)?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.end(&name)
    }

    fn model(&mut self, model: &Model) -> Result<()> {
        self.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let info = model.info();
        let version = info.version.to_string();
        let mut root = BytesStart::new("model");
        root.push_attribute(("applicationId", info.application_id.as_str()));
        root.push_attribute(("applicationVersion", info.application_version.as_str()));
        root.push_attribute(("date", info.date.as_str()));
        root.push_attribute(("version", version.as_str()));
        if let Some(language) = &info.language {
            root.push_attribute(("applicationLanguage", language.as_str()));
        }
        self.start(root)?;

        self.start(BytesStart::new("relations"))?;
        for (relation, id) in model.relations().iter().zip(relation_ids(model)) {
            let id = id.to_string();
            let mut start = BytesStart::new("relation");
            start.push_attribute(("id", id.as_str()));
            start.push_attribute(("type", relation.relation_type().name()));
            let order = relation.order().map(|o| o.to_string());
            if let Some(order) = &order {
                start.push_attribute(("order", order.as_str()));
            }
            self.start(start)?;
            for reference in relation.references() {
                let component = reference.component().to_string();
                let hint = reference_hint(model, reference);
                let mut start = BytesStart::new("ref");
                start.push_attribute(("id", component.as_str()));
                start.push_attribute(("role", reference.role().name()));
                start.push_attribute(("hint", hint.as_str()));
                self.event(Event::Empty(start))?;
            }
            self.end("relation")?;
        }
        self.end("relations")?;

        self.start(BytesStart::new("components"))?;
        for component in model.components() {
            let id = component.internal_id().to_string();
            let mut start = BytesStart::new("component");
            start.push_attribute(("id", id.as_str()));
            start.push_attribute(("name", component.name()));
            start.push_attribute(("type", component.component_type()));
            self.start(start)?;
            self.attributes(component.attributes())?;
            self.end("component")?;
        }
        self.end("components")?;

        let spectrum = model.spectrum();
        if !spectrum.is_empty() {
            let mut start = BytesStart::new("load_spectrum");
            start.push_attribute(("id", "1"));
            self.start(start)?;
            for (index, case) in spectrum.load_cases().iter().enumerate() {
                let id = (index + 1).to_string();
                let mut start = BytesStart::new("load_case");
                start.push_attribute(("id", id.as_str()));
                self.start(start)?;
                self.load_components(case.components())?;
                self.end("load_case")?;
            }
            if let Some(accumulation) = spectrum.accumulation() {
                self.start(BytesStart::new("accumulation"))?;
                self.load_components(accumulation.components())?;
                self.end("accumulation")?;
            }
            self.end("load_spectrum")?;
        }

        self.end("model")
    }

    fn load_components(&mut self, components: &[LoadComponent]) -> Result<()> {
        for component in components {
            let id = component.component().to_string();
            let mut start = BytesStart::new("component");
            start.push_attribute(("id", id.as_str()));
            self.start(start)?;
            self.attributes(component.attributes())?;
            self.end("component")?;
        }
        Ok(())
    }

    /// Attributes without a value are skipped
    fn attributes(&mut self, attributes: &[Attribute]) -> Result<()> {
        for attribute in attributes {
            let value = attribute.value();
            let Some(data) = value.data() else {
                continue;
            };
            let mut start = BytesStart::new("attribute");
            start.push_attribute(("id", attribute.attribute_id()));
            start.push_attribute(("unit", attribute.unit()));
            self.value(start, value, data)?;
        }
        Ok(())
    }

    fn value(&mut self, start: BytesStart<'_>, value: &Value, data: &ValueData) -> Result<()> {
        match data {
            ValueData::Boolean(v) => self.text_element(start, &v.to_string()),
            ValueData::Integer(v) | ValueData::ReferenceComponent(v) => {
                self.text_element(start, &v.to_string())
            }
            ValueData::FloatingPoint(v) => self.text_element(start, &v.to_string()),
            ValueData::String(v) => self.text_element(start, v),
            ValueData::BooleanArray(values) => self.wrapped(start, |w| w.array(values)),
            ValueData::StringArray(values) => self.wrapped(start, |w| w.array(values)),
            ValueData::IntegerArray(values) if value.coded().is_coded() => {
                let payload = coded::encode_integers(values, value.coded())
                    .map_err(|e| Error::serialization(e.to_string()))?;
                self.wrapped(start, |w| w.coded_array(value.coded(), &payload))
            }
            ValueData::IntegerArray(values) => self.wrapped(start, |w| w.array(values)),
            ValueData::FloatingPointArray(values) if value.coded().is_coded() => {
                let payload = coded::encode_floats(values, value.coded())
                    .map_err(|e| Error::serialization(e.to_string()))?;
                self.wrapped(start, |w| w.coded_array(value.coded(), &payload))
            }
            ValueData::FloatingPointArray(values) => self.wrapped(start, |w| w.array(values)),
            ValueData::FloatingPointMatrix(matrix) if value.coded().is_coded() => {
                let payload = coded::encode_matrix(matrix, value.coded())
                    .map_err(|e| Error::serialization(e.to_string()))?;
                self.wrapped(start, |w| w.coded_matrix(value.coded(), matrix, &payload))
            }
            ValueData::FloatingPointMatrix(matrix) => self.wrapped(start, |w| w.matrix(matrix)),
            ValueData::StringMatrix(matrix) => self.wrapped(start, |w| w.matrix(matrix)),
            ValueData::ArrayOfIntegerArrays(arrays) => self.wrapped(start, |w| {
                w.start(BytesStart::new("array_of_arrays"))?;
                for array in arrays {
                    w.array(array)?;
                }
                w.end("array_of_arrays")
            }),
        }
    }

    /// Write `start`, the content, and the matching end tag
    fn wrapped(
        &mut self,
        start: BytesStart<'_>,
        content: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        self.start(start)?;
        content(self)?;
        self.end(&name)
    }

    fn cells<T: Display>(&mut self, values: &[T]) -> Result<()> {
        for value in values {
            self.text_element(BytesStart::new("c"), &value.to_string())?;
        }
        Ok(())
    }

    fn array<T: Display>(&mut self, values: &[T]) -> Result<()> {
        self.start(BytesStart::new("array"))?;
        self.cells(values)?;
        self.end("array")
    }

    fn matrix<T: Display>(&mut self, matrix: &Matrix<T>) -> Result<()> {
        self.start(BytesStart::new("matrix"))?;
        for row in matrix.rows() {
            self.start(BytesStart::new("r"))?;
            self.cells(row)?;
            self.end("r")?;
        }
        self.end("matrix")
    }

    fn coded_array(&mut self, coding: CodedValueType, payload: &str) -> Result<()> {
        let mut start = BytesStart::new("array");
        start.push_attribute(("code", coding.name().unwrap_or_default()));
        self.text_element(start, payload)
    }

    fn coded_matrix(
        &mut self,
        coding: CodedValueType,
        matrix: &Matrix<f64>,
        payload: &str,
    ) -> Result<()> {
        let rows = matrix.row_count().to_string();
        let columns = matrix.column_count().to_string();
        let mut start = BytesStart::new("matrix");
        start.push_attribute(("code", coding.name().unwrap_or_default()));
        start.push_attribute(("rows", rows.as_str()));
        start.push_attribute(("columns", columns.as_str()));
        self.text_element(start, payload)
    }
}
