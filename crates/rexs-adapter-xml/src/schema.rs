//! Structural checks for REXS XML documents

use crate::dom::Element;
use rexs_validation::StructuralValidator;

/// Checks element nesting and required attributes of a `<model>` document
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlStructureValidator;

impl XmlStructureValidator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl StructuralValidator<Element> for XmlStructureValidator {
    fn validate(&self, document: &Element, errors: &mut Vec<String>) -> bool {
        let before = errors.len();
        Checker {
            errors: &mut *errors,
        }
        .model(document);
        errors.len() == before
    }
}

struct Checker<'e> {
    errors: &'e mut Vec<String>,
}

impl Checker<'_> {
    fn model(&mut self, model: &Element) {
        if model.name != "model" {
            self.errors
                .push(format!("root element must be 'model', found '{}'", model.name));
            return;
        }
        self.require(
            model,
            &["applicationId", "applicationVersion", "date", "version"],
        );
        self.allow(model, &["relations", "components", "load_spectrum"]);
        for required in ["relations", "components"] {
            self.exactly_one(model, required);
        }
        if model.children_named("load_spectrum").count() > 1 {
            self.errors
                .push("element 'model' allows at most one 'load_spectrum'".to_string());
        }

        for relations in model.children_named("relations") {
            self.allow(relations, &["relation"]);
            for relation in relations.children_named("relation") {
                self.relation(relation);
            }
        }
        for components in model.children_named("components") {
            self.allow(components, &["component"]);
            for component in components.children_named("component") {
                self.require(component, &["id", "type"]);
                self.attributes(component);
            }
        }
        for spectrum in model.children_named("load_spectrum") {
            self.load_spectrum(spectrum);
        }
    }

    fn relation(&mut self, relation: &Element) {
        self.require(relation, &["type"]);
        if let Some(order) = relation.attribute("order") {
            if order.trim().parse::<u32>().is_err() {
                self.errors.push(format!(
                    "attribute 'order' of element 'relation' must be a non-negative integer, found '{order}'"
                ));
            }
        }
        self.allow(relation, &["ref"]);
        for reference in relation.children_named("ref") {
            self.require(reference, &["id", "role"]);
            self.allow(reference, &[]);
        }
    }

    fn load_spectrum(&mut self, spectrum: &Element) {
        self.allow(spectrum, &["load_case", "accumulation"]);
        if spectrum.children_named("accumulation").count() > 1 {
            self.errors
                .push("element 'load_spectrum' allows at most one 'accumulation'".to_string());
        }
        for case in spectrum.children_named("load_case") {
            self.require(case, &["id"]);
            self.load_components(case);
        }
        for accumulation in spectrum.children_named("accumulation") {
            self.load_components(accumulation);
        }
    }

    fn load_components(&mut self, parent: &Element) {
        self.allow(parent, &["component"]);
        for component in parent.children_named("component") {
            self.require(component, &["id"]);
            self.attributes(component);
        }
    }

    fn attributes(&mut self, component: &Element) {
        self.allow(component, &["attribute"]);
        for attribute in component.children_named("attribute") {
            self.require(attribute, &["id"]);
            self.attribute_content(attribute);
        }
    }

    fn attribute_content(&mut self, attribute: &Element) {
        self.allow(attribute, &["array", "matrix", "array_of_arrays"]);
        if attribute.children.len() > 1 {
            self.errors.push(format!(
                "attribute '{}' has more than one value element",
                attribute.attribute("id").unwrap_or("?")
            ));
        }
        for child in &attribute.children {
            match child.name.as_str() {
                "array" => self.cells(child),
                "matrix" => {
                    if child.attribute("code").is_some() {
                        self.require(child, &["rows", "columns"]);
                    }
                    self.allow(child, &["r"]);
                    for row in child.children_named("r") {
                        self.cells(row);
                    }
                }
                "array_of_arrays" => {
                    self.allow(child, &["array"]);
                    for array in child.children_named("array") {
                        self.cells(array);
                    }
                }
                _ => {}
            }
        }
    }

    fn cells(&mut self, parent: &Element) {
        self.allow(parent, &["c"]);
        for cell in parent.children_named("c") {
            self.allow(cell, &[]);
        }
    }

    fn require(&mut self, element: &Element, attributes: &[&str]) {
        for name in attributes {
            if element.attribute(name).is_none() {
                self.errors.push(format!(
                    "element '{}' is missing required attribute '{name}'",
                    element.name
                ));
            }
        }
    }

    fn allow(&mut self, element: &Element, children: &[&str]) {
        for child in &element.children {
            if !children.contains(&child.name.as_str()) {
                self.errors.push(format!(
                    "element '{}' is not allowed in '{}'",
                    child.name, element.name
                ));
            }
        }
    }

    fn exactly_one(&mut self, element: &Element, name: &str) {
        let count = element.children_named(name).count();
        if count != 1 {
            self.errors.push(format!(
                "element '{}' requires exactly one '{name}' element, found {count}",
                element.name
            ));
        }
    }
}
