//! End-to-end assembly over a minimal in-memory document format

use rexs_database::{ModelRegistry, ValueType};
use rexs_loader::{
    AttributeSource, CodedPayload, NodeView, RawComponent, RawInfo, RawLoadCase,
    RawLoadComponent, RawLoadSpectrum, RawModel, RawReference, RawRelation, assemble,
};
use rexs_model::Value;
use rexs_validation::{LoadResult, Mode, Severity};
use std::path::PathBuf;

/// A node holding scalar text only
#[derive(Debug, Clone)]
struct TextNode(String);

impl NodeView for TextNode {
    fn boolean(&self) -> Option<bool> {
        self.0.parse().ok()
    }

    fn integer(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    fn floating_point(&self) -> Option<f64> {
        self.0.parse().ok()
    }

    fn text(&self) -> Option<String> {
        Some(self.0.clone())
    }

    fn coded(&self) -> Option<CodedPayload> {
        None
    }

    fn array(&self) -> Option<Vec<Self>> {
        None
    }

    fn matrix(&self) -> Option<Vec<Vec<Self>>> {
        None
    }

    fn array_of_arrays(&self) -> Option<Vec<Vec<Self>>> {
        None
    }
}

#[derive(Debug, Clone)]
struct TextAttribute {
    id: &'static str,
    unit: Option<&'static str>,
    value: &'static str,
}

impl AttributeSource for TextAttribute {
    type Node = TextNode;

    fn id(&self) -> &str {
        self.id
    }

    fn unit(&self) -> Option<&str> {
        self.unit
    }

    fn value_node(&self, _value_type: ValueType) -> Option<TextNode> {
        Some(TextNode(self.value.to_string()))
    }

    fn decode_custom(&self) -> Option<(ValueType, Value)> {
        Some((ValueType::String, Value::from(self.value)))
    }
}

fn attribute(id: &'static str, unit: Option<&'static str>, value: &'static str) -> TextAttribute {
    TextAttribute { id, unit, value }
}

fn registry() -> ModelRegistry {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../testdata/database");
    ModelRegistry::from_directory(path).expect("test database loads")
}

fn info(version: &str) -> RawInfo {
    RawInfo {
        application_id: "Test".to_string(),
        application_version: "1.0".to_string(),
        date: "2023-01-01".to_string(),
        version: version.to_string(),
        language: None,
    }
}

fn component(
    id: &str,
    component_type: &str,
    attributes: Vec<TextAttribute>,
) -> RawComponent<TextAttribute> {
    RawComponent {
        id: id.to_string(),
        component_type: component_type.to_string(),
        name: component_type.to_string(),
        attributes,
    }
}

fn reference(id: &str, role: &str) -> RawReference {
    RawReference {
        id: id.to_string(),
        role: role.to_string(),
        hint: None,
    }
}

fn relation(id: &str, relation_type: &str, references: Vec<RawReference>) -> RawRelation {
    RawRelation {
        id: Some(id.to_string()),
        relation_type: relation_type.to_string(),
        order: None,
        references,
    }
}

#[test]
fn test_single_component_model() -> anyhow::Result<()> {
    let raw = RawModel {
        info: info("1.4"),
        components: vec![component(
            "1",
            "gear_unit",
            vec![attribute("gear_shift_index", None, "7")],
        )],
        relations: vec![],
        load_spectrum: None,
    };
    let (model, result) = assemble(&raw, &registry(), "en", LoadResult::new(Mode::Strict))?;
    let model = model.expect("model is built");

    assert_eq!(model.components().len(), 1);
    let attributes = model.components()[0].attributes();
    assert_eq!(attributes.len(), 1);
    assert_eq!(attributes[0].value().as_integer()?, 7);
    assert!(result.is_success());
    Ok(())
}

#[test]
fn test_unused_components_warning() -> anyhow::Result<()> {
    let raw = RawModel {
        info: info("1.4"),
        components: vec![
            component("1", "gear_unit", vec![]),
            component("2", "gear_casing", vec![]),
            component("3", "shaft", vec![]),
            component("4", "shaft", vec![]),
        ],
        relations: vec![relation(
            "10",
            "assembly",
            vec![reference("1", "assembly"), reference("2", "part")],
        )],
        load_spectrum: None,
    };
    let (model, result) = assemble(&raw, &registry(), "en", LoadResult::new(Mode::Strict))?;
    assert!(model.is_some());

    let unused: Vec<_> = result
        .warnings()
        .filter(|w| w.message.contains("not used in a relation"))
        .collect();
    assert_eq!(unused.len(), 1);
    assert_eq!(unused[0].message, "2 components are not used in a relation");
    assert!(result.is_success());
    Ok(())
}

#[test]
fn test_unknown_component_type_is_skipped() -> anyhow::Result<()> {
    let raw = RawModel {
        info: info("1.4"),
        components: vec![
            component("1", "gear_unit", vec![]),
            component("2", "flux_capacitor", vec![]),
        ],
        relations: vec![relation(
            "10",
            "assembly",
            vec![reference("1", "assembly"), reference("2", "part")],
        )],
        load_spectrum: None,
    };
    let (model, result) = assemble(&raw, &registry(), "en", LoadResult::new(Mode::Strict))?;
    let model = model.expect("model is built");

    assert_eq!(model.components().len(), 1);
    // the reference to the skipped component is dropped, its sibling kept
    assert_eq!(model.relations()[0].references().len(), 1);
    assert!(!result.is_success());
    assert!(
        result
            .errors()
            .any(|e| e.message == "component id=2 has unknown type 'flux_capacitor'")
    );
    assert!(
        result
            .errors()
            .any(|e| e.message == "component id=2 referenced by relation id=10 does not exist")
    );
    Ok(())
}

#[test]
fn test_reference_component_resolved_to_internal_id() -> anyhow::Result<()> {
    let raw = RawModel {
        info: info("1.4"),
        components: vec![
            component("100", "gear_unit", vec![]),
            component(
                "200",
                "shaft",
                vec![attribute("reference_component_for_position", None, "100")],
            ),
            component(
                "300",
                "shaft",
                vec![attribute("reference_component_for_position", None, "999")],
            ),
        ],
        relations: vec![relation(
            "10",
            "assembly",
            vec![
                reference("100", "assembly"),
                reference("200", "part"),
                reference("300", "part"),
            ],
        )],
        load_spectrum: None,
    };
    let (model, result) = assemble(&raw, &registry(), "en", LoadResult::new(Mode::Strict))?;
    let model = model.expect("model is built");

    let shaft = model.find_component(2).expect("second component");
    assert_eq!(
        shaft
            .attribute_value("reference_component_for_position")
            .unwrap()
            .as_reference()?,
        1
    );
    let broken = model.find_component(3).expect("third component");
    assert!(!broken.has_attribute("reference_component_for_position"));
    assert_eq!(result.errors().count(), 1);
    Ok(())
}

#[test]
fn test_attribute_diagnostics_strict_and_relaxed() -> anyhow::Result<()> {
    let raw = RawModel {
        info: info("1.4"),
        components: vec![component(
            "1",
            "gear_casing",
            vec![
                attribute("mass_of_component", Some("kg"), "-5"),
                attribute("reference_temperature", Some("K"), "20"),
                attribute("description", None, "cast iron"),
                attribute("gear_shift_index", None, "2"),
                attribute("custom_supplier", Some("none"), "ACME"),
            ],
        )],
        relations: vec![],
        load_spectrum: None,
    };

    let (strict_model, strict) = assemble(&raw, &registry(), "en", LoadResult::new(Mode::Strict))?;
    let (_, relaxed) = assemble(&raw, &registry(), "en", LoadResult::new(Mode::Relaxed))?;

    let strict_model = strict_model.expect("model is built");

    let casing = &strict_model.components()[0];
    // out of range is kept
    assert_eq!(casing.attribute_value("mass_of_component").unwrap().as_floating_point()?, -5.0);
    // unit mismatch is dropped
    assert!(!casing.has_attribute("reference_temperature"));
    // undeclared attribute is kept as custom
    assert!(casing.find_attribute("gear_shift_index").unwrap().is_custom());
    assert!(casing.find_attribute("custom_supplier").unwrap().is_custom());

    assert!(!strict.is_success());
    assert!(relaxed.is_success());
    let messages = |r: &LoadResult| r.issues().iter().map(|i| i.message.clone()).collect::<Vec<_>>();
    assert_eq!(messages(&strict), messages(&relaxed));
    assert_eq!(strict.with_severity(Severity::Error).count(), 2);
    assert_eq!(relaxed.with_severity(Severity::Error).count(), 0);
    Ok(())
}

#[test]
fn test_load_spectrum() -> anyhow::Result<()> {
    let load = |id: &str, value: &'static str| RawLoadComponent {
        id: id.to_string(),
        attributes: vec![attribute("reference_temperature", Some("C"), value)],
    };
    let raw = RawModel {
        info: info("1.4"),
        components: vec![component("1", "gear_unit", vec![])],
        relations: vec![],
        load_spectrum: Some(RawLoadSpectrum {
            id: Some("1".to_string()),
            load_cases: vec![
                RawLoadCase {
                    id: "1".to_string(),
                    components: vec![load("1", "20")],
                },
                RawLoadCase {
                    id: "2".to_string(),
                    components: vec![load("1", "80"), load("9", "80")],
                },
            ],
            accumulation: Some(vec![load("1", "50")]),
        }),
    };
    let (model, result) = assemble(&raw, &registry(), "en", LoadResult::new(Mode::Strict))?;
    let model = model.expect("model is built");
    let spectrum = model.spectrum();

    assert_eq!(spectrum.load_cases().len(), 2);
    let second = &spectrum.load_cases()[1];
    assert_eq!(second.components().len(), 1);
    assert_eq!(
        second.components()[0]
            .find_attribute("reference_temperature")
            .unwrap()
            .value()
            .as_floating_point()?,
        80.0
    );
    assert_eq!(spectrum.accumulation().unwrap().components().len(), 1);
    assert!(
        result
            .errors()
            .any(|e| e.message == "component id=9 of load case id=2 does not exist")
    );
    Ok(())
}

#[test]
fn test_registry_miss_is_fatal() {
    let raw: RawModel<TextAttribute> = RawModel {
        info: info("9.9"),
        components: vec![],
        relations: vec![],
        load_spectrum: None,
    };
    assert!(assemble(&raw, &registry(), "en", LoadResult::new(Mode::Strict)).is_err());
    assert!(assemble(&raw, &registry(), "fr", LoadResult::new(Mode::Relaxed)).is_err());
}

#[test]
fn test_invalid_version_is_critical() -> anyhow::Result<()> {
    let raw: RawModel<TextAttribute> = RawModel {
        info: info("one"),
        components: vec![],
        relations: vec![],
        load_spectrum: None,
    };
    let (model, result) = assemble(&raw, &registry(), "en", LoadResult::new(Mode::Relaxed))?;
    assert!(model.is_none());
    assert!(result.is_critical());
    Ok(())
}
