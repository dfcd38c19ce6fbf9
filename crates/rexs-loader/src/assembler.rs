//! Model assembly from format-neutral records
//!
//! Runs the loader stages after parsing and structural validation: database
//! lookup, component and attribute decoding, reference resolution, relations
//! and load spectrum, and the unused component check.

use crate::document::{AttributeSource, RawLoadComponent, RawModel};
use crate::helper::ModelHelper;
use crate::mapping::ComponentMapping;
use crate::serializer::LoadOutcome;
use crate::Result;
use rexs_database::{DatabaseModel, ModelRegistry, RexsVersion};
use rexs_model::{
    Accumulation, Attribute, Component, LoadCase, LoadComponent, LoadSpectrum, Model, ModelInfo,
    Relation, RelationReference, RelationRole, RelationType,
};
use rexs_validation::{LoadResult, Severity};
use std::sync::Arc;
use tracing::debug;

/// Assemble a model from a structurally valid document.
///
/// `language` selects the database model together with the header version.
///
/// # Errors
///
/// Returns [`Error::Database`](crate::Error::Database) when the registry has
/// no model for the version and language. Every other problem is recorded in
/// the returned [`LoadResult`].
pub fn assemble<A: AttributeSource>(
    raw: &RawModel<A>,
    registry: &ModelRegistry,
    language: &str,
    mut result: LoadResult,
) -> Result<LoadOutcome> {
    let version = match raw.info.version.parse::<RexsVersion>() {
        Ok(version) => version,
        Err(e) => {
            result.add_error(format!("invalid model header: {e}"), Severity::Critical);
            return Ok((None, result));
        }
    };
    let database = registry.get_model(version, language)?;
    debug!(%version, language, "resolved database model");

    let mut assembler = Assembler {
        database,
        helper: ModelHelper::new(),
        mapping: ComponentMapping::new(),
        result,
    };
    let model = assembler.build(raw, version);
    Ok((Some(model), assembler.result))
}

struct PendingComponent {
    external_id: String,
    internal_id: u64,
    component_type: String,
    name: String,
    attributes: Vec<Attribute>,
}

struct Assembler<'a> {
    database: &'a Arc<DatabaseModel>,
    helper: ModelHelper,
    mapping: ComponentMapping,
    result: LoadResult,
}

impl<'a> Assembler<'a> {
    fn build<A: AttributeSource>(&mut self, raw: &RawModel<A>, version: RexsVersion) -> Model {
        let database: &'a DatabaseModel = self.database;

        let mut pending = Vec::with_capacity(raw.components.len());
        for component in &raw.components {
            let Some(definition) = database.find_component(&component.component_type) else {
                self.result.add_error(
                    format!(
                        "component id={} has unknown type '{}'",
                        component.id, component.component_type
                    ),
                    Severity::Error,
                );
                continue;
            };
            let attributes = self.attributes(&component.attributes, &component.id, definition);
            pending.push(PendingComponent {
                external_id: component.id.clone(),
                internal_id: self.mapping.add(&component.id),
                component_type: component.component_type.clone(),
                name: component.name.clone(),
                attributes,
            });
        }
        debug!(components = pending.len(), "decoded components");

        let components: Vec<Component> = pending
            .into_iter()
            .map(|p| {
                let attributes = self.resolve_references(p.attributes, &p.external_id);
                Component::new(p.internal_id, p.component_type, p.name, attributes)
            })
            .collect();

        let relations = self.relations(raw, &components);
        debug!(relations = relations.len(), "resolved relations");

        let spectrum = match &raw.load_spectrum {
            Some(spectrum) => {
                let load_cases = spectrum
                    .load_cases
                    .iter()
                    .map(|case| {
                        let scope = format!("load case id={}", case.id);
                        LoadCase::new(self.load_components(&case.components, &scope, &components))
                    })
                    .collect();
                let accumulation = spectrum.accumulation.as_ref().map(|raw| {
                    Accumulation::new(self.load_components(raw, "accumulation", &components))
                });
                LoadSpectrum::new(load_cases, accumulation)
            }
            None => LoadSpectrum::default(),
        };

        let info = ModelInfo::new(
            raw.info.application_id.clone(),
            raw.info.application_version.clone(),
            raw.info.date.clone(),
            version,
            raw.info.language.clone(),
        );
        let model = Model::new(info, components, relations, spectrum);

        let unused = model.unused_components().count();
        if unused > 0 {
            self.result
                .add_warning(format!("{unused} components are not used in a relation"));
        }
        model
    }

    fn attributes<A: AttributeSource>(
        &mut self,
        sources: &[A],
        component_id: &str,
        definition: &rexs_database::Component,
    ) -> Vec<Attribute> {
        sources
            .iter()
            .filter_map(|source| self.attribute(source, component_id, definition))
            .collect()
    }

    fn attribute<A: AttributeSource>(
        &mut self,
        source: &A,
        component_id: &str,
        definition: &rexs_database::Component,
    ) -> Option<Attribute> {
        let id = source.id();
        if self
            .helper
            .check_custom(&mut self.result, id, component_id, definition)
        {
            let Some((value_type, value)) = source.decode_custom() else {
                self.result.add_error(
                    format!("custom attribute id={id} of component id={component_id} has no value"),
                    Severity::Error,
                );
                return None;
            };
            return Some(Attribute::custom(
                id,
                source.unit().unwrap_or("none"),
                value_type,
                value,
            ));
        }

        let attribute = definition.find_attribute(id)?;
        let Some(node) = source.value_node(attribute.value_type()) else {
            self.result.add_error(
                format!("attribute id={id} of component id={component_id} has no value"),
                Severity::Error,
            );
            return None;
        };
        let value = self
            .helper
            .get_value(&mut self.result, attribute, component_id, &node);
        if value.is_empty() {
            return None;
        }
        match Attribute::new(Arc::clone(attribute), source.unit(), value) {
            Ok(attribute) => Some(attribute),
            Err(e) => {
                self.result
                    .add_error(format!("{e} in component id={component_id}"), Severity::Error);
                None
            }
        }
    }

    /// Rewrite component references from document ids to internal ids
    fn resolve_references(&mut self, attributes: Vec<Attribute>, component_id: &str) -> Vec<Attribute> {
        let mut resolved = Vec::with_capacity(attributes.len());
        for mut attribute in attributes {
            let Ok(target) = attribute.value().as_reference() else {
                resolved.push(attribute);
                continue;
            };
            let internal = self
                .mapping
                .internal_id(&target.to_string())
                .and_then(|id| i64::try_from(id).ok());
            match internal {
                Some(internal) if attribute.retarget_reference(internal).is_ok() => {
                    resolved.push(attribute);
                }
                _ => self.result.add_error(
                    format!(
                        "attribute id={} of component id={component_id} references missing component id={target}",
                        attribute.attribute_id()
                    ),
                    Severity::Error,
                ),
            }
        }
        resolved
    }

    fn relations<A>(&mut self, raw: &RawModel<A>, components: &[Component]) -> Vec<Relation> {
        let mut relations = Vec::with_capacity(raw.relations.len());
        for relation in &raw.relations {
            let relation_type = match relation.relation_type.parse::<RelationType>() {
                Ok(relation_type) => relation_type,
                Err(e) => {
                    self.result
                        .add_error(format!("{e} in relation id={}", relation.label()), Severity::Error);
                    continue;
                }
            };
            let mut references = Vec::with_capacity(relation.references.len());
            for reference in &relation.references {
                let role = match reference.role.parse::<RelationRole>() {
                    Ok(role) => role,
                    Err(e) => {
                        self.result.add_error(
                            format!("{e} in relation id={}", relation.label()),
                            Severity::Error,
                        );
                        continue;
                    }
                };
                let Some(component) = self.mapping.get_component(&reference.id, components) else {
                    self.result.add_error(
                        format!(
                            "component id={} referenced by relation id={} does not exist",
                            reference.id,
                            relation.label()
                        ),
                        Severity::Error,
                    );
                    continue;
                };
                references.push(RelationReference::new(
                    role,
                    reference.hint.clone(),
                    component.internal_id(),
                ));
            }
            relations.push(Relation::new(relation_type, relation.order, references));
        }
        relations
    }

    fn load_components<A: AttributeSource>(
        &mut self,
        raw: &[RawLoadComponent<A>],
        scope: &str,
        components: &[Component],
    ) -> Vec<LoadComponent> {
        let database: &'a DatabaseModel = self.database;
        let mut loads = Vec::with_capacity(raw.len());
        for load in raw {
            let Some(base) = self.mapping.get_component(&load.id, components) else {
                self.result.add_error(
                    format!("component id={} of {scope} does not exist", load.id),
                    Severity::Error,
                );
                continue;
            };
            let Some(definition) = database.find_component(base.component_type()) else {
                continue;
            };
            let context = format!("{} in {scope}", load.id);
            let attributes = self.attributes(&load.attributes, &context, definition);
            let attributes = self.resolve_references(attributes, &context);
            loads.push(LoadComponent::new(base.internal_id(), attributes));
        }
        loads
    }
}
