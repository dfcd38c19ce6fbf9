//! Attribute classification and checked value extraction

use crate::decoder::{NodeView, decode};
use rexs_database::{Attribute, Component};
use rexs_model::Value;
use rexs_validation::{LoadResult, Severity, ValidityChecker};

/// Prefix that marks an attribute as custom by convention
pub const CUSTOM_PREFIX: &str = "custom_";

/// Shared per-attribute steps of every loader
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelHelper {
    checker: ValidityChecker,
}

impl ModelHelper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether an attribute is custom.
    ///
    /// `custom_` attributes are custom without any diagnostic. An attribute
    /// the database component does not declare is treated as custom too, and
    /// that is reported as an error.
    pub fn check_custom(
        &self,
        result: &mut LoadResult,
        attribute_id: &str,
        component_id: &str,
        component: &Component,
    ) -> bool {
        if attribute_id.starts_with(CUSTOM_PREFIX) {
            return true;
        }
        if component.has_attribute(attribute_id) {
            return false;
        }
        result.add_error(
            format!(
                "attribute id={attribute_id} is not part of component {} id={component_id}",
                component.component_id()
            ),
            Severity::Error,
        );
        true
    }

    /// Decode and check a database attribute value.
    ///
    /// A decode failure is reported and yields an empty value. A decoded value
    /// outside its range or enum set is reported as a warning and kept.
    pub fn get_value<N: NodeView>(
        &self,
        result: &mut LoadResult,
        attribute: &Attribute,
        component_id: &str,
        node: &N,
    ) -> Value {
        let (value, ok) = decode(attribute.value_type(), attribute.enum_values(), node);
        if !ok {
            result.add_error(
                format!(
                    "value of attribute id={} of component id={component_id} does not have the correct value type",
                    attribute.attribute_id()
                ),
                Severity::Error,
            );
            return Value::empty();
        }
        if !self.checker.check(attribute, &value) {
            result.add_warning(format!(
                "value is out of range for attribute id={} of component id={component_id}",
                attribute.attribute_id()
            ));
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::tests::TestNode;
    use rexs_database::{Interval, IntervalEndpoint, Unit, ValueType};
    use rexs_validation::Mode;
    use std::sync::Arc;

    fn gear_shift_index() -> Arc<Attribute> {
        Arc::new(
            Attribute::new(
                "gear_shift_index",
                "Gear shift index",
                ValueType::Integer,
                Unit::new(1, "none"),
                None,
                Some(Interval::new(Some(IntervalEndpoint::closed(0.0)), None)),
                None,
            )
            .unwrap(),
        )
    }

    fn gear_unit() -> Component {
        Component::new("gear_unit", "Gear unit", vec![gear_shift_index()])
    }

    #[test]
    fn test_custom_prefix_is_silent() {
        let mut result = LoadResult::new(Mode::Strict);
        let helper = ModelHelper::new();
        assert!(helper.check_custom(&mut result, "custom_x", "1", &gear_unit()));
        assert!(!result.has_issues());
    }

    #[test]
    fn test_declared_attribute_is_not_custom() {
        let mut result = LoadResult::new(Mode::Strict);
        let helper = ModelHelper::new();
        assert!(!helper.check_custom(&mut result, "gear_shift_index", "1", &gear_unit()));
        assert!(!result.has_issues());
    }

    #[test]
    fn test_undeclared_attribute_reports_once() {
        let mut result = LoadResult::new(Mode::Strict);
        let helper = ModelHelper::new();
        assert!(helper.check_custom(&mut result, "inner_diameter", "42", &gear_unit()));
        assert_eq!(result.issues().len(), 1);
        let message = &result.issues()[0].message;
        assert!(message.contains("inner_diameter"));
        assert!(message.contains("id=42"));
        assert_eq!(result.issues()[0].severity, Severity::Error);
    }

    #[test]
    fn test_undeclared_attribute_relaxed() {
        let mut strict = LoadResult::new(Mode::Strict);
        let mut relaxed = LoadResult::new(Mode::Relaxed);
        let helper = ModelHelper::new();
        helper.check_custom(&mut strict, "inner_diameter", "1", &gear_unit());
        helper.check_custom(&mut relaxed, "inner_diameter", "1", &gear_unit());
        assert!(!strict.is_success());
        assert!(relaxed.is_success());
        assert_eq!(strict.issues()[0].message, relaxed.issues()[0].message);
    }

    #[test]
    fn test_get_value_wrong_type() {
        let mut result = LoadResult::new(Mode::Strict);
        let value = ModelHelper::new().get_value(
            &mut result,
            &gear_shift_index(),
            "1",
            &TestNode::Text("first"),
        );
        assert!(value.is_empty());
        assert!(!result.is_success());
        assert!(
            result.issues()[0]
                .message
                .ends_with("does not have the correct value type")
        );
    }

    #[test]
    fn test_get_value_out_of_range_is_kept() {
        let mut result = LoadResult::new(Mode::Strict);
        let value = ModelHelper::new().get_value(
            &mut result,
            &gear_shift_index(),
            "1",
            &TestNode::Text("-3"),
        );
        assert_eq!(value.as_integer().unwrap(), -3);
        assert!(result.is_success());
        assert_eq!(result.warnings().count(), 1);
        assert_eq!(
            result.issues()[0].message,
            "value is out of range for attribute id=gear_shift_index of component id=1"
        );
    }
}
