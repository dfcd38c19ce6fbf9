//! Range and enum validity of decoded values

use rexs_database::{Attribute, ValueType};
use rexs_model::{Value, ValueData};

/// Checks decoded values against their database attribute.
///
/// Numeric values must lie in the attribute's interval, element-wise for
/// arrays, matrices and arrays of arrays. Enum values must be members of the
/// enum value set. Every other value passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidityChecker;

impl ValidityChecker {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn check(&self, attribute: &Attribute, value: &Value) -> bool {
        let Some(data) = value.data() else {
            return true;
        };
        match attribute.value_type() {
            ValueType::Enum => match (attribute.enum_values(), data) {
                (Some(enums), ValueData::String(s)) => enums.check(s),
                _ => true,
            },
            ValueType::EnumArray => match (attribute.enum_values(), data) {
                (Some(enums), ValueData::StringArray(values)) => {
                    values.iter().all(|v| enums.check(v))
                }
                _ => true,
            },
            _ => Self::check_range(attribute, data),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn check_range(attribute: &Attribute, data: &ValueData) -> bool {
        let Some(interval) = attribute.interval() else {
            return true;
        };
        let within = |v: f64| interval.check(v);
        match data {
            ValueData::FloatingPoint(v) => within(*v),
            ValueData::Integer(v) => within(*v as f64),
            ValueData::FloatingPointArray(values) => values.iter().all(|v| within(*v)),
            ValueData::IntegerArray(values) => values.iter().all(|v| within(*v as f64)),
            ValueData::FloatingPointMatrix(matrix) => matrix.iter().all(|v| within(*v)),
            ValueData::ArrayOfIntegerArrays(arrays) => {
                arrays.iter().flatten().all(|v| within(*v as f64))
            }
            _ => true,
        }
    }
}
