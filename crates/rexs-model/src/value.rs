//! Typed attribute values

use crate::coded::CodedValueType;
use crate::{Error, Result};
use rexs_database::ValueType;

/// A two dimensional, row-major matrix
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix<T> {
    rows: Vec<Vec<T>>,
}

impl<T> Matrix<T> {
    #[must_use]
    pub fn new(rows: Vec<Vec<T>>) -> Self {
        Self { rows }
    }

    /// Rebuild a matrix from a flat row-major sequence.
    ///
    /// Returns `None` when the element count is not `rows * columns`.
    #[must_use]
    pub fn from_flat(values: Vec<T>, rows: usize, columns: usize) -> Option<Self> {
        if values.len() != rows.checked_mul(columns)? {
            return None;
        }
        let mut iter = values.into_iter();
        let rows = (0..rows)
            .map(|_| iter.by_ref().take(columns).collect())
            .collect();
        Some(Self { rows })
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<T>] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column count of the first row, zero for an empty matrix
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Whether all rows have the same length
    #[must_use]
    pub fn is_rectangular(&self) -> bool {
        let columns = self.column_count();
        self.rows.iter().all(|r| r.len() == columns)
    }

    /// Iterate every element in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.iter().flatten()
    }
}

/// The shapes a non-empty value can take
#[derive(Debug, Clone, PartialEq)]
pub enum ValueData {
    Boolean(bool),
    Integer(i64),
    FloatingPoint(f64),
    String(String),
    BooleanArray(Vec<bool>),
    IntegerArray(Vec<i64>),
    FloatingPointArray(Vec<f64>),
    StringArray(Vec<String>),
    FloatingPointMatrix(Matrix<f64>),
    StringMatrix(Matrix<String>),
    ArrayOfIntegerArrays(Vec<Vec<i64>>),
    ReferenceComponent(i64),
}

impl ValueData {
    /// Name of the stored shape
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ValueData::Boolean(_) => "boolean",
            ValueData::Integer(_) => "integer",
            ValueData::FloatingPoint(_) => "floating_point",
            ValueData::String(_) => "string",
            ValueData::BooleanArray(_) => "boolean_array",
            ValueData::IntegerArray(_) => "integer_array",
            ValueData::FloatingPointArray(_) => "floating_point_array",
            ValueData::StringArray(_) => "string_array",
            ValueData::FloatingPointMatrix(_) => "floating_point_matrix",
            ValueData::StringMatrix(_) => "string_matrix",
            ValueData::ArrayOfIntegerArrays(_) => "array_of_integer_arrays",
            ValueData::ReferenceComponent(_) => "reference_component",
        }
    }
}

/// An attribute value.
///
/// A value is either empty or holds exactly one [`ValueData`] shape. The
/// coding tag only records how array and matrix payloads are written on the
/// wire; it takes no part in equality.
#[derive(Debug, Clone, Default)]
pub struct Value {
    data: Option<ValueData>,
    coded: CodedValueType,
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

macro_rules! accessor {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $ret:ty, $expected:literal, |$v:ident| $body:expr) => {
        $(#[$doc])*
        ///
        /// # Errors
        ///
        /// Returns [`Error::TypeMismatch`] when the value holds another shape or is empty.
        pub fn $name(&self) -> Result<$ret> {
            match &self.data {
                Some(ValueData::$variant($v)) => Ok($body),
                _ => Err(Error::type_mismatch($expected, self.kind())),
            }
        }
    };
}

impl Value {
    /// The distinguished empty value
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new(data: ValueData) -> Self {
        Self {
            data: Some(data),
            coded: CodedValueType::None,
        }
    }

    /// Reference to another component by id
    #[must_use]
    pub fn reference(id: i64) -> Self {
        Self::new(ValueData::ReferenceComponent(id))
    }

    /// Tag the value for coded serialization
    #[must_use]
    pub fn with_coding(mut self, coded: CodedValueType) -> Self {
        self.coded = coded;
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_none()
    }

    #[must_use]
    pub fn data(&self) -> Option<&ValueData> {
        self.data.as_ref()
    }

    #[must_use]
    pub fn into_data(self) -> Option<ValueData> {
        self.data
    }

    #[must_use]
    pub fn coded(&self) -> CodedValueType {
        self.coded
    }

    /// Name of the stored shape, `"empty"` for an empty value
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.data.as_ref().map_or("empty", ValueData::kind)
    }

    /// Check whether this value can back an attribute of `value_type`.
    ///
    /// Empty values fit every type. Enum and file reference values are
    /// strings, enum arrays are string arrays.
    #[must_use]
    pub fn fits(&self, value_type: ValueType) -> bool {
        let Some(data) = &self.data else {
            return true;
        };
        matches!(
            (value_type, data),
            (ValueType::FloatingPoint, ValueData::FloatingPoint(_))
                | (ValueType::Boolean, ValueData::Boolean(_))
                | (ValueType::Integer, ValueData::Integer(_))
                | (
                    ValueType::Enum | ValueType::String | ValueType::FileReference,
                    ValueData::String(_)
                )
                | (ValueType::FloatingPointArray, ValueData::FloatingPointArray(_))
                | (ValueType::BooleanArray, ValueData::BooleanArray(_))
                | (ValueType::IntegerArray, ValueData::IntegerArray(_))
                | (
                    ValueType::StringArray | ValueType::EnumArray,
                    ValueData::StringArray(_)
                )
                | (ValueType::ReferenceComponent, ValueData::ReferenceComponent(_))
                | (ValueType::FloatingPointMatrix, ValueData::FloatingPointMatrix(_))
                | (ValueType::StringMatrix, ValueData::StringMatrix(_))
                | (ValueType::ArrayOfIntegerArrays, ValueData::ArrayOfIntegerArrays(_))
        )
    }

    accessor!(as_boolean, Boolean, bool, "boolean", |v| *v);
    accessor!(as_integer, Integer, i64, "integer", |v| *v);
    accessor!(as_floating_point, FloatingPoint, f64, "floating_point", |v| *v);
    accessor!(
        /// String, enum and file reference values
        as_str, String, &str, "string", |v| v.as_str()
    );
    accessor!(as_boolean_array, BooleanArray, &[bool], "boolean_array", |v| v.as_slice());
    accessor!(as_integer_array, IntegerArray, &[i64], "integer_array", |v| v.as_slice());
    accessor!(
        as_floating_point_array,
        FloatingPointArray,
        &[f64],
        "floating_point_array",
        |v| v.as_slice()
    );
    accessor!(
        /// String and enum arrays
        as_string_array, StringArray, &[String], "string_array", |v| v.as_slice()
    );
    accessor!(
        as_floating_point_matrix,
        FloatingPointMatrix,
        &Matrix<f64>,
        "floating_point_matrix",
        |v| v
    );
    accessor!(as_string_matrix, StringMatrix, &Matrix<String>, "string_matrix", |v| v);
    accessor!(
        as_array_of_integer_arrays,
        ArrayOfIntegerArrays,
        &[Vec<i64>],
        "array_of_integer_arrays",
        |v| v.as_slice()
    );
    accessor!(
        /// Referenced component id
        as_reference, ReferenceComponent, i64, "reference_component", |v| *v
    );
}

macro_rules! from_value {
    ($t:ty, $variant:ident) => {
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::new(ValueData::$variant(v))
            }
        }
    };
}

from_value!(bool, Boolean);
from_value!(i64, Integer);
from_value!(f64, FloatingPoint);
from_value!(String, String);
from_value!(Vec<bool>, BooleanArray);
from_value!(Vec<i64>, IntegerArray);
from_value!(Vec<f64>, FloatingPointArray);
from_value!(Vec<String>, StringArray);
from_value!(Matrix<f64>, FloatingPointMatrix);
from_value!(Matrix<String>, StringMatrix);
from_value!(Vec<Vec<i64>>, ArrayOfIntegerArrays);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::new(ValueData::String(v.to_string()))
    }
}

impl From<ValueData> for Value {
    fn from(data: ValueData) -> Self {
        Value::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value() {
        let value = Value::empty();
        assert!(value.is_empty());
        assert_eq!(value.kind(), "empty");
        assert!(value.data().is_none());
        assert!(matches!(
            value.as_integer(),
            Err(Error::TypeMismatch { found, .. }) if found == "empty"
        ));
    }

    #[test]
    fn test_accessor_matches_variant() {
        assert!(Value::from(true).as_boolean().unwrap());
        assert_eq!(Value::from(42_i64).as_integer().unwrap(), 42);
        assert_eq!(Value::from(1.5).as_floating_point().unwrap(), 1.5);
        assert_eq!(Value::from("abc").as_str().unwrap(), "abc");
        assert_eq!(Value::reference(7).as_reference().unwrap(), 7);
        assert_eq!(
            Value::from(vec![vec![1_i64], vec![2, 3]])
                .as_array_of_integer_arrays()
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn test_accessor_type_mismatch() {
        let value = Value::from(42_i64);
        let err = value.as_floating_point().unwrap_err();
        assert_eq!(err, Error::type_mismatch("floating_point", "integer"));
        assert!(value.as_reference().is_err());
        assert!(Value::reference(1).as_integer().is_err());
    }

    #[test]
    fn test_coding_does_not_affect_equality() {
        let plain = Value::from(vec![1.0, 2.0]);
        let coded = Value::from(vec![1.0, 2.0]).with_coding(CodedValueType::Float64);
        assert_eq!(plain, coded);
        assert_eq!(coded.coded(), CodedValueType::Float64);
        assert_eq!(plain.coded(), CodedValueType::None);
    }

    #[test]
    fn test_value_fits_type() {
        assert!(Value::from("left").fits(ValueType::Enum));
        assert!(Value::from("a.stp").fits(ValueType::FileReference));
        assert!(Value::from(vec!["a".to_string()]).fits(ValueType::EnumArray));
        assert!(Value::empty().fits(ValueType::FloatingPointMatrix));
        assert!(!Value::from(1_i64).fits(ValueType::FloatingPoint));
        assert!(!Value::from(1_i64).fits(ValueType::ReferenceComponent));
    }

    #[test]
    fn test_matrix_from_flat() {
        let matrix = Matrix::from_flat(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
        assert_eq!(matrix.row_count(), 2);
        assert_eq!(matrix.column_count(), 3);
        assert_eq!(matrix.rows()[1], vec![4.0, 5.0, 6.0]);
        assert!(matrix.is_rectangular());
        assert!(Matrix::from_flat(vec![1.0, 2.0, 3.0], 2, 2).is_none());
    }

    #[test]
    fn test_ragged_matrix() {
        let matrix = Matrix::new(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(!matrix.is_rectangular());
        assert_eq!(matrix.iter().count(), 3);
    }
}
