//! Format-agnostic typed value decoding
//!
//! Each wire format exposes its value nodes through [`NodeView`]. The single
//! [`decode`] routine turns such a node into a [`Value`] for a database value
//! type, reporting whether the content matched that type.

use rexs_database::{EnumValues, ValueType};
use rexs_model::coded::{self, CodedValueType};
use rexs_model::{Matrix, Value};

/// A base64 packed array or matrix as found on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodedPayload {
    pub code: String,
    pub value: String,
    pub rows: Option<usize>,
    pub columns: Option<usize>,
}

/// Read access to one value node of a parsed document.
///
/// Every method returns `None` when the node does not have the requested
/// shape or its content does not parse.
pub trait NodeView: Sized {
    fn boolean(&self) -> Option<bool>;

    fn integer(&self) -> Option<i64>;

    fn floating_point(&self) -> Option<f64>;

    fn text(&self) -> Option<String>;

    /// Coded payload, `None` when the node holds explicit elements
    fn coded(&self) -> Option<CodedPayload>;

    /// Elements of an array node
    fn array(&self) -> Option<Vec<Self>>;

    /// Rows of a matrix node
    fn matrix(&self) -> Option<Vec<Vec<Self>>>;

    /// Inner arrays of an array of arrays node
    fn array_of_arrays(&self) -> Option<Vec<Vec<Self>>>;
}

/// Decode `node` as a value of `value_type`.
///
/// The flag is `false` when the node is present but its content does not
/// satisfy the type or the enum constraint. Arrays and matrices keep every
/// element that decoded even when one of them failed.
pub fn decode<N: NodeView>(
    value_type: ValueType,
    enums: Option<&EnumValues>,
    node: &N,
) -> (Value, bool) {
    let member = |s: &str| enums.is_none_or(|e| e.check(s));
    match value_type {
        ValueType::Boolean => scalar(node.boolean()),
        ValueType::Integer => scalar(node.integer()),
        ValueType::FloatingPoint => scalar(node.floating_point()),
        ValueType::String | ValueType::FileReference => scalar(node.text()),
        ValueType::Enum => match node.text() {
            Some(text) => {
                let ok = member(&text);
                (Value::from(text), ok)
            }
            None => (Value::empty(), false),
        },
        ValueType::ReferenceComponent => match node.integer() {
            Some(id) => (Value::reference(id), true),
            None => (Value::empty(), false),
        },
        ValueType::BooleanArray => array(node, N::boolean),
        ValueType::StringArray => array(node, N::text),
        ValueType::EnumArray => {
            let (value, ok) = array(node, N::text);
            let members = value
                .as_string_array()
                .is_ok_and(|values| values.iter().all(|v| member(v.as_str())));
            (value, ok && members)
        }
        ValueType::IntegerArray => match node.coded() {
            Some(payload) => decode_coded(&payload, |data, coding| {
                coded::decode_integers(data, coding).map(Value::from)
            }),
            None => array(node, N::integer),
        },
        ValueType::FloatingPointArray => match node.coded() {
            Some(payload) => decode_coded(&payload, |data, coding| {
                coded::decode_floats(data, coding).map(Value::from)
            }),
            None => array(node, N::floating_point),
        },
        ValueType::FloatingPointMatrix => match node.coded() {
            Some(payload) => {
                let (Some(rows), Some(columns)) = (payload.rows, payload.columns) else {
                    return (Value::empty(), false);
                };
                decode_coded(&payload, |data, coding| {
                    coded::decode_matrix(data, coding, rows, columns).map(Value::from)
                })
            }
            None => matrix(node, N::floating_point),
        },
        ValueType::StringMatrix => matrix(node, N::text),
        ValueType::ArrayOfIntegerArrays => match node.array_of_arrays() {
            Some(arrays) => {
                let mut ok = true;
                let values: Vec<Vec<i64>> = arrays
                    .iter()
                    .map(|inner| elements(inner, N::integer, &mut ok))
                    .collect();
                (Value::from(values), ok)
            }
            None => (Value::empty(), false),
        },
    }
}

fn scalar<T: Into<Value>>(value: Option<T>) -> (Value, bool) {
    match value {
        Some(v) => (v.into(), true),
        None => (Value::empty(), false),
    }
}

fn elements<N, T>(nodes: &[N], element: impl Fn(&N) -> Option<T>, ok: &mut bool) -> Vec<T> {
    nodes
        .iter()
        .filter_map(|n| {
            let decoded = element(n);
            *ok &= decoded.is_some();
            decoded
        })
        .collect()
}

fn array<N, T>(node: &N, element: impl Fn(&N) -> Option<T>) -> (Value, bool)
where
    N: NodeView,
    Vec<T>: Into<Value>,
{
    match node.array() {
        Some(nodes) => {
            let mut ok = true;
            let values = elements(&nodes, element, &mut ok);
            (values.into(), ok)
        }
        None => (Value::empty(), false),
    }
}

fn matrix<N, T>(node: &N, element: impl Fn(&N) -> Option<T>) -> (Value, bool)
where
    N: NodeView,
    Matrix<T>: Into<Value>,
{
    match node.matrix() {
        Some(rows) => {
            let mut ok = true;
            let rows: Vec<Vec<T>> = rows
                .iter()
                .map(|row| elements(row, &element, &mut ok))
                .collect();
            let matrix = Matrix::new(rows);
            let rectangular = matrix.is_rectangular();
            (matrix.into(), ok && rectangular)
        }
        None => (Value::empty(), false),
    }
}

fn decode_coded(
    payload: &CodedPayload,
    unpack: impl FnOnce(&str, CodedValueType) -> rexs_model::Result<Value>,
) -> (Value, bool) {
    let decoded = payload
        .code
        .parse::<CodedValueType>()
        .and_then(|coding| unpack(&payload.value, coding).map(|v| v.with_coding(coding)));
    match decoded {
        Ok(value) => (value, true),
        Err(e) => {
            tracing::debug!(error = %e, "coded value rejected");
            (Value::empty(), false)
        }
    }
}
