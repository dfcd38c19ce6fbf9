//! Value access over XML attribute elements
//!
//! Scalars are the element text. Arrays, matrices and arrays of arrays are
//! child elements:
//!
//! ```xml
//! <attribute id="a" unit="mm"><array><c>1</c><c>2</c></array></attribute>
//! <attribute id="b" unit="mm"><array code="float64">AAAAAAAA8D8=</array></attribute>
//! <attribute id="m" unit="mm"><matrix><r><c>1</c></r></matrix></attribute>
//! <attribute id="j" unit="none"><array_of_arrays><array><c>1</c></array></array_of_arrays></attribute>
//! ```

use crate::dom::Element;
use rexs_database::ValueType;
use rexs_loader::{CodedPayload, NodeView, decode};
use rexs_model::{CodedValueType, Matrix, Value};

const ARRAY: &str = "array";
const MATRIX: &str = "matrix";
const ARRAY_OF_ARRAYS: &str = "array_of_arrays";

/// A borrowed attribute or cell element
#[derive(Debug, Clone, Copy)]
pub struct XmlNode<'a>(pub &'a Element);

impl<'a> XmlNode<'a> {
    fn cells(element: &'a Element) -> Vec<XmlNode<'a>> {
        element.children_named("c").map(XmlNode).collect()
    }

    /// Plain, uncoded child container
    fn container(&self, name: &str) -> Option<&'a Element> {
        self.0
            .child(name)
            .filter(|child| child.attribute("code").is_none())
    }

    fn scalar_text(&self) -> Option<&'a str> {
        if self.0.has_children() {
            None
        } else {
            Some(self.0.text().trim())
        }
    }
}

impl NodeView for XmlNode<'_> {
    fn boolean(&self) -> Option<bool> {
        match self.scalar_text()? {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    fn integer(&self) -> Option<i64> {
        self.scalar_text()?.parse().ok()
    }

    fn floating_point(&self) -> Option<f64> {
        self.scalar_text()?.parse().ok()
    }

    fn text(&self) -> Option<String> {
        if self.0.has_children() {
            None
        } else {
            Some(self.0.text().to_string())
        }
    }

    fn coded(&self) -> Option<CodedPayload> {
        let coded = self
            .0
            .children
            .iter()
            .find(|c| (c.name == ARRAY || c.name == MATRIX) && c.attribute("code").is_some())?;
        Some(CodedPayload {
            code: coded.attribute("code")?.to_string(),
            value: coded.text().trim().to_string(),
            rows: coded.attribute("rows").and_then(|r| r.trim().parse().ok()),
            columns: coded.attribute("columns").and_then(|c| c.trim().parse().ok()),
        })
    }

    fn array(&self) -> Option<Vec<Self>> {
        self.container(ARRAY).map(XmlNode::cells)
    }

    fn matrix(&self) -> Option<Vec<Vec<Self>>> {
        let matrix = self.container(MATRIX)?;
        Some(matrix.children_named("r").map(XmlNode::cells).collect())
    }

    fn array_of_arrays(&self) -> Option<Vec<Vec<Self>>> {
        let arrays = self.0.child(ARRAY_OF_ARRAYS)?;
        Some(arrays.children_named(ARRAY).map(XmlNode::cells).collect())
    }
}

/// Decode a custom attribute by the shape of its content.
///
/// Bare text becomes a string, `<array>` a string array, `<matrix>` a string
/// matrix and `<array_of_arrays>` an array of integer arrays. Numeric looking
/// content stays a string.
///
/// A coded `<array>` is unpacked into an integer array for `int32` and a
/// floating point array otherwise, a coded `<matrix>` into a floating point
/// matrix. The coding tag is kept. A payload that does not unpack is kept as
/// its base64 text.
#[must_use]
pub fn decode_unknown(element: &Element) -> (ValueType, Value) {
    let node = XmlNode(element);
    if element.child(ARRAY_OF_ARRAYS).is_some() {
        let (value, _) = decode(ValueType::ArrayOfIntegerArrays, None, &node);
        return (ValueType::ArrayOfIntegerArrays, value);
    }
    if let Some(rows) = node.matrix() {
        let rows: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.iter().map(|c| c.0.text().to_string()).collect())
            .collect();
        return (ValueType::StringMatrix, Value::from(Matrix::new(rows)));
    }
    if let Some(cells) = node.array() {
        let values: Vec<String> = cells.iter().map(|c| c.0.text().to_string()).collect();
        return (ValueType::StringArray, Value::from(values));
    }
    match node.coded() {
        Some(payload) => {
            let value_type = coded_type(element, &payload);
            match decode(value_type, None, &node) {
                (value, true) => (value_type, value),
                (_, false) => (ValueType::String, Value::from(payload.value)),
            }
        }
        None => (ValueType::String, Value::from(element.text())),
    }
}

fn coded_type(element: &Element, payload: &CodedPayload) -> ValueType {
    let coded_matrix = element
        .child(MATRIX)
        .is_some_and(|matrix| matrix.attribute("code").is_some());
    if coded_matrix {
        ValueType::FloatingPointMatrix
    } else if payload.code.parse::<CodedValueType>().ok() == Some(CodedValueType::Int32) {
        ValueType::IntegerArray
    } else {
        ValueType::FloatingPointArray
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse;

    fn attribute(xml: &str) -> Element {
        parse(xml.as_bytes()).unwrap()
    }

    #[test]
    fn test_scalar_nodes() {
        let element = attribute(r#"<attribute id="x" unit="none"> 42 </attribute>"#);
        let (value, ok) = decode(ValueType::Integer, None, &XmlNode(&element));
        assert!(ok);
        assert_eq!(value.as_integer().unwrap(), 42);

        let element = attribute(r#"<attribute id="x" unit="none">yes</attribute>"#);
        let (value, ok) = decode(ValueType::Boolean, None, &XmlNode(&element));
        assert!(!ok);
        assert!(value.is_empty());
    }

    #[test]
    fn test_array_node() {
        let element =
            attribute(r#"<attribute id="x" unit="mm"><array><c>1.5</c><c>2</c></array></attribute>"#);
        let (value, ok) = decode(ValueType::FloatingPointArray, None, &XmlNode(&element));
        assert!(ok);
        assert_eq!(value.as_floating_point_array().unwrap(), &[1.5, 2.0]);
        assert_eq!(value.coded(), CodedValueType::None);

        // an array is not a scalar
        let (_, ok) = decode(ValueType::FloatingPoint, None, &XmlNode(&element));
        assert!(!ok);
    }

    #[test]
    fn test_coded_array_node() {
        let element = attribute(
            r#"<attribute id="x" unit="mm"><array code="float64">AAAAAAAA8D8=</array></attribute>"#,
        );
        let (value, ok) = decode(ValueType::FloatingPointArray, None, &XmlNode(&element));
        assert!(ok);
        assert_eq!(value.as_floating_point_array().unwrap(), &[1.0]);
        assert_eq!(value.coded(), CodedValueType::Float64);

        // coded content is not a list of strings
        let (_, ok) = decode(ValueType::StringArray, None, &XmlNode(&element));
        assert!(!ok);
    }

    #[test]
    fn test_coded_matrix_node() {
        let element = attribute(
            r#"<attribute id="x" unit="none"><matrix code="float64" rows="1" columns="1">AAAAAAAA8D8=</matrix></attribute>"#,
        );
        let (value, ok) = decode(ValueType::FloatingPointMatrix, None, &XmlNode(&element));
        assert!(ok);
        assert_eq!(value.as_floating_point_matrix().unwrap().rows(), &[vec![1.0]]);
    }

    #[test]
    fn test_matrix_and_jagged_nodes() {
        let element = attribute(
            r#"<attribute id="x" unit="none"><matrix><r><c>a</c><c>b</c></r><r><c>c</c><c>d</c></r></matrix></attribute>"#,
        );
        let (value, ok) = decode(ValueType::StringMatrix, None, &XmlNode(&element));
        assert!(ok);
        assert_eq!(value.as_string_matrix().unwrap().rows()[1], vec!["c", "d"]);

        let element = attribute(
            r#"<attribute id="x" unit="none"><array_of_arrays><array><c>1</c></array><array><c>2</c><c>3</c></array></array_of_arrays></attribute>"#,
        );
        let (value, ok) = decode(ValueType::ArrayOfIntegerArrays, None, &XmlNode(&element));
        assert!(ok);
        assert_eq!(value.as_array_of_integer_arrays().unwrap(), &[vec![1], vec![2, 3]]);
    }

    #[test]
    fn test_decode_unknown_shapes() {
        let text = attribute(r#"<attribute id="custom_a" unit="none">12.5</attribute>"#);
        let (value_type, value) = decode_unknown(&text);
        assert_eq!(value_type, ValueType::String);
        assert_eq!(value.as_str().unwrap(), "12.5");

        let array = attribute(
            r#"<attribute id="custom_b" unit="none"><array><c>1</c><c>x</c></array></attribute>"#,
        );
        let (value_type, value) = decode_unknown(&array);
        assert_eq!(value_type, ValueType::StringArray);
        assert_eq!(value.as_string_array().unwrap(), &["1", "x"]);

        let matrix = attribute(
            r#"<attribute id="custom_c" unit="none"><matrix><r><c>1</c></r></matrix></attribute>"#,
        );
        assert_eq!(decode_unknown(&matrix).0, ValueType::StringMatrix);

        let jagged = attribute(
            r#"<attribute id="custom_d" unit="none"><array_of_arrays><array><c>4</c></array></array_of_arrays></attribute>"#,
        );
        let (value_type, value) = decode_unknown(&jagged);
        assert_eq!(value_type, ValueType::ArrayOfIntegerArrays);
        assert_eq!(value.as_array_of_integer_arrays().unwrap(), &[vec![4]]);
    }

    #[test]
    fn test_decode_unknown_coded_content() {
        let integers = attribute(
            r#"<attribute id="custom_teeth" unit="none"><array code="int32">EQAAADUAAAA=</array></attribute>"#,
        );
        let (value_type, value) = decode_unknown(&integers);
        assert_eq!(value_type, ValueType::IntegerArray);
        assert_eq!(value.as_integer_array().unwrap(), &[17, 53]);
        assert_eq!(value.coded(), CodedValueType::Int32);

        let floats = attribute(
            r#"<attribute id="custom_vector" unit="mm"><array code="float64">
              AAAAAAAA8D8=
            </array></attribute>"#,
        );
        let (value_type, value) = decode_unknown(&floats);
        assert_eq!(value_type, ValueType::FloatingPointArray);
        assert_eq!(value.as_floating_point_array().unwrap(), &[1.0]);

        let matrix = attribute(
            r#"<attribute id="custom_m" unit="none"><matrix code="float64" rows="1" columns="1">AAAAAAAA8D8=</matrix></attribute>"#,
        );
        assert_eq!(decode_unknown(&matrix).0, ValueType::FloatingPointMatrix);

        let unknown = attribute(
            r#"<attribute id="custom_x" unit="none"><array code="float16">AAAA</array></attribute>"#,
        );
        let (value_type, value) = decode_unknown(&unknown);
        assert_eq!(value_type, ValueType::String);
        assert_eq!(value.as_str().unwrap(), "AAAA");
    }

    #[test]
    fn test_string_text_is_not_trimmed() {
        let element = attribute(r#"<attribute id="description" unit="none"> padded </attribute>"#);
        let (value, ok) = decode(ValueType::String, None, &XmlNode(&element));
        assert!(ok);
        assert_eq!(value.as_str().unwrap(), " padded ");

        let element = attribute(
            r#"<attribute id="material_designations" unit="none">
              <array><c> a</c><c>b </c></array>
            </attribute>"#,
        );
        let (value, ok) = decode(ValueType::StringArray, None, &XmlNode(&element));
        assert!(ok);
        assert_eq!(value.as_string_array().unwrap(), &[" a", "b "]);
    }
}
