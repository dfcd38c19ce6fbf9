//! Value access over JSON attribute objects

use rexs_database::ValueType;
use rexs_loader::{CodedPayload, NodeView, decode};
use rexs_model::Value;
use serde_json::{Map, Value as Json};

/// Suffix of the field holding a coded array or matrix
pub const CODED_SUFFIX: &str = "_coded";

/// A borrowed JSON value node
#[derive(Debug, Clone, Copy)]
pub enum JsonNode<'a> {
    /// An explicit value or element
    Plain(&'a Json),
    /// A `{code, value, rows?, columns?}` object
    Coded(&'a Json),
}

impl<'a> JsonNode<'a> {
    fn plain(&self) -> Option<&'a Json> {
        match self {
            JsonNode::Plain(value) => Some(value),
            JsonNode::Coded(_) => None,
        }
    }

    fn nested(&self) -> Option<Vec<Vec<JsonNode<'a>>>> {
        self.plain()?
            .as_array()?
            .iter()
            .map(|inner| {
                inner
                    .as_array()
                    .map(|elements| elements.iter().map(JsonNode::Plain).collect())
            })
            .collect()
    }
}

fn dimension(object: &Json, key: &str) -> Option<usize> {
    object.get(key)?.as_u64().and_then(|n| usize::try_from(n).ok())
}

impl NodeView for JsonNode<'_> {
    fn boolean(&self) -> Option<bool> {
        self.plain()?.as_bool()
    }

    fn integer(&self) -> Option<i64> {
        self.plain()?.as_i64()
    }

    fn floating_point(&self) -> Option<f64> {
        self.plain()?.as_f64()
    }

    fn text(&self) -> Option<String> {
        self.plain()?.as_str().map(str::to_string)
    }

    fn coded(&self) -> Option<CodedPayload> {
        let JsonNode::Coded(object) = self else {
            return None;
        };
        Some(CodedPayload {
            code: object.get("code")?.as_str()?.to_string(),
            value: object.get("value")?.as_str()?.to_string(),
            rows: dimension(object, "rows"),
            columns: dimension(object, "columns"),
        })
    }

    fn array(&self) -> Option<Vec<Self>> {
        Some(
            self.plain()?
                .as_array()?
                .iter()
                .map(JsonNode::Plain)
                .collect(),
        )
    }

    fn matrix(&self) -> Option<Vec<Vec<Self>>> {
        self.nested()
    }

    fn array_of_arrays(&self) -> Option<Vec<Vec<Self>>> {
        self.nested()
    }
}

/// The node carrying a value of `value_type`, preferring the coded field
#[must_use]
pub fn value_field(attribute: &Map<String, Json>, value_type: ValueType) -> Option<JsonNode<'_>> {
    if value_type.supports_coding() {
        let coded = format!("{}{CODED_SUFFIX}", value_type.name());
        if let Some(value) = attribute.get(&coded) {
            return Some(JsonNode::Coded(value));
        }
    }
    attribute.get(value_type.name()).map(JsonNode::Plain)
}

/// Decode an attribute the database does not describe.
///
/// The value type is taken from the first value field present. Elements that
/// fail to decode are dropped. Returns `None` when there is no value field.
#[must_use]
pub fn decode_unknown(attribute: &Map<String, Json>) -> Option<(ValueType, Value)> {
    ValueType::ALL.iter().find_map(|&value_type| {
        let node = value_field(attribute, value_type)?;
        let (value, _) = decode(value_type, None, &node);
        Some((value_type, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rexs_model::CodedValueType;
    use serde_json::json;

    fn object(value: Json) -> Map<String, Json> {
        match value {
            Json::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_scalars() {
        let value = json!(7);
        let node = JsonNode::Plain(&value);
        assert_eq!(node.integer(), Some(7));
        assert_eq!(node.floating_point(), Some(7.0));
        assert_eq!(node.boolean(), None);
        assert_eq!(node.text(), None);

        let text = json!("left");
        assert_eq!(JsonNode::Plain(&text).text().as_deref(), Some("left"));
    }

    #[test]
    fn test_fraction_is_not_an_integer() {
        let value = json!(7.5);
        assert_eq!(JsonNode::Plain(&value).integer(), None);
    }

    #[test]
    fn test_matrix_rows() {
        let value = json!([[1.0, 2.0], [3.0, 4.0]]);
        let rows = JsonNode::Plain(&value).matrix().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0].floating_point(), Some(3.0));

        let flat = json!([1.0, 2.0]);
        assert!(JsonNode::Plain(&flat).matrix().is_none());
    }

    #[test]
    fn test_coded_payload() {
        let value = json!({"code": "float64", "value": "AAAAAAAA8D8=", "rows": 1, "columns": 1});
        let payload = JsonNode::Coded(&value).coded().unwrap();
        assert_eq!(payload.code, "float64");
        assert_eq!(payload.rows, Some(1));
        assert_eq!(payload.columns, Some(1));
        assert!(JsonNode::Coded(&value).array().is_none());
        assert!(JsonNode::Plain(&value).coded().is_none());
    }

    #[test]
    fn test_value_field_prefers_coded() {
        let attribute = object(json!({
            "id": "numbers_of_teeth",
            "integer_array": [1],
            "integer_array_coded": {"code": "int32", "value": "EQAAADUAAAA="}
        }));
        let node = value_field(&attribute, ValueType::IntegerArray).unwrap();
        let (value, ok) = decode(ValueType::IntegerArray, None, &node);
        assert!(ok);
        assert_eq!(value.as_integer_array().unwrap(), &[17, 53]);
        assert_eq!(value.coded(), CodedValueType::Int32);

        // only coding-capable types look at the suffixed field
        let attribute = object(json!({"string_coded": "x"}));
        assert!(value_field(&attribute, ValueType::String).is_none());
    }

    #[test]
    fn test_decode_unknown_uses_present_field() {
        let attribute = object(json!({"id": "custom_ratio", "unit": "none", "floating_point": 1.5}));
        let (value_type, value) = decode_unknown(&attribute).unwrap();
        assert_eq!(value_type, ValueType::FloatingPoint);
        assert_eq!(value.as_floating_point().unwrap(), 1.5);

        let attribute = object(json!({"id": "custom_tags", "string_array": ["a", "b"]}));
        let (value_type, value) = decode_unknown(&attribute).unwrap();
        assert_eq!(value_type, ValueType::StringArray);
        assert_eq!(value.as_string_array().unwrap().len(), 2);

        let attribute = object(json!({"id": "custom_nothing", "unit": "none"}));
        assert!(decode_unknown(&attribute).is_none());
    }
}
